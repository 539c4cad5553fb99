//! Horizontal box - children laid out left to right

use super::{Alignment, BoxMetrics, MathBox, StrutBox};
use crate::font::FontId;
use crate::render::{Canvas, Color, Rect};
use serde::{Deserialize, Serialize};

/// A row of boxes sharing one baseline.
///
/// Metrics are updated on every insertion: the width is the sum of the child
/// widths, the height the largest `height - shift` and the depth the largest
/// `depth + shift`. The first child always sets both, whatever their sign.
///
/// Break positions are strictly increasing child indices before which the
/// formula breaker may start a new line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HorizontalBox {
    metrics: BoxMetrics,
    children: Vec<MathBox>,
    break_positions: Vec<usize>,
    foreground: Option<Color>,
    background: Option<Color>,
}

impl HorizontalBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty row drawn with the given colors
    pub fn with_colors(foreground: Option<Color>, background: Option<Color>) -> Self {
        Self {
            foreground,
            background,
            ..Self::default()
        }
    }

    /// A row holding a single box
    pub fn from_box(b: MathBox) -> Self {
        let mut row = Self::new();
        row.add(b);
        row
    }

    /// Pad `b` with struts to the given width
    pub fn aligned(b: MathBox, width: f32, alignment: Alignment) -> Self {
        let mut row = Self::new();
        let rest = width - b.width();
        if !width.is_finite() || rest <= 0.0 {
            row.add(b);
            return row;
        }
        match alignment {
            Alignment::Center | Alignment::None => {
                let strut = StrutBox::kern(rest / 2.0);
                row.add(strut.into());
                row.add(b);
                row.add(strut.into());
            }
            Alignment::Left => {
                row.add(b);
                row.add(StrutBox::kern(rest).into());
            }
            Alignment::Right => {
                row.add(StrutBox::kern(rest).into());
                row.add(b);
            }
        }
        row
    }

    pub fn metrics(&self) -> &BoxMetrics {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut BoxMetrics {
        &mut self.metrics
    }

    pub fn width(&self) -> f32 {
        self.metrics.width
    }

    pub fn height(&self) -> f32 {
        self.metrics.height
    }

    pub fn depth(&self) -> f32 {
        self.metrics.depth
    }

    pub fn children(&self) -> &[MathBox] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn break_positions(&self) -> &[usize] {
        &self.break_positions
    }

    pub fn foreground(&self) -> Option<Color> {
        self.foreground
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    fn recalculate(&mut self, b: &MathBox) {
        let m = b.metrics();
        self.metrics.width += m.width;
        if self.children.is_empty() {
            self.metrics.height = m.height - m.shift;
            self.metrics.depth = m.depth + m.shift;
        } else {
            self.metrics.height = self.metrics.height.max(m.height - m.shift);
            self.metrics.depth = self.metrics.depth.max(m.depth + m.shift);
        }
    }

    /// Append a box at the end of the row
    pub fn add(&mut self, b: MathBox) {
        self.recalculate(&b);
        self.children.push(b);
    }

    /// Insert a box before the child at `index`.
    ///
    /// Break positions at or after `index` move with the children they precede.
    pub fn insert(&mut self, index: usize, b: MathBox) {
        let index = index.min(self.children.len());
        self.recalculate(&b);
        self.children.insert(index, b);
        for pos in self.break_positions.iter_mut().filter(|p| **p >= index) {
            *pos += 1;
        }
    }

    /// Allow a line break before the child at `position`.
    ///
    /// Positions must be added in increasing order; a position not greater
    /// than the last registered one is ignored. Position 0 can be registered
    /// but is never used by formula breaking, since a line ending before the
    /// first child would be empty.
    pub fn add_break_position(&mut self, position: usize) {
        if self.break_positions.last().map_or(true, |last| position > *last) {
            self.break_positions.push(position);
        }
    }

    /// Split into children `0..=position` and `position + 1..`.
    ///
    /// Break positions after `position + 1` move to the second half.
    pub fn split(&self, position: usize) -> (HorizontalBox, HorizontalBox) {
        self.divide(position + 1, position + 1, position + 1)
    }

    /// Split into children `0..=position` and `position + 2..`, dropping the
    /// child at `position + 1`.
    ///
    /// Break positions after the dropped child are shifted by `position + 1`,
    /// so they still count the dropped child's slot at the front of the second
    /// half. They become exact once a box is put there with [`prepend`].
    ///
    /// [`prepend`]: HorizontalBox::prepend
    pub fn split_remove(&self, position: usize) -> (HorizontalBox, HorizontalBox) {
        self.split_around(position + 1)
    }

    /// Children before and after child `index`, which is left out.
    ///
    /// Same re-indexing as [`split_remove`](HorizontalBox::split_remove); an
    /// `index` of 0 leaves the first half empty.
    pub fn split_around(&self, index: usize) -> (HorizontalBox, HorizontalBox) {
        self.divide(index, index + 1, index)
    }

    /// Put a box in front of the first child without moving break positions.
    ///
    /// Pairs with [`split_around`](HorizontalBox::split_around), whose second
    /// half already reserves index 0.
    pub fn prepend(&mut self, b: MathBox) {
        self.recalculate(&b);
        self.children.insert(0, b);
    }

    /// Children `..first_len` and `second_start..`; break positions greater
    /// than `offset` go to the second half, shifted down by `offset`
    fn divide(&self, first_len: usize, second_start: usize, offset: usize) -> (HorizontalBox, HorizontalBox) {
        let first_len = first_len.min(self.children.len());
        let second_start = second_start.min(self.children.len());

        let mut first = HorizontalBox::with_colors(self.foreground, self.background);
        for child in &self.children[..first_len] {
            first.add(child.clone());
        }
        let mut second = HorizontalBox::with_colors(self.foreground, self.background);
        for child in &self.children[second_start..] {
            second.add(child.clone());
        }
        for &pos in &self.break_positions {
            if pos > offset {
                second.add_break_position(pos - offset);
            }
        }
        (first, second)
    }

    pub fn last_font_id(&self) -> Option<FontId> {
        self.children.iter().rev().find_map(MathBox::last_font_id)
    }

    pub(crate) fn draw(&self, canvas: &mut dyn Canvas, x: f32, y: f32) {
        let m = &self.metrics;
        let previous = canvas.color();
        if let Some(bg) = self.background {
            canvas.set_color(bg);
            canvas.fill_rect(Rect::new(x, y - m.height, m.width, m.total_height()));
        }
        canvas.set_color(self.foreground.unwrap_or(previous));
        let mut x_pos = x;
        for child in &self.children {
            child.draw(canvas, x_pos, y + child.shift());
            x_pos += child.width();
        }
        canvas.set_color(previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn strut(width: f32, height: f32, depth: f32, shift: f32) -> MathBox {
        StrutBox::new(width, height, depth, shift).into()
    }

    fn row_of(widths: &[f32]) -> HorizontalBox {
        let mut row = HorizontalBox::new();
        for &w in widths {
            row.add(strut(w, 1.0, 0.0, 0.0));
        }
        row
    }

    fn widths(row: &HorizontalBox) -> Vec<f32> {
        row.children().iter().map(MathBox::width).collect()
    }

    #[test]
    fn test_first_child_sets_baseline() {
        let mut row = HorizontalBox::new();
        row.add(strut(1.0, -0.5, -0.2, 0.0));
        assert_eq!(row.height(), -0.5);
        assert_eq!(row.depth(), -0.2);
        row.add(strut(1.0, 0.3, 0.1, 0.0));
        assert_eq!(row.height(), 0.3);
        assert_eq!(row.depth(), 0.1);
    }

    #[test]
    fn test_shift_moves_child_extents() {
        let mut row = HorizontalBox::new();
        row.add(strut(1.0, 1.0, 0.0, 0.0));
        row.add(strut(1.0, 1.0, 0.5, 0.5));
        assert_eq!(row.height(), 1.0);
        assert_eq!(row.depth(), 1.0);
        row.add(strut(1.0, 1.0, 0.0, -2.0));
        assert_eq!(row.height(), 3.0);
    }

    #[test]
    fn test_aligned_padding() {
        let centered = HorizontalBox::aligned(strut(2.0, 1.0, 0.0, 0.0), 6.0, Alignment::Center);
        assert_eq!(widths(&centered), vec![2.0, 2.0, 2.0]);
        let right = HorizontalBox::aligned(strut(2.0, 1.0, 0.0, 0.0), 6.0, Alignment::Right);
        assert_eq!(widths(&right), vec![4.0, 2.0]);
        let narrow = HorizontalBox::aligned(strut(7.0, 1.0, 0.0, 0.0), 6.0, Alignment::Left);
        assert_eq!(narrow.width(), 7.0);
    }

    #[test]
    fn test_insert_moves_break_positions() {
        let mut row = row_of(&[1.0, 2.0, 3.0]);
        row.add_break_position(1);
        row.add_break_position(2);
        row.insert(0, strut(4.0, 1.0, 0.0, 0.0));
        assert_eq!(row.break_positions(), &[2, 3]);
        assert_eq!(row.width(), 10.0);
        assert_eq!(widths(&row), vec![4.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_break_positions_strictly_increasing() {
        let mut row = row_of(&[1.0; 5]);
        row.add_break_position(2);
        row.add_break_position(2);
        row.add_break_position(1);
        row.add_break_position(4);
        assert_eq!(row.break_positions(), &[2, 4]);
    }

    #[test]
    fn test_split_reindexes_break_positions() {
        let mut row = row_of(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        row.add_break_position(2);
        row.add_break_position(4);
        let (first, second) = row.split(1);
        assert_eq!(widths(&first), vec![1.0, 2.0]);
        assert_eq!(widths(&second), vec![3.0, 4.0, 5.0, 6.0]);
        assert_eq!(second.break_positions(), &[2]);
        assert!(first.break_positions().is_empty());
    }

    #[test]
    fn test_split_remove_drops_one_child() {
        let mut row = row_of(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        row.add_break_position(4);
        let (first, second) = row.split_remove(1);
        assert_eq!(widths(&first), vec![1.0, 2.0]);
        assert_eq!(widths(&second), vec![4.0, 5.0]);
        // counted with the dropped child's slot still in front
        assert_eq!(second.break_positions(), &[2]);
    }

    #[test]
    fn test_split_remove_keeps_break_after_dropped_child() {
        let mut row = row_of(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        row.add_break_position(3);
        let (_, mut second) = row.split_remove(1);
        assert_eq!(second.break_positions(), &[1]);

        // a box taking the dropped child's place makes the position exact
        second.prepend(strut(3.0, 1.0, 0.0, 0.0));
        assert_eq!(second.break_positions(), &[1]);
        assert_eq!(widths(&second), vec![3.0, 4.0, 5.0]);
        assert_eq!(second.width(), 12.0);
    }

    #[test]
    fn test_split_around_front_child() {
        let mut row = row_of(&[1.0, 2.0, 3.0]);
        row.add_break_position(1);
        row.add_break_position(2);
        let (first, second) = row.split_around(0);
        assert!(first.is_empty());
        assert_eq!(widths(&second), vec![2.0, 3.0]);
        assert_eq!(second.break_positions(), &[1, 2]);
    }

    #[test]
    fn test_split_keeps_colors() {
        let mut row = HorizontalBox::with_colors(Some(Color::RED), None);
        row.add(strut(1.0, 1.0, 0.0, 0.0));
        row.add(strut(1.0, 1.0, 0.0, 0.0));
        let (first, second) = row.split(0);
        assert_eq!(first.foreground(), Some(Color::RED));
        assert_eq!(second.foreground(), Some(Color::RED));
    }

    fn child_strategy() -> impl Strategy<Value = (f32, f32, f32, f32)> {
        (0.0f32..10.0, -2.0f32..5.0, -2.0f32..5.0, -3.0f32..3.0)
    }

    proptest! {
        #[test]
        fn prop_metric_additivity(children in prop::collection::vec(child_strategy(), 1..12)) {
            let mut row = HorizontalBox::new();
            for &(w, h, d, s) in &children {
                row.add(strut(w, h, d, s));
            }
            let width: f32 = children.iter().map(|c| c.0).sum();
            let height = children.iter().map(|c| c.1 - c.3).fold(f32::NEG_INFINITY, f32::max);
            let depth = children.iter().map(|c| c.2 + c.3).fold(f32::NEG_INFINITY, f32::max);
            prop_assert!((row.width() - width).abs() < 1e-3);
            prop_assert_eq!(row.height(), height);
            prop_assert_eq!(row.depth(), depth);
        }

        #[test]
        fn prop_split_round_trip(ws in prop::collection::vec(0.5f32..10.0, 2..12), cut in 0usize..12) {
            let row = row_of(&ws);
            let cut = cut % (ws.len() - 1);

            let (a, b) = row.split(cut);
            let mut joined = widths(&a);
            joined.extend(widths(&b));
            prop_assert_eq!(joined, ws.clone());

            let (a, b) = row.split_remove(cut);
            let mut joined = widths(&a);
            joined.extend(widths(&b));
            let mut expected = ws.clone();
            expected.remove(cut + 1);
            prop_assert_eq!(joined, expected);
        }
    }
}
