//! Formula breaking
//!
//! Re-flows a row that is wider than the available width into a stack of
//! lines. Lines may only end at registered break positions, which can sit in
//! the row itself or in rows nested inside it. A nested cut splits every
//! enclosing row along the way, so the structure of the formula survives on
//! both sides of the break.

use crate::boxes::{HorizontalBox, MathBox, VerticalBox};
use tracing::debug;

/// A pending cut in one row of the box tree.
///
/// The innermost cut of a stack means "the line ends before child `index`";
/// every enclosing cut means "child `index` is the nested row being cut".
#[derive(Debug, Clone, Copy)]
struct Position<'a> {
    index: usize,
    hbox: &'a HorizontalBox,
}

/// Break `b` into lines no wider than `max_width`, separated by `interline`.
///
/// A row that already fits, or that has no usable break position, comes back
/// unchanged. A stack is broken row by row and rows never merge. Lines that
/// still overflow after all break positions are used are kept as they are.
pub fn split(b: MathBox, max_width: f32, interline: f32) -> MathBox {
    match b {
        MathBox::Horizontal(hbox) => split_row(hbox, max_width, interline),
        MathBox::Vertical(vbox) => {
            let mut stack = VerticalBox::new();
            for child in vbox.into_children() {
                stack.add(split(child, max_width, interline));
            }
            stack.into()
        }
        other => other,
    }
}

fn split_row(hbox: HorizontalBox, max_width: f32, interline: f32) -> MathBox {
    let mut lines = VerticalBox::new();
    let mut remaining = hbox;
    let mut broken = false;

    while remaining.width() > max_width {
        let mut cuts = Vec::new();
        if can_break(&mut cuts, &remaining, max_width).is_none() {
            debug!(width = remaining.width(), max_width, "no break position left in overflowing line");
            break;
        }
        let (first, second) = apply_cuts(cuts);
        debug!(line = lines.len(), width = first.width(), "formula line");
        lines.add_with_interline(first.into(), interline);
        remaining = second;
        broken = true;
    }

    if !broken {
        return remaining.into();
    }
    lines.add_with_interline(remaining.into(), interline);
    lines.into()
}

/// Find where to end the first line of `hbox` within `width`.
///
/// On success the cuts are appended to `stack`, outermost first, and the
/// width of the resulting line is returned. `None` means the row cannot be
/// broken; `stack` is then left untouched.
fn can_break<'a>(stack: &mut Vec<Position<'a>>, hbox: &'a HorizontalBox, width: f32) -> Option<f32> {
    let mut cumulative = 0.0;
    for (i, child) in hbox.children().iter().enumerate() {
        let before = cumulative;
        cumulative += child.width();
        if cumulative <= width {
            continue;
        }

        let registered = break_position(hbox, i);
        if let MathBox::Horizontal(nested) = child {
            let mut nested_cuts = Vec::new();
            if let Some(w) = can_break(&mut nested_cuts, nested, width - before) {
                // a coarser break in this row wins over a nested break that overflows
                if before + w <= width || registered.is_none() {
                    stack.push(Position { index: i, hbox });
                    stack.extend(nested_cuts);
                    return Some(before + w);
                }
            }
        }
        if let Some(p) = registered {
            stack.push(Position { index: p, hbox });
            let line: f32 = hbox.children()[..p].iter().map(MathBox::width).sum();
            return Some(line);
        }
    }
    None
}

/// The last registered break position at or before child `i`.
///
/// A break before the first child would produce an empty line and is never used.
fn break_position(hbox: &HorizontalBox, i: usize) -> Option<usize> {
    hbox.break_positions().iter().rev().copied().find(|&p| p >= 1 && p <= i)
}

/// Apply a stack of cuts, innermost last, and return the first line and the
/// remainder.
///
/// Each enclosing row loses the nested row being cut; its halves take that
/// child's place on both sides. Break positions after the nested row stay
/// usable in the remainder.
fn apply_cuts(mut cuts: Vec<Position<'_>>) -> (HorizontalBox, HorizontalBox) {
    let Some(innermost) = cuts.pop() else {
        return (HorizontalBox::new(), HorizontalBox::new());
    };
    let (mut first, mut second) = innermost.hbox.split(innermost.index.saturating_sub(1));

    while let Some(outer) = cuts.pop() {
        let (mut head, mut tail) = outer.hbox.split_around(outer.index);
        head.add(first.into());
        tail.prepend(second.into());
        first = head;
        second = tail;
    }
    (first, second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::StrutBox;
    use proptest::prelude::*;

    fn item(width: f32) -> MathBox {
        StrutBox::new(width, 1.0, 0.0, 0.0).into()
    }

    fn row(widths: &[f32], breaks: &[usize]) -> HorizontalBox {
        let mut row = HorizontalBox::new();
        for &w in widths {
            row.add(item(w));
        }
        for &p in breaks {
            row.add_break_position(p);
        }
        row
    }

    /// Widths of the lines of a broken formula, interline struts excluded
    fn line_widths(b: &MathBox) -> Vec<f32> {
        match b {
            MathBox::Vertical(v) => v
                .children()
                .iter()
                .filter(|c| c.as_horizontal().is_some())
                .map(MathBox::width)
                .collect(),
            other => vec![other.width()],
        }
    }

    fn leaf_widths(b: &MathBox, out: &mut Vec<f32>) {
        match b {
            MathBox::Horizontal(h) => h.children().iter().for_each(|c| leaf_widths(c, out)),
            MathBox::Vertical(v) => v.children().iter().for_each(|c| leaf_widths(c, out)),
            MathBox::Strut(s) if s.metrics.width == 0.0 => {}
            other => out.push(other.width()),
        }
    }

    #[test]
    fn test_fitting_row_unchanged() {
        let input: MathBox = row(&[10.0; 3], &[1]).into();
        let output = split(input.clone(), 35.0, 1.0);
        assert_eq!(output, input);
    }

    #[test]
    fn test_no_break_positions_is_irreducible() {
        let input: MathBox = row(&[10.0; 10], &[]).into();
        let output = split(input.clone(), 35.0, 1.0);
        assert_eq!(output, input);
    }

    #[test]
    fn test_break_before_first_child_never_used() {
        let input: MathBox = row(&[10.0; 4], &[0]).into();
        let output = split(input.clone(), 25.0, 0.0);
        assert_eq!(output, input);
    }

    #[test]
    fn test_registered_positions() {
        let input: MathBox = row(&[10.0; 10], &[2, 5, 8]).into();
        let output = split(input, 35.0, 0.5);
        assert_eq!(line_widths(&output), vec![20.0, 30.0, 30.0, 20.0]);
        let stack = output.as_vertical().expect("broken into lines");
        // three interline struts between four lines
        assert_eq!(stack.len(), 7);
        assert_eq!(stack.depth() + stack.height(), 4.0 + 3.0 * 0.5);
    }

    #[test]
    fn test_last_line_may_overflow() {
        let input: MathBox = row(&[10.0; 6], &[2]).into();
        let output = split(input, 35.0, 0.0);
        assert_eq!(line_widths(&output), vec![20.0, 40.0]);
    }

    #[test]
    fn test_nested_row_is_cut_inside() {
        let nested = row(&[10.0; 5], &[2]);
        let mut outer = HorizontalBox::new();
        outer.add(nested.into());
        let output = split(outer.into(), 25.0, 0.0);
        assert_eq!(line_widths(&output), vec![20.0, 30.0]);

        let mut leaves = Vec::new();
        leaf_widths(&output, &mut leaves);
        assert_eq!(leaves, vec![10.0; 5]);
    }

    #[test]
    fn test_nested_cut_drops_nothing_around_it() {
        let nested = row(&[10.0; 4], &[2]);
        let mut outer = HorizontalBox::new();
        outer.add(item(5.0));
        outer.add(nested.into());
        outer.add(item(5.0));
        let output = split(outer.into(), 30.0, 0.0);
        assert_eq!(line_widths(&output), vec![25.0, 25.0]);

        let mut leaves = Vec::new();
        leaf_widths(&output, &mut leaves);
        assert_eq!(leaves, vec![5.0, 10.0, 10.0, 10.0, 10.0, 5.0]);
    }

    #[test]
    fn test_break_after_cut_nested_row_survives() {
        // the outer break between the nested row and its sibling must still
        // be usable once the nested row has been cut
        let nested = row(&[10.0; 4], &[2]);
        let mut outer = HorizontalBox::new();
        outer.add(nested.into());
        outer.add(item(10.0));
        outer.add(item(10.0));
        outer.add_break_position(1);
        let output = split(outer.into(), 25.0, 0.0);
        assert_eq!(line_widths(&output), vec![20.0, 20.0, 20.0]);

        let mut leaves = Vec::new();
        leaf_widths(&output, &mut leaves);
        assert_eq!(leaves, vec![10.0; 6]);
    }

    #[test]
    fn test_sibling_break_after_inner_nested_row() {
        // 5 | (10 . 10 10) | 10 . 10 with the outer break right after the nested row
        let nested = row(&[10.0; 3], &[1]);
        let mut outer = HorizontalBox::new();
        outer.add(item(5.0));
        outer.add(nested.into());
        outer.add(item(10.0));
        outer.add(item(10.0));
        outer.add_break_position(2);
        outer.add_break_position(3);
        let output = split(outer.into(), 20.0, 0.0);
        assert_eq!(line_widths(&output), vec![15.0, 20.0, 20.0]);
    }

    #[test]
    fn test_outer_break_used_when_nested_row_cannot_break() {
        // the nested row's only break leaves 20 units, more than the 15 left
        let nested = row(&[10.0, 10.0, 10.0], &[2]);
        let mut outer = HorizontalBox::new();
        outer.add(item(10.0));
        outer.add(item(5.0));
        outer.add(nested.into());
        outer.add_break_position(1);
        let output = split(outer.into(), 30.0, 0.0);
        assert_eq!(line_widths(&output)[0], 10.0);
    }

    #[test]
    fn test_stack_rows_broken_independently() {
        let mut stack = VerticalBox::new();
        stack.add(row(&[10.0; 4], &[2]).into());
        stack.add(row(&[10.0; 2], &[]).into());
        let output = split(stack.into(), 25.0, 0.0);
        let rows = output.as_vertical().expect("stack");
        assert_eq!(rows.len(), 2);
        assert!(rows.children()[0].as_vertical().is_some());
        assert!(rows.children()[1].as_horizontal().is_some());
    }

    #[test]
    fn test_other_boxes_pass_through() {
        let input = item(100.0);
        assert_eq!(split(input.clone(), 10.0, 0.0), input);
    }

    fn breakable_row() -> impl Strategy<Value = (Vec<f32>, Vec<usize>)> {
        prop::collection::vec(1u8..=10, 2..30).prop_flat_map(|ws| {
            let len = ws.len();
            let widths: Vec<f32> = ws.into_iter().map(f32::from).collect();
            (Just(widths), prop::collection::btree_set(1..len, 0..len / 2 + 1))
                .prop_map(|(w, b)| (w, b.into_iter().collect()))
        })
    }

    proptest! {
        #[test]
        fn prop_break_budget((widths, breaks) in breakable_row(), limit in 10u8..40) {
            let limit = f32::from(limit);
            let input: MathBox = row(&widths, &breaks).into();
            let total = input.width();
            let output = split(input.clone(), limit, 0.5);

            if total <= limit {
                prop_assert_eq!(output, input);
            } else {
                let lines = line_widths(&output);
                for w in &lines[..lines.len() - 1] {
                    prop_assert!(*w <= limit);
                }
                let mut leaves = Vec::new();
                leaf_widths(&output, &mut leaves);
                prop_assert_eq!(leaves, widths);
            }
        }
    }
}
