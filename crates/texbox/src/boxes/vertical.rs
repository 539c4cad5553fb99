//! Vertical box - children stacked top to bottom

use super::{BoxMetrics, MathBox, StrutBox, VerticalAlignment};
use crate::font::FontId;
use crate::render::Canvas;
use serde::{Deserialize, Serialize};

/// A stack of boxes.
///
/// The first child's height is the height of the stack; every later child
/// hangs below the baseline and adds its full extent to the depth. A child's
/// shift moves it horizontally, and the width spans the leftmost to the
/// rightmost shifted edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalBox {
    metrics: BoxMetrics,
    children: Vec<MathBox>,
    left_most: f32,
    right_most: f32,
}

impl Default for VerticalBox {
    fn default() -> Self {
        Self {
            metrics: BoxMetrics::default(),
            children: Vec::new(),
            left_most: f32::MAX,
            right_most: -f32::MAX,
        }
    }
}

impl VerticalBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pad `b` vertically with `rest` extra space
    pub fn aligned(b: MathBox, rest: f32, alignment: VerticalAlignment) -> Self {
        let mut stack = Self::new();
        stack.add(b);
        if rest <= 0.0 {
            return stack;
        }
        match alignment {
            VerticalAlignment::Center => {
                stack.insert(0, StrutBox::vertical(rest / 2.0).into());
                stack.add(StrutBox::vertical(rest / 2.0).into());
            }
            VerticalAlignment::Top => stack.add(StrutBox::vertical(rest).into()),
            VerticalAlignment::Bottom => stack.insert(0, StrutBox::vertical(rest).into()),
        }
        stack
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

    pub fn total_height(&self) -> f32 {
        self.metrics.total_height()
    }

    pub fn children(&self) -> &[MathBox] {
        &self.children
    }

    pub fn into_children(self) -> Vec<MathBox> {
        self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn recalculate_width(&mut self, b: &MathBox) {
        self.left_most = self.left_most.min(b.shift());
        self.right_most = self.right_most.max(b.shift() + b.width().max(0.0));
        self.metrics.width = self.right_most - self.left_most;
    }

    /// Append a box at the bottom
    pub fn add(&mut self, b: MathBox) {
        if self.children.is_empty() {
            self.metrics.height = b.height();
            self.metrics.depth = b.depth();
        } else {
            self.metrics.depth += b.total_height();
        }
        self.recalculate_width(&b);
        self.children.push(b);
    }

    /// Append a box, preceded by `interline` space unless it is the first one
    pub fn add_with_interline(&mut self, b: MathBox, interline: f32) {
        if !self.children.is_empty() {
            self.add(StrutBox::vertical(interline).into());
        }
        self.add(b);
    }

    /// Insert a box before the child at `index`; index 0 makes it the new top
    pub fn insert(&mut self, index: usize, b: MathBox) {
        let index = index.min(self.children.len());
        if index == 0 {
            if self.children.is_empty() {
                self.metrics.depth = b.depth();
            } else {
                self.metrics.depth += b.depth() + self.metrics.height;
            }
            self.metrics.height = b.height();
        } else {
            self.metrics.depth += b.total_height();
        }
        self.recalculate_width(&b);
        self.children.insert(index, b);
    }

    pub fn last_font_id(&self) -> Option<FontId> {
        self.children.iter().rev().find_map(MathBox::last_font_id)
    }

    pub(crate) fn draw(&self, canvas: &mut dyn Canvas, x: f32, y: f32) {
        let mut y_pos = y - self.metrics.height;
        for child in &self.children {
            y_pos += child.height();
            child.draw(canvas, x + child.shift() - self.left_most, y_pos);
            y_pos += child.depth();
        }
    }
}
