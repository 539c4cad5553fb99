//! Boxes without children

use super::BoxMetrics;
use crate::font::Glyph;
use crate::render::{Canvas, Rect};
use serde::{Deserialize, Serialize};

/// A single glyph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharBox {
    pub(crate) metrics: BoxMetrics,
    pub(crate) glyph: Glyph,
}

impl CharBox {
    pub fn new(glyph: Glyph) -> Self {
        let m = glyph.metrics;
        Self {
            metrics: BoxMetrics::new(m.width, m.height, m.depth, 0.0),
            glyph,
        }
    }

    pub fn glyph(&self) -> &Glyph {
        &self.glyph
    }

    /// Italic correction of the glyph
    pub fn italic(&self) -> f32 {
        self.glyph.metrics.italic
    }

    pub(crate) fn draw(&self, canvas: &mut dyn Canvas, x: f32, y: f32) {
        canvas.draw_glyph(&self.glyph, x, y);
    }
}

/// An invisible spacer with explicit metrics
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StrutBox {
    pub(crate) metrics: BoxMetrics,
}

impl StrutBox {
    pub fn new(width: f32, height: f32, depth: f32, shift: f32) -> Self {
        Self {
            metrics: BoxMetrics::new(width, height, depth, shift),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// A horizontal kern
    pub fn kern(width: f32) -> Self {
        Self::new(width, 0.0, 0.0, 0.0)
    }

    /// A vertical spacer
    pub fn vertical(height: f32) -> Self {
        Self::new(0.0, height, 0.0, 0.0)
    }
}

/// A filled rectangle sitting on the baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleBox {
    pub(crate) metrics: BoxMetrics,
}

impl RuleBox {
    /// A horizontal rule of the given thickness and width, raised by `-shift`
    pub fn new(thickness: f32, width: f32, shift: f32) -> Self {
        Self {
            metrics: BoxMetrics::new(width, thickness, 0.0, shift),
        }
    }

    /// A rule with explicit height and depth
    pub fn with_extent(width: f32, height: f32, depth: f32) -> Self {
        Self {
            metrics: BoxMetrics::new(width, height, depth, 0.0),
        }
    }

    pub(crate) fn draw(&self, canvas: &mut dyn Canvas, x: f32, y: f32) {
        let m = &self.metrics;
        canvas.fill_rect(Rect::new(x, y - m.height, m.width, m.total_height()));
    }
}

/// An external image scaled to a fixed size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphicsBox {
    pub(crate) metrics: BoxMetrics,
    name: String,
}

impl GraphicsBox {
    /// The image sits on the baseline with no depth
    pub fn new(name: &str, width: f32, height: f32) -> Self {
        Self {
            metrics: BoxMetrics::new(width, height, 0.0, 0.0),
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn draw(&self, canvas: &mut dyn Canvas, x: f32, y: f32) {
        let m = &self.metrics;
        canvas.draw_image(&self.name, Rect::new(x, y - m.height, m.width, m.height));
    }
}
