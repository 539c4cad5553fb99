//! Box model - laid out geometric nodes
//!
//! Every box knows its width, its height above the baseline, its depth below
//! the baseline and a shift applied by the parent when the box is placed
//! (vertical inside a row, horizontal inside a stack). Metrics are computed
//! bottom-up when a box is constructed; drawing only reads them.

mod framed;
mod horizontal;
mod leaf;
mod over_under;
mod transform;
mod vertical;

pub use framed::{ColorBox, FramedBox, ShadowBox};
pub use horizontal::HorizontalBox;
pub use leaf::{CharBox, GraphicsBox, RuleBox, StrutBox};
pub use over_under::OverUnderBox;
pub use transform::{RotateBox, RotationOrigin, ScaleBox};
pub use vertical::VerticalBox;

use crate::font::FontId;
use crate::render::Canvas;
use serde::{Deserialize, Serialize};

/// Width, height, depth and shift of a box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoxMetrics {
    pub width: f32,
    /// Extent above the baseline
    pub height: f32,
    /// Extent below the baseline
    pub depth: f32,
    /// Offset applied when the box is placed inside a parent
    pub shift: f32,
}

impl BoxMetrics {
    pub fn new(width: f32, height: f32, depth: f32, shift: f32) -> Self {
        Self {
            width,
            height,
            depth,
            shift,
        }
    }

    /// Total vertical extent
    pub fn total_height(&self) -> f32 {
        self.height + self.depth
    }
}

/// Horizontal placement of a box padded to a wider width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
    /// Treated as centered when padding
    None,
}

/// Vertical placement of a box padded to a taller extent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VerticalAlignment {
    Top,
    #[default]
    Center,
    Bottom,
}

/// A laid out box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MathBox {
    /// A single glyph
    Char(CharBox),
    /// Invisible spacer (glue, kerns, struts)
    Strut(StrutBox),
    /// Filled rectangle
    Rule(RuleBox),
    /// Children laid out left to right
    Horizontal(HorizontalBox),
    /// Children stacked top to bottom
    Vertical(VerticalBox),
    Framed(FramedBox),
    Shadow(ShadowBox),
    Scale(ScaleBox),
    Rotate(RotateBox),
    Graphics(GraphicsBox),
    /// Base with a horizontal delimiter and optional script above or below
    OverUnder(OverUnderBox),
    Color(ColorBox),
}

impl MathBox {
    /// An empty box with all metrics zero
    pub fn empty() -> Self {
        MathBox::Strut(StrutBox::empty())
    }

    pub fn metrics(&self) -> &BoxMetrics {
        match self {
            MathBox::Char(b) => &b.metrics,
            MathBox::Strut(b) => &b.metrics,
            MathBox::Rule(b) => &b.metrics,
            MathBox::Horizontal(b) => b.metrics(),
            MathBox::Vertical(b) => b.metrics(),
            MathBox::Framed(b) => &b.metrics,
            MathBox::Shadow(b) => &b.metrics,
            MathBox::Scale(b) => &b.metrics,
            MathBox::Rotate(b) => &b.metrics,
            MathBox::Graphics(b) => &b.metrics,
            MathBox::OverUnder(b) => &b.metrics,
            MathBox::Color(b) => &b.metrics,
        }
    }

    /// Mutable metrics, for re-partitioning height and depth after construction
    pub fn metrics_mut(&mut self) -> &mut BoxMetrics {
        match self {
            MathBox::Char(b) => &mut b.metrics,
            MathBox::Strut(b) => &mut b.metrics,
            MathBox::Rule(b) => &mut b.metrics,
            MathBox::Horizontal(b) => b.metrics_mut(),
            MathBox::Vertical(b) => b.metrics_mut(),
            MathBox::Framed(b) => &mut b.metrics,
            MathBox::Shadow(b) => &mut b.metrics,
            MathBox::Scale(b) => &mut b.metrics,
            MathBox::Rotate(b) => &mut b.metrics,
            MathBox::Graphics(b) => &mut b.metrics,
            MathBox::OverUnder(b) => &mut b.metrics,
            MathBox::Color(b) => &mut b.metrics,
        }
    }

    pub fn width(&self) -> f32 {
        self.metrics().width
    }

    pub fn height(&self) -> f32 {
        self.metrics().height
    }

    pub fn depth(&self) -> f32 {
        self.metrics().depth
    }

    pub fn shift(&self) -> f32 {
        self.metrics().shift
    }

    pub fn total_height(&self) -> f32 {
        self.metrics().total_height()
    }

    pub fn set_width(&mut self, width: f32) {
        self.metrics_mut().width = width;
    }

    pub fn set_height(&mut self, height: f32) {
        self.metrics_mut().height = height;
    }

    pub fn set_depth(&mut self, depth: f32) {
        self.metrics_mut().depth = depth;
    }

    pub fn set_shift(&mut self, shift: f32) {
        self.metrics_mut().shift = shift;
    }

    /// Builder form of [`MathBox::set_shift`]
    pub fn shifted(mut self, shift: f32) -> Self {
        self.set_shift(shift);
        self
    }

    /// Font of the last glyph drawn by this box, if any
    pub fn last_font_id(&self) -> Option<FontId> {
        match self {
            MathBox::Char(b) => Some(b.glyph.font_id),
            MathBox::Horizontal(b) => b.last_font_id(),
            MathBox::Vertical(b) => b.last_font_id(),
            MathBox::Framed(b) => b.inner.last_font_id(),
            MathBox::Shadow(b) => b.frame.inner.last_font_id(),
            MathBox::Scale(b) => b.inner.last_font_id(),
            MathBox::Rotate(b) => b.inner.last_font_id(),
            MathBox::OverUnder(b) => b.base.last_font_id(),
            MathBox::Color(b) => b.inner.last_font_id(),
            MathBox::Strut(_) | MathBox::Rule(_) | MathBox::Graphics(_) => None,
        }
    }

    pub fn as_horizontal(&self) -> Option<&HorizontalBox> {
        match self {
            MathBox::Horizontal(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_vertical(&self) -> Option<&VerticalBox> {
        match self {
            MathBox::Vertical(b) => Some(b),
            _ => None,
        }
    }

    /// Draw the box with its reference point (left end of the baseline) at `(x, y)`
    pub fn draw(&self, canvas: &mut dyn Canvas, x: f32, y: f32) {
        match self {
            MathBox::Char(b) => b.draw(canvas, x, y),
            MathBox::Strut(_) => {}
            MathBox::Rule(b) => b.draw(canvas, x, y),
            MathBox::Horizontal(b) => b.draw(canvas, x, y),
            MathBox::Vertical(b) => b.draw(canvas, x, y),
            MathBox::Framed(b) => b.draw(canvas, x, y),
            MathBox::Shadow(b) => b.draw(canvas, x, y),
            MathBox::Scale(b) => b.draw(canvas, x, y),
            MathBox::Rotate(b) => b.draw(canvas, x, y),
            MathBox::Graphics(b) => b.draw(canvas, x, y),
            MathBox::OverUnder(b) => b.draw(canvas, x, y),
            MathBox::Color(b) => b.draw(canvas, x, y),
        }
    }
}

impl From<CharBox> for MathBox {
    fn from(b: CharBox) -> Self {
        MathBox::Char(b)
    }
}

impl From<StrutBox> for MathBox {
    fn from(b: StrutBox) -> Self {
        MathBox::Strut(b)
    }
}

impl From<RuleBox> for MathBox {
    fn from(b: RuleBox) -> Self {
        MathBox::Rule(b)
    }
}

impl From<HorizontalBox> for MathBox {
    fn from(b: HorizontalBox) -> Self {
        MathBox::Horizontal(b)
    }
}

impl From<VerticalBox> for MathBox {
    fn from(b: VerticalBox) -> Self {
        MathBox::Vertical(b)
    }
}

impl From<FramedBox> for MathBox {
    fn from(b: FramedBox) -> Self {
        MathBox::Framed(b)
    }
}

impl From<ShadowBox> for MathBox {
    fn from(b: ShadowBox) -> Self {
        MathBox::Shadow(b)
    }
}

impl From<ScaleBox> for MathBox {
    fn from(b: ScaleBox) -> Self {
        MathBox::Scale(b)
    }
}

impl From<RotateBox> for MathBox {
    fn from(b: RotateBox) -> Self {
        MathBox::Rotate(b)
    }
}

impl From<GraphicsBox> for MathBox {
    fn from(b: GraphicsBox) -> Self {
        MathBox::Graphics(b)
    }
}

impl From<OverUnderBox> for MathBox {
    fn from(b: OverUnderBox) -> Self {
        MathBox::OverUnder(b)
    }
}

impl From<ColorBox> for MathBox {
    fn from(b: ColorBox) -> Self {
        MathBox::Color(b)
    }
}
