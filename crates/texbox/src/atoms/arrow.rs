//! Extensible arrows with material above and below (`\xrightarrow[under]{over}`)

use super::{create_or_empty, Atom, AtomRef, AtomType};
use crate::boxes::{Alignment, CharBox, HorizontalBox, MathBox, ScaleBox, StrutBox, VerticalBox};
use crate::environment::{Environment, Unit};
use crate::error::{LayoutError, MathResult};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Which ends of an extensible arrow carry a head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArrowDirection {
    Left,
    Right,
    LeftRight,
}

impl ArrowDirection {
    /// The unstretched arrow symbol
    fn symbol(self) -> &'static str {
        match self {
            ArrowDirection::Left => "leftarrow",
            ArrowDirection::Right => "rightarrow",
            ArrowDirection::LeftRight => "leftrightarrow",
        }
    }

    fn has_left_head(self) -> bool {
        matches!(self, ArrowDirection::Left | ArrowDirection::LeftRight)
    }

    fn has_right_head(self) -> bool {
        matches!(self, ArrowDirection::Right | ArrowDirection::LeftRight)
    }
}

/// Overlap between consecutive shaft pieces, in mu
const SHAFT_OVERLAP: f32 = -4.0;

/// Build an arrow at least `width` wide.
///
/// Short arrows are the plain symbol. Longer ones are heads joined by a shaft
/// of overlapping minus signs, the last one squeezed to land on `width`.
pub(crate) fn stretch_arrow(direction: ArrowDirection, env: &Environment<'_>, width: f32) -> MathResult<MathBox> {
    let font = env.font();
    let style = env.style();
    let single = font.symbol(direction.symbol(), style)?;
    let (height, depth) = (single.metrics.height, single.metrics.depth / 2.0);
    if width <= single.metrics.width {
        let mut b: MathBox = CharBox::new(single).into();
        b.set_depth(depth);
        return Ok(b);
    }

    let overlap = Unit::Mu.to_layout(SHAFT_OVERLAP, env);
    let left = direction.has_left_head().then(|| font.symbol("leftarrow", style)).transpose()?;
    let right = direction.has_right_head().then(|| font.symbol("rightarrow", style)).transpose()?;
    let heads = left.iter().chain(right.iter()).map(|g| g.metrics.width + overlap).sum::<f32>();
    let shaft = width - heads;
    if shaft <= 0.0 {
        // the heads alone are wider than asked; stretch the plain symbol instead
        let factor = width / single.metrics.width;
        return Ok(ScaleBox::new(CharBox::new(single).into(), factor, 1.0).into());
    }

    let minus = font.symbol("minus", style)?;
    let piece = minus.metrics.width;
    let step = piece + overlap;
    if !(step > 0.0) {
        return Err(LayoutError::InvalidFontMetrics(format!(
            "arrow shaft piece of width {piece} does not advance past its overlap"
        )));
    }
    let full = ((shaft - piece) / step).ceil().max(0.0) as usize;
    let max_repeats = env.config().max_extension_repeats;
    if full > max_repeats {
        return Err(LayoutError::InvalidFontMetrics(format!(
            "arrow of width {width} needs more than {max_repeats} shaft pieces"
        )));
    }
    let rest = shaft - full as f32 * step;

    let mut shaft_piece = MathBox::from(CharBox::new(minus));
    shaft_piece.set_height(0.0);
    shaft_piece.set_depth(0.0);
    let kern: MathBox = StrutBox::kern(overlap).into();

    let mut row = HorizontalBox::new();
    if let Some(head) = left {
        row.add(CharBox::new(head).into());
        row.add(kern.clone());
    }
    for _ in 0..full {
        row.add(shaft_piece.clone());
        row.add(kern.clone());
    }
    row.add(ScaleBox::new(shaft_piece, rest / piece, 1.0).into());
    if let Some(head) = right {
        row.add(kern);
        row.add(CharBox::new(head).into());
    }
    trace!(width, pieces = full + 1, "stretched arrow");

    row.metrics_mut().height = height;
    row.metrics_mut().depth = depth;
    Ok(row.into())
}

/// An arrow stretched to fit material set above and below it
#[derive(Debug)]
pub struct XArrowAtom {
    direction: ArrowDirection,
    over: Option<AtomRef>,
    under: Option<AtomRef>,
}

impl XArrowAtom {
    /// Minimum overhang of the arrow past its scripts on each side, in em
    const SIDE_SPACE: f32 = 1.5;

    /// Gap between the arrow and its scripts, in mu
    const SEPARATION: f32 = 2.0;

    pub fn new(direction: ArrowDirection, over: Option<AtomRef>, under: Option<AtomRef>) -> Self {
        Self { direction, over, under }
    }
}

impl Atom for XArrowAtom {
    fn create_box(&self, env: &Environment<'_>) -> MathResult<MathBox> {
        let (sup, sub) = (env.sup_style(), env.sub_style());
        let over = create_or_empty(self.over.as_ref(), &sup)?;
        let under = create_or_empty(self.under.as_ref(), &sub)?;
        let width = (over.width() + 2.0 * Unit::Em.to_layout(Self::SIDE_SPACE, &sup))
            .max(under.width() + 2.0 * Unit::Em.to_layout(Self::SIDE_SPACE, &sub));
        let arrow = stretch_arrow(self.direction, env, width)?;

        let width = width.max(arrow.width());
        let over: MathBox = HorizontalBox::aligned(over, width, Alignment::Center).into();
        let under: MathBox = HorizontalBox::aligned(under, width, Alignment::Center).into();
        let sep = Unit::Mu.to_layout(Self::SEPARATION, env);

        let mut stack = VerticalBox::new();
        stack.add(over);
        stack.add(StrutBox::vertical(sep).into());
        stack.add(arrow);
        stack.add(StrutBox::vertical(sep).into());
        let below = sep + under.total_height();
        stack.add(under);
        // the baseline runs along the bottom of the arrow
        let total = stack.total_height();
        stack.metrics_mut().height = total - below;
        stack.metrics_mut().depth = below;

        let padded = stack.width() + 2.0 * sep;
        Ok(HorizontalBox::aligned(stack.into(), padded, Alignment::Center).into())
    }

    fn atom_type(&self) -> AtomType {
        AtomType::Rel
    }
}
