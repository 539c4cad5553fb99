//! Vertical lists of rows: `\vbox`/`\vtop` style stacks and the multline and
//! gather displays

use super::{Atom, AtomRef};
use crate::boxes::{Alignment, HorizontalBox, MathBox, StrutBox, VerticalBox};
use crate::environment::{Environment, Unit};
use crate::error::MathResult;
use serde::{Deserialize, Serialize};

/// Which row of a [`VRowAtom`] carries the baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VRowPlacement {
    /// Baseline of the last row, like `\vbox`
    #[default]
    Bottom,
    /// Baseline of the first row, like `\vtop`
    Top,
}

/// Rows stacked top to bottom
#[derive(Debug, Default)]
pub struct VRowAtom {
    rows: Vec<AtomRef>,
    alignment: Option<Alignment>,
    interline: bool,
    placement: VRowPlacement,
    raise: Option<(Unit, f32)>,
}

impl VRowAtom {
    pub fn new(rows: Vec<AtomRef>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// Pad every row to the widest one
    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Separate rows by the environment's interline space
    pub fn with_interline(mut self) -> Self {
        self.interline = true;
        self
    }

    pub fn placed(mut self, placement: VRowPlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Raise the whole stack above the baseline of its row
    pub fn raised(mut self, unit: Unit, amount: f32) -> Self {
        self.raise = Some((unit, amount));
        self
    }

    pub fn push(&mut self, row: AtomRef) {
        self.rows.push(row);
    }
}

impl Atom for VRowAtom {
    fn create_box(&self, env: &Environment<'_>) -> MathResult<MathBox> {
        let boxes = self
            .rows
            .iter()
            .map(|row| row.create_box(env))
            .collect::<MathResult<Vec<_>>>()?;
        let width = boxes.iter().map(MathBox::width).fold(0.0f32, f32::max);
        let interline = if self.interline { env.interline() } else { 0.0 };

        let mut stack = VerticalBox::new();
        for b in boxes {
            let b = match self.alignment {
                Some(alignment) => HorizontalBox::aligned(b, width, alignment).into(),
                None => b,
            };
            stack.add_with_interline(b, interline);
        }

        let total = stack.total_height();
        let (height, depth) = match self.placement {
            VRowPlacement::Top => {
                let top = stack.children().first().map_or(0.0, MathBox::height);
                (top, total - top)
            }
            VRowPlacement::Bottom => {
                let bottom = stack.children().last().map_or(0.0, MathBox::depth);
                (total - bottom, bottom)
            }
        };
        stack.metrics_mut().height = height;
        stack.metrics_mut().depth = depth;
        if let Some((unit, amount)) = self.raise {
            stack.metrics_mut().shift = -unit.to_layout(amount, env);
        }
        Ok(stack.into())
    }
}

/// Kinds of multi-line displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MultlineKind {
    /// First line flush left, last line flush right, the rest centered
    Multline,
    /// Every line centered across the text width
    Gather,
    /// Lines centered on each other, as wide as the widest line
    Gathered,
}

/// A display of lines spread over the text width
#[derive(Debug)]
pub struct MultlineAtom {
    kind: MultlineKind,
    rows: Vec<(AtomRef, Option<Alignment>)>,
}

impl MultlineAtom {
    /// Space between lines, in ex
    const ROW_SEPARATION: f32 = 1.0;

    pub fn new(kind: MultlineKind) -> Self {
        Self { kind, rows: Vec::new() }
    }

    pub fn push(&mut self, row: AtomRef) {
        self.rows.push((row, None));
    }

    /// A line placed explicitly (`\shoveleft`, `\shoveright`)
    pub fn push_aligned(&mut self, row: AtomRef, alignment: Alignment) {
        self.rows.push((row, Some(alignment)));
    }

    fn default_alignment(&self, index: usize) -> Alignment {
        let last = self.rows.len().saturating_sub(1);
        match self.kind {
            MultlineKind::Multline if index == 0 && last > 0 => Alignment::Left,
            MultlineKind::Multline if index == last && last > 0 => Alignment::Right,
            _ => Alignment::Center,
        }
    }
}

impl Atom for MultlineAtom {
    fn create_box(&self, env: &Environment<'_>) -> MathResult<MathBox> {
        let boxes = self
            .rows
            .iter()
            .map(|(row, _)| row.create_box(env))
            .collect::<MathResult<Vec<_>>>()?;

        let text_width = match (self.kind, env.text_width()) {
            (MultlineKind::Gathered, _) | (_, None) => None,
            (_, Some(width)) => Some(width),
        };
        let width = text_width.unwrap_or_else(|| boxes.iter().map(MathBox::width).fold(0.0f32, f32::max));
        let separation = Unit::Ex.to_layout(Self::ROW_SEPARATION, env);

        let mut stack = VerticalBox::new();
        for (index, (b, (_, explicit))) in boxes.into_iter().zip(&self.rows).enumerate() {
            let alignment = match text_width {
                Some(_) => explicit.unwrap_or_else(|| self.default_alignment(index)),
                None => Alignment::Center,
            };
            if index > 0 {
                stack.add(StrutBox::vertical(separation).into());
            }
            stack.add(HorizontalBox::aligned(b, width, alignment).into());
        }

        let total = stack.total_height();
        let (height, depth) = match text_width {
            Some(_) => (total / 2.0, total / 2.0),
            // a gathered block is centered on the math axis like a matrix
            None => (total / 2.0 + env.axis_height(), total / 2.0 - env.axis_height()),
        };
        stack.metrics_mut().height = height;
        stack.metrics_mut().depth = depth;
        Ok(stack.into())
    }
}
