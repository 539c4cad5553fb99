//! Delimiters sized to their content: `\left ... \middle ... \right` and
//! horizontal braces

use super::{Atom, AtomRef, AtomType};
use crate::boxes::{Alignment, HorizontalBox, MathBox, OverUnderBox, StrutBox};
use crate::delimiter;
use crate::environment::{Environment, Unit};
use crate::error::MathResult;

/// `\nulldelimiterspace`, in points
const NULL_DELIMITER_SPACE: f32 = 1.2;

/// Content between a left, optional middle, and right delimiters.
///
/// A missing delimiter (`\left.`) leaves a null delimiter space.
#[derive(Debug)]
pub struct FencedAtom {
    segments: Vec<AtomRef>,
    delimiters: Vec<Option<String>>,
}

impl FencedAtom {
    pub fn new(left: Option<&str>, base: AtomRef, right: Option<&str>) -> Self {
        Self {
            segments: vec![base],
            delimiters: vec![left.map(str::to_string), right.map(str::to_string)],
        }
    }

    /// Insert a `\middle` delimiter before the right one, followed by `segment`
    pub fn with_middle(mut self, delimiter: &str, segment: AtomRef) -> Self {
        let at = self.delimiters.len() - 1;
        self.delimiters.insert(at, Some(delimiter.to_string()));
        self.segments.push(segment);
        self
    }

    fn delimiter_box(
        &self,
        name: Option<&str>,
        env: &Environment<'_>,
        min_height: f32,
    ) -> MathResult<MathBox> {
        let Some(name) = name else {
            return Ok(StrutBox::kern(Unit::Point.to_layout(NULL_DELIMITER_SPACE, env)).into());
        };
        let mut b = delimiter::create(name, env, min_height)?;
        // center on the math axis
        let shift = -(b.total_height() / 2.0 - b.height()) - env.axis_height();
        b.set_shift(shift);
        Ok(b)
    }
}

impl Atom for FencedAtom {
    fn create_box(&self, env: &Environment<'_>) -> MathResult<MathBox> {
        let contents = self
            .segments
            .iter()
            .map(|s| s.create_box(env))
            .collect::<MathResult<Vec<_>>>()?;

        let axis = env.axis_height();
        let delta = contents
            .iter()
            .map(|b| (b.height() - axis).max(b.depth() + axis))
            .fold(0.0f32, f32::max);
        let config = env.config();
        let shortfall = Unit::Point.to_layout(config.delimiter_shortfall, env);
        let min_height = (delta / 500.0 * config.delimiter_factor as f32).max(2.0 * delta - shortfall);

        let mut row = HorizontalBox::new();
        let mut contents = contents.into_iter();
        for (i, name) in self.delimiters.iter().enumerate() {
            row.add(self.delimiter_box(name.as_deref(), env, min_height)?);
            if i + 1 < self.delimiters.len() {
                if let Some(content) = contents.next() {
                    row.add(content);
                }
            }
        }
        Ok(row.into())
    }

    fn atom_type(&self) -> AtomType {
        AtomType::Inner
    }
}

/// A base with a horizontal brace over or under it, and an optional script
/// beyond the brace (`\overbrace{a+b}^{n}`)
#[derive(Debug)]
pub struct OverUnderDelimiter {
    base: AtomRef,
    script: Option<AtomRef>,
    delimiter: String,
    kern: (Unit, f32),
    over: bool,
}

impl OverUnderDelimiter {
    /// Space between the brace and the script, in ex
    const SCRIPT_KERN: f32 = 0.5;

    /// Braces stand on their side, so the right brace opens downward when turned
    pub fn overbrace(base: AtomRef, script: Option<AtomRef>) -> Self {
        Self::new(base, script, "rbrace", true)
    }

    pub fn underbrace(base: AtomRef, script: Option<AtomRef>) -> Self {
        Self::new(base, script, "lbrace", false)
    }

    pub fn new(base: AtomRef, script: Option<AtomRef>, delimiter: &str, over: bool) -> Self {
        Self {
            base,
            script,
            delimiter: delimiter.to_string(),
            kern: (Unit::Ex, Self::SCRIPT_KERN),
            over,
        }
    }

    pub fn with_kern(mut self, unit: Unit, kern: f32) -> Self {
        self.kern = (unit, kern);
        self
    }
}

impl Atom for OverUnderDelimiter {
    fn create_box(&self, env: &Environment<'_>) -> MathResult<MathBox> {
        let base = self.base.create_box(env)?;
        let delimiter = delimiter::create(&self.delimiter, env, base.width())?;
        let script = match &self.script {
            Some(s) if self.over => Some(s.create_box(&env.sup_style())?),
            Some(s) => Some(s.create_box(&env.sub_style())?),
            None => None,
        };

        let width = script
            .as_ref()
            .map_or(0.0, MathBox::width)
            .max(base.width())
            .max(delimiter.total_height());
        let pad = |b: MathBox| -> MathBox {
            if width - b.width() > f32::EPSILON {
                HorizontalBox::aligned(b, width, Alignment::Center).into()
            } else {
                b
            }
        };
        let kern = self.kern.0.to_layout(self.kern.1, env);
        Ok(OverUnderBox::new(pad(base), delimiter, script.map(pad), kern, self.over).into())
    }

    fn atom_type(&self) -> AtomType {
        self.base.atom_type()
    }
}
