//! Fractions and radicals

use super::{Atom, AtomRef, AtomType};
use crate::boxes::{Alignment, HorizontalBox, MathBox, RuleBox, StrutBox, VerticalBox};
use crate::delimiter;
use crate::environment::{Environment, Unit};
use crate::error::MathResult;

// Numerator and denominator shifts of cmsy10, in em
const NUM1: f32 = 0.676_508;
const NUM2: f32 = 0.393_732;
const NUM3: f32 = 0.443_731;
const DENOM1: f32 = 0.685_951;
const DENOM2: f32 = 0.344_841;

/// `\nulldelimiterspace`, in points
const NULL_DELIMITER_SPACE: f32 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Bar {
    Default,
    Hidden,
    Explicit(Unit, f32),
}

/// A numerator over a denominator, with or without a fraction bar
#[derive(Debug)]
pub struct FractionAtom {
    numerator: AtomRef,
    denominator: AtomRef,
    bar: Bar,
    num_alignment: Alignment,
    denom_alignment: Alignment,
}

impl FractionAtom {
    pub fn new(numerator: AtomRef, denominator: AtomRef) -> Self {
        Self {
            numerator,
            denominator,
            bar: Bar::Default,
            num_alignment: Alignment::Center,
            denom_alignment: Alignment::Center,
        }
    }

    /// No bar, as in binomial coefficients
    pub fn without_bar(mut self) -> Self {
        self.bar = Bar::Hidden;
        self
    }

    pub fn with_bar_thickness(mut self, unit: Unit, thickness: f32) -> Self {
        self.bar = Bar::Explicit(unit, thickness);
        self
    }

    /// How the narrower of numerator and denominator is placed
    pub fn with_alignment(mut self, numerator: Alignment, denominator: Alignment) -> Self {
        self.num_alignment = numerator;
        self.denom_alignment = denominator;
        self
    }

    fn thickness(&self, env: &Environment<'_>) -> f32 {
        match self.bar {
            Bar::Default => env.rule_thickness(),
            Bar::Hidden => 0.0,
            Bar::Explicit(unit, t) => unit.to_layout(t, env),
        }
    }
}

impl Atom for FractionAtom {
    fn create_box(&self, env: &Environment<'_>) -> MathResult<MathBox> {
        let num = self.numerator.create_box(&env.num_style())?;
        let denom = self.denominator.create_box(&env.denom_style())?;
        let width = num.width().max(denom.width());
        let num: MathBox = HorizontalBox::aligned(num, width, self.num_alignment).into();
        let denom: MathBox = HorizontalBox::aligned(denom, width, self.denom_alignment).into();

        let num_height = num.height();
        let theta = self.thickness(env);
        let display = env.style().is_display();
        let scale = env.font().size_factor(env.style());
        let axis = env.axis_height();
        let (mut shift_up, mut shift_down) = match (display, theta > 0.0) {
            (true, _) => (NUM1, DENOM1),
            (false, true) => (NUM2, DENOM2),
            (false, false) => (NUM3, DENOM2),
        };
        shift_up *= scale;
        shift_down *= scale;

        let mut stack = VerticalBox::new();
        if theta > 0.0 {
            let clearance = if display { 3.0 * theta } else { theta };
            let mut kern_num = shift_up - num.depth() - (axis + theta / 2.0);
            if kern_num < clearance {
                shift_up += clearance - kern_num;
                kern_num = clearance;
            }
            let mut kern_denom = (axis - theta / 2.0) - (denom.height() - shift_down);
            if kern_denom < clearance {
                shift_down += clearance - kern_denom;
                kern_denom = clearance;
            }
            stack.add(num);
            stack.add(StrutBox::vertical(kern_num).into());
            stack.add(RuleBox::new(theta, width, 0.0).into());
            stack.add(StrutBox::vertical(kern_denom).into());
        } else {
            let drt = env.rule_thickness();
            let clearance = if display { 7.0 * drt } else { 3.0 * drt };
            let gap = (shift_up - num.depth()) - (denom.height() - shift_down);
            if gap < clearance {
                let half = (clearance - gap) / 2.0;
                shift_up += half;
                shift_down += half;
            }
            let kern = (shift_up - num.depth()) - (denom.height() - shift_down);
            stack.add(num);
            stack.add(StrutBox::vertical(kern).into());
        }
        let denom_depth = denom.depth();
        stack.add(denom);

        // re-baseline the stack so the bar sits on the math axis
        stack.metrics_mut().height = shift_up + num_height;
        stack.metrics_mut().depth = shift_down + denom_depth;

        let space = StrutBox::kern(Unit::Point.to_layout(NULL_DELIMITER_SPACE, env));
        let mut row = HorizontalBox::new();
        row.add(space.into());
        row.add(stack.into());
        row.add(space.into());
        Ok(row.into())
    }

    fn atom_type(&self) -> AtomType {
        AtomType::Inner
    }
}

/// `\sqrt` and `\sqrt[n]`
#[derive(Debug)]
pub struct NthRoot {
    base: AtomRef,
    index: Option<AtomRef>,
}

impl NthRoot {
    /// Height of the bottom of the index, as a fraction of the radical's extent
    const INDEX_RAISE: f32 = 0.55;

    pub fn sqrt(base: AtomRef) -> Self {
        Self { base, index: None }
    }

    pub fn new(base: AtomRef, index: AtomRef) -> Self {
        Self {
            base,
            index: Some(index),
        }
    }
}

impl Atom for NthRoot {
    fn create_box(&self, env: &Environment<'_>) -> MathResult<MathBox> {
        let drt = env.rule_thickness();
        let cramped = env.cramp_style();
        let extra = if env.style().is_display() { env.x_height() } else { drt };
        let mut clearance = drt + extra.abs() / 4.0;

        let mut radicand = HorizontalBox::from_box(self.base.create_box(&cramped)?);
        radicand.add(StrutBox::kern(Unit::Mu.to_layout(1.0, &cramped)).into());
        let (inner_height, inner_depth) = (radicand.height(), radicand.depth());
        let inner_total = inner_height + inner_depth;

        let mut sign = delimiter::create("sqrt", env, inner_total + clearance + drt)?;
        let excess = sign.total_height() - (inner_total + clearance + drt);
        if excess > 0.0 {
            clearance += excess / 2.0;
        }
        // top of the sign meets the top of the bar
        let top = inner_height + clearance + drt;
        sign.set_shift(sign.height() - top);

        let mut over_bar = VerticalBox::new();
        over_bar.add(RuleBox::new(drt, radicand.width(), 0.0).into());
        over_bar.add(StrutBox::vertical(clearance).into());
        over_bar.add(radicand.into());
        over_bar.metrics_mut().height = top;
        over_bar.metrics_mut().depth = inner_depth;

        let mut root = HorizontalBox::from_box(sign);
        root.add(over_bar.into());

        let Some(index) = &self.index else {
            return Ok(root.into());
        };
        let mut index_box = index.create_box(&env.root_style())?;
        let bottom = Self::INDEX_RAISE * root.metrics().total_height();
        index_box.set_shift(root.depth() - index_box.depth() - bottom);

        let back = Unit::Mu.to_layout(-10.0, env);
        let overhang = index_box.width() + back;
        let mut result = HorizontalBox::new();
        if overhang < 0.0 {
            result.add(StrutBox::kern(-overhang).into());
        }
        result.add(index_box);
        result.add(StrutBox::kern(back).into());
        result.add(root.into());
        Ok(result.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::testing::{close, with_config, with_env};
    use crate::atoms::{CharAtom, RuleAtom};
    use crate::config::LayoutConfig;

    fn rule(width: f32, height: f32) -> AtomRef {
        Box::new(RuleAtom::new(Unit::Em, width, height, 0.0))
    }

    fn stack_of(b: &MathBox) -> &VerticalBox {
        b.as_horizontal()
            .and_then(|h| h.children()[1].as_vertical())
            .expect("fraction stack")
    }

    #[test]
    fn test_text_fraction_shifts() {
        let (b, num_height, scale) = with_env(|env| {
            let b = FractionAtom::new(rule(1.0, 0.5), rule(2.0, 0.5)).create_box(env).unwrap();
            let num = env.num_style();
            (b, 0.5 * num.quad(), env.font().size_factor(env.style()))
        });
        let stack = stack_of(&b);
        assert_eq!(stack.len(), 5);
        assert!(close(stack.height(), NUM2 * scale + num_height));
        assert!(close(stack.depth(), DENOM2 * scale));
        assert!(close(b.width(), stack.width() + 2.0 * 1.2 / 20.0));
    }

    #[test]
    fn test_narrow_part_is_centered() {
        let b = with_env(|env| FractionAtom::new(rule(1.0, 0.5), rule(2.0, 0.5)).create_box(env).unwrap());
        let stack = stack_of(&b);
        let num = stack.children()[0].as_horizontal().expect("padded numerator");
        assert_eq!(num.len(), 3);
        assert!(close(num.width(), stack.children()[4].width()));
    }

    #[test]
    fn test_bar_clears_tall_parts() {
        let b = with_config(LayoutConfig::default(), |env| {
            FractionAtom::new(rule(1.0, 3.0), rule(1.0, 3.0)).create_box(env).unwrap()
        });
        let stack = stack_of(&b);
        let kern_above_bar = stack.children()[1].height();
        assert!(kern_above_bar >= 3.0 * 0.04 - 1e-6);
        assert!(stack.height() > 3.0);
    }

    #[test]
    fn test_without_bar() {
        let b = with_env(|env| {
            FractionAtom::new(Box::new(CharAtom::new('n')), Box::new(CharAtom::new('k')))
                .without_bar()
                .create_box(env)
                .unwrap()
        });
        let stack = stack_of(&b);
        assert_eq!(stack.len(), 3);
        assert!(!stack.children().iter().any(|c| matches!(c, MathBox::Rule(_))));
        assert_eq!(FractionAtom::new(rule(1.0, 1.0), rule(1.0, 1.0)).atom_type(), AtomType::Inner);
    }

    #[test]
    fn test_sqrt_covers_radicand() {
        let b = with_env(|env| NthRoot::sqrt(rule(2.0, 3.5)).create_box(env).unwrap());
        let row = b.as_horizontal().expect("radical row");
        assert_eq!(row.len(), 2);
        assert!(b.width() > 2.0);
        assert!(b.height() >= 3.5 + 0.04);
        // taller than the largest discrete size, so the sign is assembled
        assert!(matches!(row.children()[0], MathBox::Vertical(_)));
    }

    #[test]
    fn test_root_index_sits_left_of_sign() {
        let b = with_env(|env| {
            NthRoot::new(Box::new(CharAtom::new('x')), Box::new(CharAtom::new('n')))
                .create_box(env)
                .unwrap()
        });
        let row = b.as_horizontal().expect("root row");
        // the index is narrower than the back kern, so the row starts with padding
        assert_eq!(row.len(), 4);
        assert!(matches!(row.children()[0], MathBox::Strut(_)));
        assert!(row.children()[1].shift() < 0.0);
    }
}
