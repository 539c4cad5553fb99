//! Leaf atoms: characters, symbols, spaces and rules

use super::{Atom, AtomRef, AtomType};
use crate::boxes::{CharBox, MathBox, RuleBox, StrutBox};
use crate::environment::{Environment, Unit};
use crate::error::MathResult;

/// A single character
#[derive(Debug, Clone, PartialEq)]
pub struct CharAtom {
    ch: char,
    text_style: Option<String>,
}

impl CharAtom {
    pub fn new(ch: char) -> Self {
        Self { ch, text_style: None }
    }

    /// A character drawn from a named text style regardless of the environment
    pub fn with_text_style(ch: char, text_style: &str) -> Self {
        Self {
            ch,
            text_style: Some(text_style.to_string()),
        }
    }

    pub fn ch(&self) -> char {
        self.ch
    }
}

impl Atom for CharAtom {
    fn create_box(&self, env: &Environment<'_>) -> MathResult<MathBox> {
        let font = env.font();
        let glyph = match self.text_style.as_deref().or(env.text_style()) {
            Some(text_style) => font.text_glyph(self.ch, text_style, env.style())?,
            None => font.glyph(self.ch, env.style())?,
        };
        Ok(CharBox::new(glyph).into())
    }

    fn is_char_symbol(&self) -> bool {
        true
    }
}

/// A named symbol from the font (`plus`, `leftarrow`, `lbrack`, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolAtom {
    name: String,
    kind: AtomType,
}

impl SymbolAtom {
    pub fn new(name: &str, kind: AtomType) -> Self {
        Self {
            name: name.to_string(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Atom for SymbolAtom {
    fn create_box(&self, env: &Environment<'_>) -> MathResult<MathBox> {
        let glyph = env.font().symbol(&self.name, env.style())?;
        Ok(CharBox::new(glyph).into())
    }

    fn atom_type(&self) -> AtomType {
        self.kind
    }

    fn is_char_symbol(&self) -> bool {
        true
    }
}

/// Lays out as nothing
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EmptyAtom;

impl Atom for EmptyAtom {
    fn create_box(&self, _env: &Environment<'_>) -> MathResult<MathBox> {
        Ok(MathBox::empty())
    }
}

/// Marks a place in a row where a line may end
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BreakMarkAtom;

impl Atom for BreakMarkAtom {
    fn create_box(&self, _env: &Environment<'_>) -> MathResult<MathBox> {
        Ok(MathBox::empty())
    }

    fn is_break_mark(&self) -> bool {
        true
    }
}

/// Explicit glue with a width, height and depth in some unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpaceAtom {
    unit: Unit,
    width: f32,
    height: f32,
    depth: f32,
    breakable: bool,
}

impl SpaceAtom {
    pub fn new(unit: Unit, width: f32, height: f32, depth: f32) -> Self {
        Self {
            unit,
            width,
            height,
            depth,
            breakable: false,
        }
    }

    /// Horizontal space only
    pub fn horizontal(unit: Unit, width: f32) -> Self {
        Self::new(unit, width, 0.0, 0.0)
    }

    /// `\,`
    pub fn thin() -> Self {
        Self::horizontal(Unit::Mu, 3.0)
    }

    /// `\:`
    pub fn medium() -> Self {
        Self::horizontal(Unit::Mu, 4.0)
    }

    /// `\;`
    pub fn thick() -> Self {
        Self::horizontal(Unit::Mu, 5.0)
    }

    /// `\!`
    pub fn negative_thin() -> Self {
        Self::horizontal(Unit::Mu, -3.0)
    }

    pub fn quad() -> Self {
        Self::horizontal(Unit::Em, 1.0)
    }

    /// Allow a line to end after this space
    pub fn breakable(mut self) -> Self {
        self.breakable = true;
        self
    }
}

impl Atom for SpaceAtom {
    fn create_box(&self, env: &Environment<'_>) -> MathResult<MathBox> {
        let factor = self.unit.factor(env);
        Ok(StrutBox::new(self.width * factor, self.height * factor, self.depth * factor, 0.0).into())
    }

    fn is_space(&self) -> bool {
        true
    }

    fn is_breakable_space(&self) -> bool {
        self.breakable
    }
}

/// A filled rectangle, optionally raised above the baseline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleAtom {
    unit: Unit,
    width: f32,
    height: f32,
    raise: f32,
}

impl RuleAtom {
    pub fn new(unit: Unit, width: f32, height: f32, raise: f32) -> Self {
        Self {
            unit,
            width,
            height,
            raise,
        }
    }
}

impl Atom for RuleAtom {
    fn create_box(&self, env: &Environment<'_>) -> MathResult<MathBox> {
        let factor = self.unit.factor(env);
        Ok(RuleBox::new(self.height * factor, self.width * factor, -self.raise * factor).into())
    }
}

/// An atom given explicit classes on its left and right sides
#[derive(Debug)]
pub struct TypedAtom {
    left: AtomType,
    right: AtomType,
    base: AtomRef,
}

impl TypedAtom {
    pub fn new(left: AtomType, right: AtomType, base: AtomRef) -> Self {
        Self { left, right, base }
    }

    /// The same class on both sides
    pub fn uniform(kind: AtomType, base: AtomRef) -> Self {
        Self::new(kind, kind, base)
    }
}

impl Atom for TypedAtom {
    fn create_box(&self, env: &Environment<'_>) -> MathResult<MathBox> {
        self.base.create_box(env)
    }

    fn atom_type(&self) -> AtomType {
        self.left
    }

    fn left_type(&self) -> AtomType {
        self.left
    }

    fn right_type(&self) -> AtomType {
        self.right
    }

    fn is_char_symbol(&self) -> bool {
        self.base.is_char_symbol()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::testing::{close, with_env};
    use crate::error::LayoutError;

    #[test]
    fn test_char_atom_uses_text_style() {
        let (math, upright) = with_env(|env| {
            let math = CharAtom::new('x').create_box(env).unwrap();
            let upright = CharAtom::new('x').create_box(&env.with_text_style("mathrm")).unwrap();
            (math, upright)
        });
        assert_eq!(math.last_font_id(), Some(1));
        assert_eq!(upright.last_font_id(), Some(0));
    }

    #[test]
    fn test_missing_char() {
        let err = with_env(|env| CharAtom::new('\u{4E00}').create_box(env).unwrap_err());
        assert!(matches!(err, LayoutError::MissingGlyph { ch: '\u{4E00}', .. }));
    }

    #[test]
    fn test_space_units() {
        let b = with_env(|env| SpaceAtom::thin().create_box(env).unwrap());
        assert!(close(b.width(), 3.0 / 18.0));
        let b = with_env(|env| SpaceAtom::new(Unit::Em, 1.0, 0.5, 0.25).create_box(env).unwrap());
        assert_eq!((b.width(), b.height(), b.depth()), (1.0, 0.5, 0.25));
        assert!(SpaceAtom::thin().breakable().is_breakable_space());
    }

    #[test]
    fn test_rule_raise() {
        let b = with_env(|env| RuleAtom::new(Unit::Em, 2.0, 0.1, 0.5).create_box(env).unwrap());
        assert_eq!(b.width(), 2.0);
        assert!(close(b.height(), 0.1));
        assert_eq!(b.shift(), -0.5);
    }

    #[test]
    fn test_typed_atom_sides() {
        let typed = TypedAtom::new(AtomType::Open, AtomType::Close, Box::new(CharAtom::new('x')));
        assert_eq!(typed.left_type(), AtomType::Open);
        assert_eq!(typed.right_type(), AtomType::Close);
        assert!(typed.is_char_symbol());
    }
}
