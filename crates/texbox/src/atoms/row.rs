//! Rows of atoms with TeX inter-atom spacing

use super::{glue_between, Atom, AtomRef, AtomType, Dummy};
use crate::boxes::{HorizontalBox, MathBox, StrutBox};
use crate::environment::{Environment, Unit};
use crate::error::MathResult;

/// A horizontal list of atoms.
///
/// Laying out a row inserts the glue of the TeX spacing table between
/// neighbours, sets binary operators without operands as ordinary atoms,
/// adds italic correction after slanted characters and registers the
/// places where a line may end: break marks, breakable spaces and, unless
/// disabled, the point after each binary operator or relation.
#[derive(Debug, Default)]
pub struct RowAtom {
    elements: Vec<AtomRef>,
    break_after_operators: bool,
}

impl RowAtom {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            break_after_operators: true,
        }
    }

    pub fn from_atoms(elements: Vec<AtomRef>) -> Self {
        Self {
            elements,
            break_after_operators: true,
        }
    }

    /// Only break marks and breakable spaces allow line breaks
    pub fn without_operator_breaks(mut self) -> Self {
        self.break_after_operators = false;
        self
    }

    pub fn push(&mut self, atom: AtomRef) {
        self.elements.push(atom);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn first_atom(&self) -> Option<&AtomRef> {
        self.elements.iter().find(|a| !skips_glue(a.as_ref()))
    }

    fn last_atom(&self) -> Option<&AtomRef> {
        self.elements.iter().rev().find(|a| !skips_glue(a.as_ref()))
    }
}

/// Spaces and break marks are invisible to the spacing rules
fn skips_glue(atom: &dyn Atom) -> bool {
    atom.is_space() || atom.is_break_mark()
}

/// Set binary operators that have nothing to operate on as ordinary atoms
fn retype_binaries(dummies: &mut [Dummy<'_>]) {
    let visible: Vec<usize> = (0..dummies.len())
        .filter(|&i| !skips_glue(dummies[i].atom()))
        .collect();
    for (k, &i) in visible.iter().enumerate() {
        if dummies[i].atom_type() != AtomType::Bin {
            continue;
        }
        let previous = k.checked_sub(1).map(|k| dummies[visible[k]].right_type());
        let next = visible.get(k + 1).map(|&j| dummies[j].left_type());
        let no_left_operand = previous.map_or(true, |p| {
            matches!(p, AtomType::Bin | AtomType::Op | AtomType::Rel | AtomType::Open | AtomType::Punct)
        });
        let no_right_operand = next.map_or(true, |n| {
            matches!(n, AtomType::Rel | AtomType::Close | AtomType::Punct)
        });
        if no_left_operand || no_right_operand {
            dummies[i].set_type(AtomType::Ord);
        }
    }
}

impl Atom for RowAtom {
    fn create_box(&self, env: &Environment<'_>) -> MathResult<MathBox> {
        let mut dummies: Vec<Dummy<'_>> = self.elements.iter().map(|a| Dummy::new(a.as_ref())).collect();
        retype_binaries(&mut dummies);
        if env.text_style().is_some() {
            for dummy in dummies.iter_mut().filter(|d| d.atom().is_char_symbol()) {
                dummy.mark_text_symbol();
            }
        }

        let mut row = HorizontalBox::new();
        let mut previous: Option<AtomType> = None;
        let mut break_pending = false;

        for (i, dummy) in dummies.iter().enumerate() {
            let atom = dummy.atom();
            if atom.is_break_mark() {
                row.add_break_position(row.len());
                continue;
            }

            if !atom.is_space() {
                if let Some(prev) = previous {
                    let mu = glue_between(prev, dummy.left_type(), env.style());
                    if mu != 0.0 {
                        row.add(StrutBox::kern(Unit::Mu.to_layout(mu, env)).into());
                    }
                }
                if break_pending {
                    row.add_break_position(row.len());
                    break_pending = false;
                }
            }

            let b = dummy.create_box(env)?;
            let italic = match &b {
                MathBox::Char(c) if atom.is_char_symbol() && !dummy.is_text_symbol() => c.italic(),
                _ => 0.0,
            };
            row.add(b);

            let next_is_char = dummies[i + 1..]
                .iter()
                .find(|d| !d.atom().is_break_mark())
                .is_some_and(|d| d.atom().is_char_symbol());
            if italic > 0.0 && !next_is_char {
                row.add(StrutBox::kern(italic).into());
            }

            if atom.is_breakable_space() {
                row.add_break_position(row.len());
            }
            if !atom.is_space() {
                let kind = dummy.atom_type();
                break_pending = self.break_after_operators && matches!(kind, AtomType::Bin | AtomType::Rel);
                previous = Some(dummy.right_type());
            }
        }
        Ok(row.into())
    }

    fn left_type(&self) -> AtomType {
        self.first_atom().map_or(AtomType::Ord, |a| a.left_type())
    }

    fn right_type(&self) -> AtomType {
        self.last_atom().map_or(AtomType::Ord, |a| a.right_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::testing::{close, with_env};
    use crate::atoms::{BreakMarkAtom, CharAtom, SpaceAtom, SymbolAtom};

    fn ch(c: char) -> AtomRef {
        Box::new(CharAtom::new(c))
    }

    fn sym(name: &str, kind: AtomType) -> AtomRef {
        Box::new(SymbolAtom::new(name, kind))
    }

    fn row_box(atoms: Vec<AtomRef>) -> HorizontalBox {
        let row = RowAtom::from_atoms(atoms);
        with_env(|env| match row.create_box(env).unwrap() {
            MathBox::Horizontal(h) => h,
            other => panic!("expected a row, got {other:?}"),
        })
    }

    #[test]
    fn test_binary_glue() {
        // a + b: medium glue on both sides of the plus
        let row = row_box(vec![ch('a'), sym("plus", AtomType::Bin), ch('b')]);
        let medium = 4.0 / 18.0;
        let kerns: Vec<f32> = row
            .children()
            .iter()
            .filter(|c| matches!(c, MathBox::Strut(_)))
            .map(MathBox::width)
            .collect();
        // the last kern is the italic correction of b
        assert_eq!(kerns.len(), 3);
        assert!(close(kerns[0], medium));
        assert!(close(kerns[1], medium));
        assert!(close(kerns[2], 0.02));
    }

    #[test]
    fn test_leading_binary_becomes_ordinary() {
        // -a: no glue after a leading minus
        let row = row_box(vec![sym("minus", AtomType::Bin), ch('a')]);
        assert_eq!(row.len(), 3);
        assert!(matches!(row.children()[1], MathBox::Char(_)));
    }

    #[test]
    fn test_relation_glue_and_break() {
        let row = row_box(vec![ch('x'), sym("equals", AtomType::Rel), ch('y')]);
        let thick = 5.0 / 18.0;
        assert!(row.children().iter().any(|c| matches!(c, MathBox::Strut(_)) && close(c.width(), thick)));
        // the line may end after "= " and before y
        let y_index = row.len() - 2;
        assert_eq!(row.break_positions(), &[y_index]);
    }

    #[test]
    fn test_break_mark_and_breakable_space() {
        let row = row_box(vec![
            ch('a'),
            Box::new(BreakMarkAtom),
            ch('b'),
            Box::new(SpaceAtom::thin().breakable()),
            ch('c'),
        ]);
        // a, b, italic kern, space, c, italic kern
        assert_eq!(row.len(), 6);
        assert_eq!(row.break_positions(), &[1, 4]);
    }

    #[test]
    fn test_italic_correction_only_before_non_letters() {
        let row = row_box(vec![ch('f'), ch('x'), Box::new(SpaceAtom::quad())]);
        // f x  kern(x italic)  quad
        assert_eq!(row.len(), 4);
        assert!(close(row.children()[2].width(), 0.02));
    }

    #[test]
    fn test_no_operator_breaks() {
        let row = RowAtom::from_atoms(vec![ch('x'), sym("equals", AtomType::Rel), ch('y')])
            .without_operator_breaks();
        let b = with_env(|env| row.create_box(env).unwrap());
        assert!(b.as_horizontal().map_or(false, |h| h.break_positions().is_empty()));
    }

    #[test]
    fn test_row_side_types() {
        let row = RowAtom::from_atoms(vec![
            Box::new(SpaceAtom::quad()),
            sym("lbrack", AtomType::Open),
            ch('x'),
            sym("rbrack", AtomType::Close),
        ]);
        assert_eq!(row.left_type(), AtomType::Open);
        assert_eq!(row.right_type(), AtomType::Close);
        assert_eq!(RowAtom::new().left_type(), AtomType::Ord);
    }
}
