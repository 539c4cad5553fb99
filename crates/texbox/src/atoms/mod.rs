//! Atom layer - formula tree nodes that lay themselves out as boxes
//!
//! Every node of a parsed formula implements [`Atom`]. Layout is a single
//! recursive call: an atom builds the boxes of its children in derived
//! environments and composes them into its own box.

mod arrow;
mod basic;
mod decor;
mod fenced;
mod fraction;
mod row;
mod stack;

pub use arrow::{ArrowDirection, XArrowAtom};
pub use basic::{BreakMarkAtom, CharAtom, EmptyAtom, RuleAtom, SpaceAtom, SymbolAtom, TypedAtom};
pub use decor::{
    ColorAtom, FBoxAtom, GraphicsAtom, PhantomAtom, ResizeAtom, RotateAtom, ScaleAtom, ShadowAtom,
    SmashedAtom,
};
pub use fenced::{FencedAtom, OverUnderDelimiter};
pub use fraction::{FractionAtom, NthRoot};
pub use row::RowAtom;
pub use stack::{MultlineAtom, MultlineKind, VRowAtom, VRowPlacement};

use crate::boxes::MathBox;
use crate::environment::Environment;
use crate::error::MathResult;
use crate::style::TexStyle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// TeX atom classes, which decide the glue between neighbours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AtomType {
    #[default]
    Ord,
    /// Large operator
    Op,
    /// Binary operator
    Bin,
    /// Relation
    Rel,
    Open,
    Close,
    Punct,
    /// Fraction or fenced group
    Inner,
}

impl AtomType {
    fn index(self) -> usize {
        self as usize
    }
}

/// Glue between two atoms, in math units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Glue {
    Zero,
    Thin,
    Med,
    Thick,
}

impl Glue {
    fn mu(self) -> f32 {
        match self {
            Glue::Zero => 0.0,
            Glue::Thin => 3.0,
            Glue::Med => 4.0,
            Glue::Thick => 5.0,
        }
    }
}

use Glue::{Med as M, Thick as K, Thin as T, Zero as Z};

/// TeXbook chapter 18 spacing table, rows left and columns right
const GLUE: [[Glue; 8]; 8] = [
    [Z, T, M, K, Z, Z, Z, T],
    [T, T, Z, K, Z, Z, Z, T],
    [M, M, Z, Z, M, Z, Z, M],
    [K, K, Z, Z, K, Z, Z, K],
    [Z, Z, Z, Z, Z, Z, Z, Z],
    [Z, T, M, K, Z, Z, Z, T],
    [T, T, Z, T, T, T, T, T],
    [T, T, M, K, T, Z, T, T],
];

/// Entries that vanish in script and scriptscript styles
const SCRIPT_GLUE: [[bool; 8]; 8] = [
    [false, false, true, true, false, false, false, true],
    [false, false, false, true, false, false, false, true],
    [true, true, false, false, true, false, false, true],
    [true, true, false, false, true, false, false, true],
    [false; 8],
    [false, false, true, true, false, false, false, true],
    [true, true, false, true, true, true, true, true],
    [true, false, true, true, true, false, true, true],
];

/// Glue in math units between a `left` and a `right` atom
pub fn glue_between(left: AtomType, right: AtomType, style: TexStyle) -> f32 {
    let (l, r) = (left.index(), right.index());
    if style.is_script_or_smaller() && SCRIPT_GLUE[l][r] {
        return 0.0;
    }
    GLUE[l][r].mu()
}

/// A node of the formula tree
pub trait Atom: fmt::Debug + Send + Sync {
    /// Lay the atom out in `env`
    fn create_box(&self, env: &Environment<'_>) -> MathResult<MathBox>;

    fn atom_type(&self) -> AtomType {
        AtomType::Ord
    }

    /// Class seen by the atom on the left
    fn left_type(&self) -> AtomType {
        self.atom_type()
    }

    /// Class seen by the atom on the right
    fn right_type(&self) -> AtomType {
        self.atom_type()
    }

    /// True for single characters, which get italic correction
    fn is_char_symbol(&self) -> bool {
        false
    }

    fn is_break_mark(&self) -> bool {
        false
    }

    /// Explicit spaces take no part in inter-atom glue
    fn is_space(&self) -> bool {
        false
    }

    /// A space after which a line may end
    fn is_breakable_space(&self) -> bool {
        false
    }
}

/// Owned formula tree node
pub type AtomRef = Box<dyn Atom>;

/// Lay out an optional atom, giving an empty box when absent
pub(crate) fn create_or_empty(atom: Option<&AtomRef>, env: &Environment<'_>) -> MathResult<MathBox> {
    match atom {
        Some(atom) => atom.create_box(env),
        None => Ok(MathBox::empty()),
    }
}

/// A borrowed atom seen through a row's eyes.
///
/// The row may retype an atom (a binary operator with nothing to operate on
/// is set as an ordinary atom) or treat a character as text. Those decisions
/// live here; the wrapped atom itself is never touched.
#[derive(Debug, Clone, Copy)]
pub struct Dummy<'a> {
    atom: &'a dyn Atom,
    kind: Option<AtomType>,
    text_symbol: bool,
}

impl<'a> Dummy<'a> {
    pub fn new(atom: &'a dyn Atom) -> Self {
        Self {
            atom,
            kind: None,
            text_symbol: false,
        }
    }

    pub fn atom(&self) -> &'a dyn Atom {
        self.atom
    }

    pub fn set_type(&mut self, kind: AtomType) {
        self.kind = Some(kind);
    }

    pub fn mark_text_symbol(&mut self) {
        self.text_symbol = true;
    }

    pub fn is_text_symbol(&self) -> bool {
        self.text_symbol
    }

    pub fn atom_type(&self) -> AtomType {
        self.kind.unwrap_or_else(|| self.atom.atom_type())
    }

    pub fn left_type(&self) -> AtomType {
        self.kind.unwrap_or_else(|| self.atom.left_type())
    }

    pub fn right_type(&self) -> AtomType {
        self.kind.unwrap_or_else(|| self.atom.right_type())
    }

    pub fn create_box(&self, env: &Environment<'_>) -> MathResult<MathBox> {
        self.atom.create_box(env)
    }
}
