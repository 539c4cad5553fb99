//! Texbox - TeX box layout for mathematical formulas
//!
//! This crate turns a tree of formula atoms into a tree of geometric boxes:
//! - A box model of glyphs, rows, stacks, struts, rules and framed, colored,
//!   scaled or rotated boxes with bottom-up metrics
//! - Stretchable delimiters built from larger glyph variants or assembled
//!   from extension pieces
//! - Atoms for fractions, radicals, fences, braces, extensible arrows,
//!   phantoms and multi-line displays
//! - Formula breaking that re-flows a wide row into lines within a width
//! - Rendering of the box tree to draw primitives

pub mod atoms;
pub mod boxes;
pub mod breaking;
pub mod commands;
pub mod config;
pub mod delimiter;
pub mod environment;
pub mod error;
pub mod font;
pub mod formula;
pub mod render;
pub mod style;

pub use atoms::{
    glue_between, ArrowDirection, Atom, AtomRef, AtomType, BreakMarkAtom, CharAtom, ColorAtom, Dummy,
    EmptyAtom, FBoxAtom, FencedAtom, FractionAtom, GraphicsAtom, MultlineAtom, MultlineKind, NthRoot,
    OverUnderDelimiter, PhantomAtom, ResizeAtom, RotateAtom, RowAtom, RuleAtom, ScaleAtom, ShadowAtom,
    SmashedAtom, SpaceAtom, SymbolAtom, TypedAtom, VRowAtom, VRowPlacement, XArrowAtom,
};
pub use boxes::{
    Alignment, BoxMetrics, CharBox, ColorBox, FramedBox, GraphicsBox, HorizontalBox, MathBox,
    OverUnderBox, RotateBox, RotationOrigin, RuleBox, ScaleBox, ShadowBox, StrutBox, VerticalAlignment,
    VerticalBox,
};
pub use commands::{CommandRegistry, Constructor};
pub use config::LayoutConfig;
pub use environment::{Environment, RenderFlags, Unit};
pub use error::*;
pub use font::{Extension, FontId, FontParams, Glyph, GlyphMetrics, MathFont, TableFont};
pub use formula::{Formula, FormulaLayout};
pub use render::{
    Canvas, Color, Point, RecordingCanvas, Rect, RenderConfig, RenderOutput, RenderPrimitive, Renderer,
    Transform,
};
pub use style::TexStyle;
