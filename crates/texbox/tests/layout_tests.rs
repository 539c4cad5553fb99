//! Integration tests for formula layout
//! Tests formula breaking, delimiter sizing and degenerate transforms through
//! the public API, from atoms to the laid-out box tree.

use proptest::prelude::*;
use texbox::{
    delimiter, AtomRef, BreakMarkAtom, CharAtom, CommandRegistry, Environment, Formula, LayoutConfig,
    LayoutError, MathBox, RenderFlags, RowAtom, ScaleAtom, SpaceAtom, TableFont, TexStyle, Unit,
};

fn strut(width: f32) -> AtomRef {
    Box::new(SpaceAtom::new(Unit::Em, width, 0.5, 0.1))
}

/// A row of struts with a break position between every two of them
fn breakable_row(widths: &[f32]) -> RowAtom {
    let mut row = RowAtom::new();
    for (i, &w) in widths.iter().enumerate() {
        if i > 0 {
            row.push(Box::new(BreakMarkAtom));
        }
        row.push(strut(w));
    }
    row
}

fn text_config() -> LayoutConfig {
    LayoutConfig::default().with_style(TexStyle::Text)
}

/// Widths of the lines of a broken formula, or of the single unbroken row
fn line_widths(b: &MathBox) -> Vec<f32> {
    match b.as_vertical() {
        Some(lines) => lines
            .children()
            .iter()
            .filter(|c| matches!(c, MathBox::Horizontal(_)))
            .map(MathBox::width)
            .collect(),
        None => vec![b.width()],
    }
}

#[test]
fn test_nested_row_is_cut_inside() {
    // 2 | (1 . 1 . 1) | 1 with breaks only inside the nested row
    let inner = breakable_row(&[1.0, 1.0, 1.0]);
    let outer = RowAtom::from_atoms(vec![strut(2.0), Box::new(inner), strut(1.0)]);

    let font = TableFont::approximate();
    let config = text_config().with_max_width(3.5);
    let layout = Formula::new(Box::new(outer)).layout(&font, &config).unwrap();
    assert_eq!(line_widths(layout.root()), vec![3.0, 3.0]);

    // both halves keep the nested row as a row of their own
    let lines = layout.root().as_vertical().expect("broken formula");
    let first = lines.children()[0].as_horizontal().expect("first line");
    assert!(matches!(first.children().last(), Some(MathBox::Horizontal(_))));
    let last = lines.children()[2].as_horizontal().expect("last line");
    assert!(matches!(last.children().first(), Some(MathBox::Horizontal(_))));
}

#[test]
fn test_unbreakable_row_overflows() {
    let row = RowAtom::from_atoms(vec![strut(2.0), strut(2.0)]);
    let font = TableFont::approximate();
    let layout = Formula::new(Box::new(row)).layout(&font, &text_config().with_max_width(1.0)).unwrap();
    assert!(matches!(layout.root(), MathBox::Horizontal(_)));
    assert_eq!(layout.width(), 4.0);
}

#[test]
fn test_nan_scale_collapses() {
    let scaled = ScaleAtom::new(Box::new(CharAtom::new('x')), f32::NAN, 1.0);
    let font = TableFont::approximate();
    let layout = Formula::new(Box::new(scaled)).layout(&font, &text_config()).unwrap();
    assert_eq!(layout.width(), 0.0);
    assert!(layout.width().is_finite());
}

#[test]
fn test_command_errors_carry_position() {
    let registry = CommandRegistry::with_defaults();
    let err = registry.invoke("frac", vec![strut(1.0)], 3, 14).unwrap_err();
    match err {
        LayoutError::FormulaParse { command, line, column, .. } => {
            assert_eq!(command, "frac");
            assert_eq!((line, column), (3, 14));
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn test_config_document_defaults() {
    let config = LayoutConfig::from_json("layout.json", r#"{ "maxWidth": 12.5, "style": "Text" }"#).unwrap();
    assert_eq!(config.max_width, Some(12.5));
    assert_eq!(config.style, TexStyle::Text);
    assert_eq!(config.delimiter_factor, 901);

    let err = LayoutConfig::from_json("layout.json", r#"{ "fontSize": -3 }"#).unwrap_err();
    assert!(matches!(err, LayoutError::ResourceParse { .. }));
}

proptest! {
    #[test]
    fn prop_lines_fit_the_budget(
        widths in proptest::collection::vec(0.1f32..2.0, 1..24),
        max_width in 2.0f32..8.0,
    ) {
        let font = TableFont::approximate();
        let config = text_config().with_max_width(max_width);
        let total: f32 = widths.iter().sum();
        let layout = Formula::new(Box::new(breakable_row(&widths))).layout(&font, &config).unwrap();

        let lines = line_widths(layout.root());
        for w in &lines {
            prop_assert!(*w <= max_width + 1e-3, "line of {} over {}", w, max_width);
        }
        let laid_out: f32 = lines.iter().sum();
        prop_assert!((laid_out - total).abs() < 1e-3);
    }

    #[test]
    fn prop_delimiters_reach_requested_height(
        name in prop::sample::select(vec!["lbrack", "rbrack", "lbrace", "vert", "sqrt"]),
        min_height in 0.1f32..40.0,
    ) {
        let font = TableFont::approximate();
        let config = text_config();
        let flags = RenderFlags::new();
        let env = Environment::new(&font, &config, &flags);
        let b = delimiter::create(name, &env, min_height).unwrap();
        prop_assert!(b.total_height() + 1e-4 >= min_height);
    }
}
