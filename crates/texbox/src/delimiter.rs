//! Stretchable delimiters
//!
//! A delimiter is either one of the font's discrete sizes or, when even the
//! largest size is too small, an assembly of extension pieces stacked in a
//! [`VerticalBox`].

use crate::boxes::{CharBox, MathBox, VerticalBox};
use crate::environment::Environment;
use crate::error::{LayoutError, MathResult};
use crate::font::{Extension, Glyph};
use tracing::{trace, warn};

/// Build the smallest rendering of the delimiter `name` whose total height
/// reaches `min_height`.
///
/// When the font has neither a tall enough size nor an extensible family,
/// the tallest size is returned and the delimiter comes out short.
pub fn create(name: &str, env: &Environment<'_>, min_height: f32) -> MathResult<MathBox> {
    let font = env.font();
    let style = env.style();
    let mut glyph = font.symbol(name, style)?;
    let max_steps = env.config().max_extension_repeats;
    let mut steps = 0;
    while glyph.metrics.total_height() < min_height {
        let Some(larger) = font.next_larger(&glyph, style) else {
            break;
        };
        steps += 1;
        if steps > max_steps {
            return Err(LayoutError::InvalidFontMetrics(format!(
                "delimiter {name} has more than {max_steps} larger variants"
            )));
        }
        glyph = larger;
    }
    if glyph.metrics.total_height() >= min_height {
        return Ok(CharBox::new(glyph).into());
    }

    match font.extension(&glyph, style) {
        Some(ext) => assemble(name, &ext, min_height, env.config().max_extension_repeats),
        None => {
            warn!(
                delimiter = name,
                requested = min_height,
                available = glyph.metrics.total_height(),
                "delimiter shorter than requested"
            );
            Ok(CharBox::new(glyph).into())
        }
    }
}

/// Build the delimiter `name` enlarged by `size` discrete steps.
///
/// Sizes above 4 give the plain symbol. When the font runs out of discrete
/// sizes, the delimiter is built to `size` times the height of an `A`.
pub fn create_sized(name: &str, env: &Environment<'_>, size: usize) -> MathResult<MathBox> {
    let font = env.font();
    let style = env.style();
    let mut glyph = font.symbol(name, style)?;
    if size > 4 {
        return Ok(CharBox::new(glyph).into());
    }
    for _ in 0..size {
        match font.next_larger(&glyph, style) {
            Some(larger) => glyph = larger,
            None => {
                let reference = font.glyph('A', style)?;
                let target = size as f32 * reference.metrics.total_height();
                return create(name, env, target);
            }
        }
    }
    Ok(CharBox::new(glyph).into())
}

/// Stack extension pieces until the stack is strictly taller than `min_height`
fn assemble(name: &str, ext: &Extension, min_height: f32, max_repeats: usize) -> MathResult<MathBox> {
    let repeat = ext.repeat;
    if !(repeat.metrics.total_height() > 0.0) {
        return Err(LayoutError::InvalidFontMetrics(format!(
            "repeat piece of delimiter {name} has no height"
        )));
    }

    let piece = |g: Glyph| MathBox::from(CharBox::new(g));
    let mut stack = VerticalBox::new();
    for g in [ext.top, ext.middle, ext.bottom].into_iter().flatten() {
        stack.add(piece(g));
    }

    let mut repeats = 0;
    while stack.total_height() <= min_height {
        if repeats >= max_repeats {
            return Err(LayoutError::InvalidFontMetrics(format!(
                "delimiter {name} needs more than {max_repeats} repeated pieces"
            )));
        }
        match (ext.top.is_some(), ext.bottom.is_some()) {
            (true, true) => {
                stack.insert(1, piece(repeat));
                if ext.middle.is_some() {
                    stack.insert(stack.len() - 1, piece(repeat));
                }
            }
            (false, true) => stack.insert(0, piece(repeat)),
            _ => stack.add(piece(repeat)),
        }
        repeats += 1;
    }
    trace!(delimiter = name, pieces = stack.len(), "assembled extensible delimiter");
    Ok(stack.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::environment::RenderFlags;
    use crate::font::{ExtensionEntry, FontParams, GlyphEntry, GlyphMetrics, TableFont};
    use crate::style::TexStyle;

    fn with_env<R>(font: &TableFont, f: impl FnOnce(&Environment<'_>) -> R) -> R {
        let config = LayoutConfig::default().with_style(TexStyle::Text);
        let flags = RenderFlags::new();
        let env = Environment::new(font, &config, &flags);
        f(&env)
    }

    /// Two discrete sizes and no extensible family
    fn short_font() -> TableFont {
        let mut font = TableFont::new("short", FontParams::default());
        let small = font.push(
            GlyphEntry::new('(', 0, GlyphMetrics::new(0.4, 0.75, 0.25, 0.0)).named("lbrack"),
        );
        let large = font.push(GlyphEntry::new('(', 1, GlyphMetrics::new(0.5, 1.0, 0.5, 0.0)).as_variant());
        font.set_larger(small, large);
        font.push(GlyphEntry::new('A', 0, GlyphMetrics::new(0.7, 0.7, 0.0, 0.0)));
        font
    }

    /// An extensible family whose repeat piece has no height
    fn broken_font() -> TableFont {
        let mut font = TableFont::new("broken", FontParams::default());
        let top = font.push(GlyphEntry::new('t', 0, GlyphMetrics::new(0.4, 0.5, 0.0, 0.0)).as_variant());
        let rep = font.push(GlyphEntry::new('r', 0, GlyphMetrics::new(0.4, 0.0, 0.0, 0.0)).as_variant());
        font.push(
            GlyphEntry::new('|', 0, GlyphMetrics::new(0.3, 0.5, 0.5, 0.0))
                .named("vert")
                .with_extension(ExtensionEntry {
                    top: Some(top),
                    middle: None,
                    bottom: None,
                    repeat: rep,
                }),
        );
        font
    }

    #[test]
    fn test_larger_variant_cycle_is_fatal() {
        // a table built in memory skips the checks done when loading JSON
        let mut font = TableFont::new("looped", FontParams::default());
        let only = font.push(
            GlyphEntry::new('(', 0, GlyphMetrics::new(0.4, 0.75, 0.25, 0.0)).named("lparen"),
        );
        font.set_larger(only, only);
        let err = with_env(&font, |env| create("lparen", env, 5.0)).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidFontMetrics(_)));
    }

    #[test]
    fn test_discrete_size_is_enough() {
        let font = TableFont::approximate();
        let b = with_env(&font, |env| create("lbrack", env, 1.5)).unwrap();
        assert!(matches!(b, MathBox::Char(_)));
        assert!((b.total_height() - 1.8).abs() < 1e-5);
    }

    #[test]
    fn test_assembled_when_sizes_run_out() {
        let font = TableFont::approximate();
        let b = with_env(&font, |env| create("lbrack", env, 5.0)).unwrap();
        let stack = b.as_vertical().expect("assembled stack");
        assert!(b.total_height() > 5.0);
        // top and bottom stay at the ends
        assert_eq!(stack.children().first().map(|c| c.height()), Some(0.6));
        assert_eq!(stack.children().last().map(|c| c.height()), Some(0.6));
    }

    #[test]
    fn test_brace_grows_on_both_sides_of_middle() {
        let font = TableFont::approximate();
        let b = with_env(&font, |env| create("lbrace", env, 4.0)).unwrap();
        let stack = b.as_vertical().expect("assembled stack");
        // top, middle and bottom plus pairs of repeats
        assert_eq!((stack.len() - 3) % 2, 0);
        assert!(b.total_height() > 4.0);
        let glyphs: Vec<char> = stack
            .children()
            .iter()
            .filter_map(|c| match c {
                MathBox::Char(c) => Some(c.glyph().ch),
                _ => None,
            })
            .collect();
        let middle = glyphs.len() / 2;
        assert_eq!(glyphs[middle], '\u{23A8}');
    }

    #[test]
    fn test_short_font_degrades_to_tallest() {
        let font = short_font();
        let b = with_env(&font, |env| create("lbrack", env, 4.0)).unwrap();
        assert!(b.total_height() < 4.0);
        assert_eq!(b.total_height(), 1.5);
    }

    #[test]
    fn test_zero_repeat_piece_is_fatal() {
        let font = broken_font();
        let err = with_env(&font, |env| create("vert", env, 3.0)).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidFontMetrics(_)));
    }

    #[test]
    fn test_repeat_cap() {
        let font = TableFont::approximate();
        let mut config = LayoutConfig::default().with_style(TexStyle::Text);
        config.max_extension_repeats = 2;
        let flags = RenderFlags::new();
        let env = Environment::new(&font, &config, &flags);
        let err = create("vert", &env, 50.0).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidFontMetrics(_)));
    }

    #[test]
    fn test_unknown_delimiter() {
        let font = TableFont::approximate();
        let err = with_env(&font, |env| create("nosuch", env, 1.0)).unwrap_err();
        assert!(matches!(err, LayoutError::UnknownSymbol(_)));
    }

    #[test]
    fn test_sized_steps() {
        let font = TableFont::approximate();
        let one = with_env(&font, |env| create_sized("lbrack", env, 1)).unwrap();
        assert!((one.total_height() - 1.2).abs() < 1e-5);
        let four = with_env(&font, |env| create_sized("lbrack", env, 4)).unwrap();
        assert!((four.total_height() - 3.0).abs() < 1e-5);
        let plain = with_env(&font, |env| create_sized("lbrack", env, 7)).unwrap();
        assert!((plain.total_height() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_sized_falls_back_to_height_target() {
        let font = short_font();
        let b = with_env(&font, |env| create_sized("lbrack", env, 3)).unwrap();
        // no extensible family: best effort is the largest size
        assert_eq!(b.total_height(), 1.5);
    }
}
