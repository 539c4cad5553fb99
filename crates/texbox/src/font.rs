//! Font metrics provider
//!
//! Layout never reads font files itself. Everything it needs about glyphs
//! (advance widths, heights, larger variants, extensible pieces, global math
//! parameters) comes through the [`MathFont`] trait. [`TableFont`] is a
//! serde-loadable, in-memory implementation.

use crate::error::{LayoutError, MathResult};
use crate::style::TexStyle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the font a glyph was taken from
pub type FontId = u16;

/// Raw metrics of a glyph
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GlyphMetrics {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    #[serde(default)]
    pub italic: f32,
}

impl GlyphMetrics {
    pub fn new(width: f32, height: f32, depth: f32, italic: f32) -> Self {
        Self {
            width,
            height,
            depth,
            italic,
        }
    }

    /// Total vertical extent
    pub fn total_height(&self) -> f32 {
        self.height + self.depth
    }

    fn scaled(self, factor: f32) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
            depth: self.depth * factor,
            italic: self.italic * factor,
        }
    }
}

/// A glyph resolved for a particular style, with metrics already scaled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    /// The character drawn
    pub ch: char,
    /// Font the character is drawn from
    pub font_id: FontId,
    /// Index of the glyph in its provider
    pub id: usize,
    /// Scaled metrics
    pub metrics: GlyphMetrics,
    /// Scale factor applied to the design metrics
    pub scale: f32,
}

/// The pieces of an extensible delimiter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extension {
    pub top: Option<Glyph>,
    pub middle: Option<Glyph>,
    pub bottom: Option<Glyph>,
    pub repeat: Glyph,
}

/// Read-only access to the metrics of a math font.
///
/// Implementations must be safe to share between threads so that several
/// formulas can be laid out in parallel against the same font.
pub trait MathFont: Send + Sync + fmt::Debug {
    /// Glyph for a character in the given style
    fn glyph(&self, ch: char, style: TexStyle) -> MathResult<Glyph>;

    /// Glyph for a character inside a named text style (`mathrm`, `mathbf`, ...)
    fn text_glyph(&self, ch: char, text_style: &str, style: TexStyle) -> MathResult<Glyph>;

    /// Glyph registered under a symbol name (`lbrack`, `sqrt`, ...)
    fn symbol(&self, name: &str, style: TexStyle) -> MathResult<Glyph>;

    /// The next larger variant of a glyph, if the font has one
    fn next_larger(&self, glyph: &Glyph, style: TexStyle) -> Option<Glyph>;

    fn has_next_larger(&self, glyph: &Glyph, style: TexStyle) -> bool {
        self.next_larger(glyph, style).is_some()
    }

    /// Top/middle/bottom/repeat pieces of an extensible glyph
    fn extension(&self, glyph: &Glyph, style: TexStyle) -> Option<Extension>;

    fn is_extensible(&self, glyph: &Glyph, style: TexStyle) -> bool {
        self.extension(glyph, style).is_some()
    }

    /// Height of the math axis above the baseline
    fn axis_height(&self, style: TexStyle) -> f32;

    fn default_rule_thickness(&self, style: TexStyle) -> f32;

    fn x_height(&self, style: TexStyle) -> f32;

    /// Width of one em
    fn quad(&self, style: TexStyle) -> f32;

    /// Interword space
    fn space(&self, style: TexStyle) -> f32;

    /// Scale factor of glyphs in this style relative to text style
    fn size_factor(&self, style: TexStyle) -> f32;
}

// =============================================================================
// Table Font
// =============================================================================

/// Global parameters of a [`TableFont`], in text-style design units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontParams {
    pub axis_height: f32,
    pub default_rule_thickness: f32,
    pub x_height: f32,
    pub quad: f32,
    pub space: f32,
    pub script_factor: f32,
    pub scriptscript_factor: f32,
}

impl Default for FontParams {
    fn default() -> Self {
        Self {
            axis_height: 0.25,
            default_rule_thickness: 0.04,
            x_height: 0.43,
            quad: 1.0,
            space: 0.33,
            script_factor: 0.7,
            scriptscript_factor: 0.5,
        }
    }
}

/// Indices of the pieces of an extensible glyph
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtensionEntry {
    #[serde(default)]
    pub top: Option<usize>,
    #[serde(default)]
    pub middle: Option<usize>,
    #[serde(default)]
    pub bottom: Option<usize>,
    pub repeat: usize,
}

/// One glyph of a [`TableFont`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphEntry {
    pub ch: char,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub font_id: FontId,
    #[serde(flatten)]
    pub metrics: GlyphMetrics,
    /// Text style this glyph belongs to; `None` for math glyphs
    #[serde(default)]
    pub text_style: Option<String>,
    /// Larger variants and extension pieces are only reachable through links
    #[serde(default)]
    pub variant: bool,
    #[serde(default)]
    pub larger: Option<usize>,
    #[serde(default)]
    pub extension: Option<ExtensionEntry>,
}

impl GlyphEntry {
    pub fn new(ch: char, font_id: FontId, metrics: GlyphMetrics) -> Self {
        Self {
            ch,
            name: None,
            font_id,
            metrics,
            text_style: None,
            variant: false,
            larger: None,
            extension: None,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn in_text_style(mut self, text_style: &str) -> Self {
        self.text_style = Some(text_style.to_string());
        self
    }

    pub fn as_variant(mut self) -> Self {
        self.variant = true;
        self
    }

    pub fn with_larger(mut self, larger: usize) -> Self {
        self.larger = Some(larger);
        self
    }

    pub fn with_extension(mut self, extension: ExtensionEntry) -> Self {
        self.extension = Some(extension);
        self
    }
}

/// An in-memory font metrics table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableFont {
    pub name: String,
    #[serde(default)]
    pub params: FontParams,
    pub glyphs: Vec<GlyphEntry>,
}

impl TableFont {
    /// Create an empty table
    pub fn new(name: &str, params: FontParams) -> Self {
        Self {
            name: name.to_string(),
            params,
            glyphs: Vec::new(),
        }
    }

    /// Append a glyph and return its index
    pub fn push(&mut self, entry: GlyphEntry) -> usize {
        self.glyphs.push(entry);
        self.glyphs.len() - 1
    }

    /// Link a glyph to its next larger variant
    pub fn set_larger(&mut self, glyph: usize, larger: usize) {
        if let Some(entry) = self.glyphs.get_mut(glyph) {
            entry.larger = Some(larger);
        }
    }

    /// Load a table from JSON, checking every cross reference
    pub fn from_json(resource: &str, json: &str) -> MathResult<Self> {
        let font: TableFont =
            serde_json::from_str(json).map_err(|e| LayoutError::resource(resource, e))?;
        font.validate(resource)?;
        Ok(font)
    }

    /// Serialize the table to JSON
    pub fn to_json(&self) -> MathResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| LayoutError::resource(&self.name, e))
    }

    fn validate(&self, resource: &str) -> MathResult<()> {
        let count = self.glyphs.len();
        let bad = |index: usize, what: &str, target: usize| LayoutError::ResourceParse {
            resource: resource.to_string(),
            element: format!("glyph {index}: {what} index {target} out of range"),
        };
        for (index, entry) in self.glyphs.iter().enumerate() {
            if let Some(larger) = entry.larger {
                if larger >= count {
                    return Err(bad(index, "larger", larger));
                }
            }
            if let Some(ext) = &entry.extension {
                let pieces = [ext.top, ext.middle, ext.bottom, Some(ext.repeat)];
                for piece in pieces.into_iter().flatten() {
                    if piece >= count {
                        return Err(bad(index, "extension", piece));
                    }
                }
            }
        }
        // every chain of larger variants must end
        for (index, entry) in self.glyphs.iter().enumerate() {
            let mut next = entry.larger;
            let mut steps = 0;
            while let Some(id) = next {
                steps += 1;
                if steps > count {
                    return Err(LayoutError::ResourceParse {
                        resource: resource.to_string(),
                        element: format!("glyph {index}: larger variants form a cycle"),
                    });
                }
                next = self.glyphs.get(id).and_then(|e| e.larger);
            }
        }
        if self.params.script_factor <= 0.0 || self.params.scriptscript_factor <= 0.0 {
            return Err(LayoutError::ResourceParse {
                resource: resource.to_string(),
                element: "params: script factors must be positive".to_string(),
            });
        }
        Ok(())
    }

    fn resolve(&self, id: usize, style: TexStyle) -> Option<Glyph> {
        let entry = self.glyphs.get(id)?;
        let scale = self.size_factor(style);
        Some(Glyph {
            ch: entry.ch,
            font_id: entry.font_id,
            id,
            metrics: entry.metrics.scaled(scale),
            scale,
        })
    }

    fn find(&self, pred: impl Fn(&GlyphEntry) -> bool) -> Option<usize> {
        self.glyphs.iter().position(|e| !e.variant && pred(e))
    }

    /// A font with approximate metrics for Latin text, common operators and
    /// the standard delimiters with larger variants and extensible families.
    pub fn approximate() -> Self {
        let mut font = TableFont::new("approximate", FontParams::default());

        for ch in (0x21u8..0x7f).map(char::from) {
            if "()[]{}|".contains(ch) {
                continue;
            }
            let metrics = approximate_char_metrics(ch);
            let font_id = if ch.is_ascii_alphabetic() { 1 } else { 0 };
            font.push(GlyphEntry::new(ch, font_id, metrics));
            if ch.is_ascii_alphabetic() {
                let upright = GlyphMetrics { italic: 0.0, ..metrics };
                font.push(GlyphEntry::new(ch, 0, upright).in_text_style("mathrm"));
            }
        }

        let simple: [(&str, char, GlyphMetrics); 9] = [
            ("minus", '\u{2212}', GlyphMetrics::new(0.78, 0.58, 0.08, 0.0)),
            ("plus", '+', GlyphMetrics::new(0.78, 0.58, 0.08, 0.0)),
            ("equals", '=', GlyphMetrics::new(0.78, 0.37, 0.0, 0.0)),
            ("times", '\u{00D7}', GlyphMetrics::new(0.78, 0.49, 0.0, 0.0)),
            ("cdot", '\u{22C5}', GlyphMetrics::new(0.28, 0.31, 0.0, 0.0)),
            ("leftarrow", '\u{2190}', GlyphMetrics::new(1.0, 0.51, 0.01, 0.0)),
            ("rightarrow", '\u{2192}', GlyphMetrics::new(1.0, 0.51, 0.01, 0.0)),
            ("leftrightarrow", '\u{2194}', GlyphMetrics::new(1.0, 0.51, 0.01, 0.0)),
            ("comma", ',', GlyphMetrics::new(0.28, 0.1, 0.19, 0.0)),
        ];
        for (name, ch, metrics) in simple {
            font.push(GlyphEntry::new(ch, 2, metrics).named(name));
        }

        let families: [(&str, char, [char; 4]); 8] = [
            ("lbrack", '(', ['\u{239B}', '\u{239C}', '\u{239D}', '\0']),
            ("rbrack", ')', ['\u{239E}', '\u{239F}', '\u{23A0}', '\0']),
            ("lsqbrack", '[', ['\u{23A1}', '\u{23A2}', '\u{23A3}', '\0']),
            ("rsqbrack", ']', ['\u{23A4}', '\u{23A5}', '\u{23A6}', '\0']),
            ("lbrace", '{', ['\u{23A7}', '\u{23AA}', '\u{23A9}', '\u{23A8}']),
            ("rbrace", '}', ['\u{23AB}', '\u{23AA}', '\u{23AD}', '\u{23AC}']),
            ("vert", '|', ['\0', '\u{23D0}', '\0', '\0']),
            ("sqrt", '\u{221A}', ['\u{23B7}', '\u{23D0}', '\0', '\0']),
        ];
        for (name, ch, pieces) in families {
            add_delimiter_family(&mut font, name, ch, pieces);
        }
        font
    }
}

fn approximate_char_metrics(ch: char) -> GlyphMetrics {
    let width = match ch {
        'i' | 'j' | 'l' | '.' | ',' | ';' | ':' | '!' | '\'' => 0.28,
        'm' | 'w' | 'M' | 'W' => 0.83,
        'A'..='Z' => 0.72,
        '+' | '=' | '<' | '>' => 0.78,
        _ => 0.5,
    };
    let height = match ch {
        'A'..='Z' | '0'..='9' | 'b' | 'd' | 'f' | 'h' | 'k' | 'l' | 't' | 'i' | 'j' => 0.69,
        '.' | ',' => 0.11,
        '-' | '=' => 0.37,
        _ => 0.43,
    };
    let depth = match ch {
        'g' | 'j' | 'p' | 'q' | 'y' | ',' | ';' => 0.19,
        _ => 0.0,
    };
    let italic = if ch.is_ascii_lowercase() { 0.02 } else { 0.0 };
    GlyphMetrics::new(width, height, depth, italic)
}

/// Add a delimiter with four larger sizes, the largest being extensible.
/// `pieces` are top, repeat, bottom and middle; `'\0'` marks a missing piece.
fn add_delimiter_family(font: &mut TableFont, name: &str, ch: char, pieces: [char; 4]) {
    let width = if ch == '|' { 0.28 } else { 0.39 };
    let base = font.push(
        GlyphEntry::new(ch, 2, GlyphMetrics::new(width, 0.75, 0.25, 0.0)).named(name),
    );
    let mut previous = base;
    for total in [1.2f32, 1.8, 2.4, 3.0] {
        let half = total / 2.0;
        let axis = font.params.axis_height;
        let metrics = GlyphMetrics::new(width + 0.08 * total, half + axis, half - axis, 0.0);
        let id = font.push(GlyphEntry::new(ch, 3, metrics).as_variant());
        font.set_larger(previous, id);
        previous = id;
    }

    let mut piece = |c: char, total: f32| -> Option<usize> {
        if c == '\0' {
            return None;
        }
        let metrics = GlyphMetrics::new(width + 0.1, total, 0.0, 0.0);
        Some(font.push(GlyphEntry::new(c, 3, metrics).as_variant()))
    };
    let top = piece(pieces[0], 0.6);
    let repeat = piece(pieces[1], 0.3);
    let bottom = piece(pieces[2], 0.6);
    let middle = piece(pieces[3], 0.6);
    if let Some(repeat) = repeat {
        font.glyphs[previous].extension = Some(ExtensionEntry {
            top,
            middle,
            bottom,
            repeat,
        });
    }
}

impl MathFont for TableFont {
    fn glyph(&self, ch: char, style: TexStyle) -> MathResult<Glyph> {
        self.find(|e| e.ch == ch && e.text_style.is_none())
            .and_then(|id| self.resolve(id, style))
            .ok_or_else(|| LayoutError::MissingGlyph {
                ch,
                style: style.to_string(),
            })
    }

    fn text_glyph(&self, ch: char, text_style: &str, style: TexStyle) -> MathResult<Glyph> {
        match self.find(|e| e.ch == ch && e.text_style.as_deref() == Some(text_style)) {
            Some(id) => self.resolve(id, style).ok_or_else(|| LayoutError::MissingGlyph {
                ch,
                style: style.to_string(),
            }),
            None => self.glyph(ch, style),
        }
    }

    fn symbol(&self, name: &str, style: TexStyle) -> MathResult<Glyph> {
        self.find(|e| e.name.as_deref() == Some(name))
            .and_then(|id| self.resolve(id, style))
            .ok_or_else(|| LayoutError::UnknownSymbol(name.to_string()))
    }

    fn next_larger(&self, glyph: &Glyph, style: TexStyle) -> Option<Glyph> {
        let larger = self.glyphs.get(glyph.id)?.larger?;
        self.resolve(larger, style)
    }

    fn extension(&self, glyph: &Glyph, style: TexStyle) -> Option<Extension> {
        let ext = self.glyphs.get(glyph.id)?.extension?;
        let piece = |id: Option<usize>| id.and_then(|id| self.resolve(id, style));
        Some(Extension {
            top: piece(ext.top),
            middle: piece(ext.middle),
            bottom: piece(ext.bottom),
            repeat: self.resolve(ext.repeat, style)?,
        })
    }

    fn axis_height(&self, style: TexStyle) -> f32 {
        self.params.axis_height * self.size_factor(style)
    }

    fn default_rule_thickness(&self, style: TexStyle) -> f32 {
        self.params.default_rule_thickness * self.size_factor(style)
    }

    fn x_height(&self, style: TexStyle) -> f32 {
        self.params.x_height * self.size_factor(style)
    }

    fn quad(&self, style: TexStyle) -> f32 {
        self.params.quad * self.size_factor(style)
    }

    fn space(&self, style: TexStyle) -> f32 {
        self.params.space * self.size_factor(style)
    }

    fn size_factor(&self, style: TexStyle) -> f32 {
        match style.size_index() {
            0 => 1.0,
            1 => self.params.script_factor,
            _ => self.params.scriptscript_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_lookup_scales_with_style() {
        let font = TableFont::approximate();
        let text = font.glyph('x', TexStyle::Text).unwrap();
        let script = font.glyph('x', TexStyle::Script).unwrap();
        assert!((script.metrics.width - text.metrics.width * 0.7).abs() < 1e-6);
        assert_eq!(text.font_id, 1);
    }

    #[test]
    fn test_text_glyph_falls_back_to_math_glyph() {
        let font = TableFont::approximate();
        let upright = font.text_glyph('x', "mathrm", TexStyle::Text).unwrap();
        assert_eq!(upright.font_id, 0);
        assert_eq!(upright.metrics.italic, 0.0);
        let digit = font.text_glyph('7', "mathrm", TexStyle::Text).unwrap();
        assert_eq!(digit.ch, '7');
    }

    #[test]
    fn test_larger_variants_grow() {
        let font = TableFont::approximate();
        let mut glyph = font.symbol("lbrack", TexStyle::Text).unwrap();
        let mut steps = 0;
        while let Some(next) = font.next_larger(&glyph, TexStyle::Text) {
            assert!(next.metrics.total_height() > glyph.metrics.total_height());
            glyph = next;
            steps += 1;
        }
        assert_eq!(steps, 4);
        assert!(font.is_extensible(&glyph, TexStyle::Text));
    }

    #[test]
    fn test_unknown_symbol() {
        let font = TableFont::approximate();
        let err = font.symbol("nosuchsymbol", TexStyle::Text).unwrap_err();
        assert!(matches!(err, LayoutError::UnknownSymbol(_)));
    }

    #[test]
    fn test_json_roundtrip_and_validation() {
        let font = TableFont::approximate();
        let json = font.to_json().unwrap();
        let loaded = TableFont::from_json("approximate.json", &json).unwrap();
        assert_eq!(loaded, font);

        let broken = r#"{"name":"broken","glyphs":[{"ch":"(","width":0.4,"height":0.7,"depth":0.2,"larger":5}]}"#;
        let err = TableFont::from_json("broken.json", broken).unwrap_err();
        match err {
            LayoutError::ResourceParse { resource, element } => {
                assert_eq!(resource, "broken.json");
                assert!(element.contains("larger"));
            }
            other => panic!("Expected ResourceParse, got {other:?}"),
        }
    }

    #[test]
    fn test_larger_variant_cycle_rejected() {
        let mut font = TableFont::new("cyclic", FontParams::default());
        let small = font.push(GlyphEntry::new('(', 0, GlyphMetrics::new(0.4, 0.75, 0.25, 0.0)).named("lparen"));
        let large = font.push(GlyphEntry::new('(', 1, GlyphMetrics::new(0.5, 1.0, 0.5, 0.0)).as_variant());
        font.set_larger(small, large);
        font.set_larger(large, small);
        let json = font.to_json().unwrap();
        let err = TableFont::from_json("cyclic.json", &json).unwrap_err();
        match err {
            LayoutError::ResourceParse { element, .. } => assert!(element.contains("cycle")),
            other => panic!("Expected ResourceParse, got {other:?}"),
        }

        let mut looped = TableFont::new("looped", FontParams::default());
        let only = looped.push(GlyphEntry::new('(', 0, GlyphMetrics::new(0.4, 0.75, 0.25, 0.0)).named("lparen"));
        looped.set_larger(only, only);
        let json = looped.to_json().unwrap();
        assert!(TableFont::from_json("looped.json", &json).is_err());
    }
}
