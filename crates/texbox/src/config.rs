//! Layout Configuration
//!
//! Options controlling how a formula is laid out: base size and style, the
//! width budget for formula breaking, delimiter sizing rules and colors.

use crate::error::{LayoutError, MathResult};
use crate::render::Color;
use crate::style::TexStyle;
use serde::{Deserialize, Serialize};

/// Options for laying out a formula
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Point size of text-style glyphs
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    /// Style the root atom is laid out in
    #[serde(default)]
    pub style: TexStyle,
    /// Width budget in em; enables formula breaking when set
    #[serde(default)]
    pub max_width: Option<f32>,
    /// Space between broken lines, in em
    #[serde(default = "default_interline_spacing")]
    pub interline_spacing: f32,
    /// Line width for multline and gather, in em
    #[serde(default)]
    pub text_width: Option<f32>,
    /// Device pixels per point
    #[serde(default = "default_pixels_per_point")]
    pub pixels_per_point: f32,
    /// Minimum delimiter size, per mille of the enclosed content (TeX `\delimiterfactor`)
    #[serde(default = "default_delimiter_factor")]
    pub delimiter_factor: u32,
    /// Amount a delimiter may fall short of the content, in points (TeX `\delimitershortfall`)
    #[serde(default = "default_delimiter_shortfall")]
    pub delimiter_shortfall: f32,
    /// Upper bound on repeated pieces in one extensible delimiter or arrow
    #[serde(default = "default_max_extension_repeats")]
    pub max_extension_repeats: usize,
    #[serde(default)]
    pub foreground: Option<Color>,
    #[serde(default)]
    pub background: Option<Color>,
}

fn default_font_size() -> f32 {
    20.0
}

fn default_interline_spacing() -> f32 {
    0.2
}

fn default_pixels_per_point() -> f32 {
    1.0
}

fn default_delimiter_factor() -> u32 {
    901
}

fn default_delimiter_shortfall() -> f32 {
    5.0
}

fn default_max_extension_repeats() -> usize {
    1000
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            style: TexStyle::Display,
            max_width: None,
            interline_spacing: default_interline_spacing(),
            text_width: None,
            pixels_per_point: default_pixels_per_point(),
            delimiter_factor: default_delimiter_factor(),
            delimiter_shortfall: default_delimiter_shortfall(),
            max_extension_repeats: default_max_extension_repeats(),
            foreground: None,
            background: None,
        }
    }
}

impl LayoutConfig {
    /// Read a configuration document; missing fields take their defaults
    pub fn from_json(resource: &str, json: &str) -> MathResult<Self> {
        let config: LayoutConfig =
            serde_json::from_str(json).map_err(|e| LayoutError::resource(resource, e))?;
        config.validate(resource)?;
        Ok(config)
    }

    pub fn to_json(&self) -> MathResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| LayoutError::resource("LayoutConfig", e))
    }

    /// Builder: break formulas wider than `width` em
    pub fn with_max_width(mut self, width: f32) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn with_style(mut self, style: TexStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_text_width(mut self, width: f32) -> Self {
        self.text_width = Some(width);
        self
    }

    /// Reject sizes and widths that would poison later arithmetic
    pub fn validate(&self, resource: &str) -> MathResult<()> {
        let invalid = |element: &str| {
            Err(LayoutError::ResourceParse {
                resource: resource.to_string(),
                element: element.to_string(),
            })
        };
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return invalid("fontSize must be a positive number");
        }
        if !(self.pixels_per_point.is_finite() && self.pixels_per_point > 0.0) {
            return invalid("pixelsPerPoint must be a positive number");
        }
        if !self.interline_spacing.is_finite() {
            return invalid("interlineSpacing must be finite");
        }
        if !self.delimiter_shortfall.is_finite() {
            return invalid("delimiterShortfall must be finite");
        }
        if self.max_width.is_some_and(|w| !w.is_finite()) {
            return invalid("maxWidth must be finite");
        }
        if self.text_width.is_some_and(|w| !w.is_finite()) {
            return invalid("textWidth must be finite");
        }
        if self.max_extension_repeats == 0 {
            return invalid("maxExtensionRepeats must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LayoutConfig::default();
        assert_eq!(config.font_size, 20.0);
        assert_eq!(config.style, TexStyle::Display);
        assert_eq!(config.delimiter_factor, 901);
        assert!(config.max_width.is_none());
        assert!(config.validate("default").is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = LayoutConfig::from_json("inline", r#"{"maxWidth": 12.5, "style": "Text"}"#)
            .unwrap();
        assert_eq!(config.max_width, Some(12.5));
        assert_eq!(config.style, TexStyle::Text);
        assert_eq!(config.interline_spacing, 0.2);
        assert_eq!(config.max_extension_repeats, 1000);
    }

    #[test]
    fn test_from_json_rejects_bad_size() {
        let err = LayoutConfig::from_json("bad.json", r#"{"fontSize": -1}"#).unwrap_err();
        match err {
            LayoutError::ResourceParse { resource, .. } => assert_eq!(resource, "bad.json"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_json_syntax_error() {
        let err = LayoutConfig::from_json("broken.json", "{").unwrap_err();
        assert!(matches!(err, LayoutError::ResourceParse { .. }));
    }

    #[test]
    fn test_json_round_trip() {
        let config = LayoutConfig::default().with_max_width(30.0);
        let json = config.to_json().unwrap();
        assert_eq!(LayoutConfig::from_json("round", &json).unwrap(), config);
    }
}
