//! Layout environment passed down the atom tree
//!
//! An [`Environment`] is the context an atom is laid out in: style, point
//! size, font metrics, colors and the configuration of the current layout.
//! Derivations never mutate; they return a new environment for a child.

use crate::config::LayoutConfig;
use crate::font::MathFont;
use crate::render::Color;
use crate::style::TexStyle;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::str::FromStr;

/// Flags atoms raise while being laid out, consulted by the renderer
#[derive(Debug, Default)]
pub struct RenderFlags {
    uses_color: Cell<bool>,
    uses_graphics: Cell<bool>,
}

impl RenderFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_color(&self) {
        self.uses_color.set(true);
    }

    pub fn mark_graphics(&self) {
        self.uses_graphics.set(true);
    }

    pub fn uses_color(&self) -> bool {
        self.uses_color.get()
    }

    pub fn uses_graphics(&self) -> bool {
        self.uses_graphics.get()
    }
}

/// Context for turning atoms into boxes
#[derive(Debug, Clone)]
pub struct Environment<'a> {
    style: TexStyle,
    size: f32,
    font: &'a dyn MathFont,
    config: &'a LayoutConfig,
    flags: &'a RenderFlags,
    text_style: Option<String>,
    foreground: Option<Color>,
    background: Option<Color>,
    text_width: Option<f32>,
    interline: f32,
}

impl<'a> Environment<'a> {
    /// Root environment for a layout run
    pub fn new(font: &'a dyn MathFont, config: &'a LayoutConfig, flags: &'a RenderFlags) -> Self {
        Self {
            style: config.style,
            size: config.font_size,
            font,
            config,
            flags,
            text_style: None,
            foreground: config.foreground,
            background: config.background,
            text_width: config.text_width,
            interline: config.interline_spacing,
        }
    }

    pub fn style(&self) -> TexStyle {
        self.style
    }

    /// Point size of text-style glyphs
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn font(&self) -> &'a dyn MathFont {
        self.font
    }

    pub fn config(&self) -> &'a LayoutConfig {
        self.config
    }

    pub fn flags(&self) -> &'a RenderFlags {
        self.flags
    }

    /// Named text style (`mathrm`, `mathbf`, ...) applied to characters
    pub fn text_style(&self) -> Option<&str> {
        self.text_style.as_deref()
    }

    pub fn foreground(&self) -> Option<Color> {
        self.foreground
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn text_width(&self) -> Option<f32> {
        self.text_width
    }

    /// Space between lines, in em
    pub fn interline(&self) -> f32 {
        self.interline
    }

    // -------------------------------------------------------------------------
    // Font parameters in the current style
    // -------------------------------------------------------------------------

    pub fn axis_height(&self) -> f32 {
        self.font.axis_height(self.style)
    }

    pub fn rule_thickness(&self) -> f32 {
        self.font.default_rule_thickness(self.style)
    }

    pub fn x_height(&self) -> f32 {
        self.font.x_height(self.style)
    }

    pub fn quad(&self) -> f32 {
        self.font.quad(self.style)
    }

    pub fn space(&self) -> f32 {
        self.font.space(self.style)
    }

    // -------------------------------------------------------------------------
    // Derivations
    // -------------------------------------------------------------------------

    pub fn with_style(&self, style: TexStyle) -> Self {
        Self {
            style,
            ..self.clone()
        }
    }

    pub fn sub_style(&self) -> Self {
        self.with_style(self.style.sub())
    }

    pub fn sup_style(&self) -> Self {
        self.with_style(self.style.sup())
    }

    pub fn num_style(&self) -> Self {
        self.with_style(self.style.num())
    }

    pub fn denom_style(&self) -> Self {
        self.with_style(self.style.denom())
    }

    pub fn root_style(&self) -> Self {
        self.with_style(self.style.root())
    }

    pub fn cramp_style(&self) -> Self {
        self.with_style(self.style.cramped())
    }

    pub fn with_text_style(&self, text_style: &str) -> Self {
        Self {
            text_style: Some(text_style.to_string()),
            ..self.clone()
        }
    }

    pub fn with_foreground(&self, color: Option<Color>) -> Self {
        Self {
            foreground: color,
            ..self.clone()
        }
    }

    pub fn with_background(&self, color: Option<Color>) -> Self {
        Self {
            background: color,
            ..self.clone()
        }
    }

    pub fn with_text_width(&self, width: Option<f32>) -> Self {
        Self {
            text_width: width,
            ..self.clone()
        }
    }
}

/// A TeX length unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    Em,
    Ex,
    Pixel,
    Point,
    Pica,
    ScaledPoint,
    BigPoint,
    /// Math unit, 1/18 em
    Mu,
    Cm,
    Mm,
    Inch,
}

impl Unit {
    /// Layout units (em at text size) per one of this unit
    pub fn factor(self, env: &Environment<'_>) -> f32 {
        let point = 1.0 / env.size();
        match self {
            Unit::Em => env.quad(),
            Unit::Ex => env.x_height(),
            Unit::Pixel => point / env.config().pixels_per_point,
            Unit::Point => point,
            Unit::Pica => 12.0 * point,
            Unit::ScaledPoint => point / 65536.0,
            Unit::BigPoint => point * 72.27 / 72.0,
            Unit::Mu => env.quad() / 18.0,
            Unit::Cm => point * 72.27 / 2.54,
            Unit::Mm => point * 72.27 / 25.4,
            Unit::Inch => point * 72.27,
        }
    }

    /// Convert `value` of this unit to layout units
    pub fn to_layout(self, value: f32, env: &Environment<'_>) -> f32 {
        value * self.factor(env)
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "em" => Unit::Em,
            "ex" => Unit::Ex,
            "px" | "pix" | "pixel" => Unit::Pixel,
            "pt" | "point" => Unit::Point,
            "pc" | "pica" => Unit::Pica,
            "sp" => Unit::ScaledPoint,
            "bp" => Unit::BigPoint,
            "mu" => Unit::Mu,
            "cm" => Unit::Cm,
            "mm" => Unit::Mm,
            "in" => Unit::Inch,
            other => return Err(format!("unknown unit: {other}")),
        })
    }
}
