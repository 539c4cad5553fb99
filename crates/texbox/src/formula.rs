//! Formula entry point
//!
//! A [`Formula`] owns the root of an atom tree. Laying it out builds the box
//! tree in the configured style and size and, when a width budget is set,
//! re-flows it into lines. The resulting [`FormulaLayout`] carries the flags
//! atoms raised on the way so a renderer knows whether colors or images are
//! involved.

use crate::atoms::{Atom, AtomRef};
use crate::boxes::MathBox;
use crate::breaking;
use crate::config::LayoutConfig;
use crate::environment::{Environment, RenderFlags};
use crate::error::MathResult;
use crate::font::MathFont;
use crate::render::{Color, RenderConfig, RenderOutput, Renderer};
use tracing::debug;

/// A formula ready to be laid out
#[derive(Debug)]
pub struct Formula {
    root: AtomRef,
}

impl Formula {
    pub fn new(root: AtomRef) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &dyn Atom {
        self.root.as_ref()
    }

    /// Build the box tree for `font` under `config`
    pub fn layout(&self, font: &dyn MathFont, config: &LayoutConfig) -> MathResult<FormulaLayout> {
        config.validate("LayoutConfig")?;
        let flags = RenderFlags::new();
        let env = Environment::new(font, config, &flags);

        let mut root = self.root.create_box(&env)?;
        if let Some(max_width) = config.max_width {
            root = breaking::split(root, max_width, env.interline());
        }
        debug!(
            width = root.width(),
            height = root.height(),
            depth = root.depth(),
            style = %config.style,
            "formula laid out"
        );

        Ok(FormulaLayout {
            root,
            font_size: config.font_size,
            foreground: config.foreground.unwrap_or(Color::BLACK),
            uses_color: flags.uses_color(),
            uses_graphics: flags.uses_graphics(),
        })
    }
}

impl From<AtomRef> for Formula {
    fn from(root: AtomRef) -> Self {
        Self::new(root)
    }
}

/// The laid-out box tree of a formula
#[derive(Debug, Clone)]
pub struct FormulaLayout {
    root: MathBox,
    font_size: f32,
    foreground: Color,
    uses_color: bool,
    uses_graphics: bool,
}

impl FormulaLayout {
    pub fn root(&self) -> &MathBox {
        &self.root
    }

    pub fn into_box(self) -> MathBox {
        self.root
    }

    pub fn width(&self) -> f32 {
        self.root.width()
    }

    pub fn height(&self) -> f32 {
        self.root.height()
    }

    pub fn depth(&self) -> f32 {
        self.root.depth()
    }

    /// Whether some atom switched colors
    pub fn uses_color(&self) -> bool {
        self.uses_color
    }

    /// Whether the formula embeds images
    pub fn uses_graphics(&self) -> bool {
        self.uses_graphics
    }

    /// Record the draw calls of the whole box tree at the layout's point size
    pub fn render(&self) -> RenderOutput {
        Renderer::with_config(RenderConfig {
            font_size: self.font_size,
            color: self.foreground,
        })
        .render(&self.root)
    }
}
