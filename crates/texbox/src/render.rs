//! Math Rendering - Draw primitives and the recording canvas
//!
//! Boxes never rasterize anything themselves. [`MathBox::draw`] translates the
//! computed geometry into calls on a [`Canvas`], the draw-primitive interface a
//! graphics backend implements. [`RecordingCanvas`] is the backend used by the
//! [`Renderer`]: it records the calls as [`RenderPrimitive`] values.

use crate::boxes::MathBox;
use crate::font::{FontId, Glyph};
use serde::{Deserialize, Serialize};

// =============================================================================
// Geometry
// =============================================================================

/// A position in 2D space (y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self::default()
    }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// A color in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// 2D transform applied to a group of primitives
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub rotate: f32, // radians
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotate: 0.0,
        }
    }
}

impl Transform {
    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            translate_x: x,
            translate_y: y,
            ..Default::default()
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            scale_x: sx,
            scale_y: sy,
            ..Default::default()
        }
    }

    pub fn rotate(angle: f32) -> Self {
        Self {
            rotate: angle,
            ..Default::default()
        }
    }

    pub fn is_identity(&self) -> bool {
        self.translate_x == 0.0
            && self.translate_y == 0.0
            && self.scale_x == 1.0
            && self.scale_y == 1.0
            && self.rotate == 0.0
    }
}

// =============================================================================
// Canvas
// =============================================================================

/// Draw-primitive interface implemented by graphics backends.
///
/// Coordinates are in layout units; `y` grows downwards and glyphs are placed
/// by their baseline origin.
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect);

    fn stroke_rect(&mut self, rect: Rect, thickness: f32);

    /// Stroke an elliptic arc inscribed in `rect`; angles in degrees
    fn draw_arc(&mut self, rect: Rect, start_angle: f32, sweep_angle: f32, thickness: f32);

    fn draw_glyph(&mut self, glyph: &Glyph, x: f32, y: f32);

    fn draw_image(&mut self, name: &str, rect: Rect);

    fn set_color(&mut self, color: Color);

    fn color(&self) -> Color;

    /// Push the current transform and color
    fn save(&mut self);

    /// Pop back to the state of the matching [`Canvas::save`]
    fn restore(&mut self);

    fn translate(&mut self, dx: f32, dy: f32);

    fn scale(&mut self, sx: f32, sy: f32);

    /// Rotate the coordinate frame by `angle` radians
    fn rotate(&mut self, angle: f32);
}

/// A recorded draw call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderPrimitive {
    /// Draw a glyph with its baseline origin at `position`
    Glyph {
        ch: char,
        font_id: FontId,
        position: Point,
        size: f32,
        color: Color,
    },
    /// Draw a rectangle (rules, frames, backgrounds)
    Rectangle {
        rect: Rect,
        fill: Option<Color>,
        stroke: Option<(Color, f32)>,
    },
    /// Stroke an arc
    Arc {
        rect: Rect,
        start_angle: f32,
        sweep_angle: f32,
        stroke: (Color, f32),
    },
    /// Draw an image scaled into `rect`
    Image { name: String, rect: Rect },
    /// A group of primitives with a transform
    Group {
        transform: Transform,
        children: Vec<RenderPrimitive>,
    },
}

struct Frame {
    transform: Transform,
    children: Vec<RenderPrimitive>,
    saved_color: Option<Color>,
}

/// A [`Canvas`] that records every call.
///
/// Each `translate`/`scale`/`rotate` opens a nested [`RenderPrimitive::Group`]
/// that is closed by the next `restore`.
pub struct RecordingCanvas {
    frames: Vec<Frame>,
    color: Color,
}

impl RecordingCanvas {
    pub fn new(color: Color) -> Self {
        Self {
            frames: vec![Frame {
                transform: Transform::default(),
                children: Vec::new(),
                saved_color: None,
            }],
            color,
        }
    }

    fn push(&mut self, primitive: RenderPrimitive) {
        if let Some(frame) = self.frames.last_mut() {
            frame.children.push(primitive);
        }
    }

    fn open(&mut self, transform: Transform, saved_color: Option<Color>) {
        self.frames.push(Frame {
            transform,
            children: Vec::new(),
            saved_color,
        });
    }

    fn close_top(&mut self) -> Option<Color> {
        if self.frames.len() <= 1 {
            return None;
        }
        let frame = self.frames.pop()?;
        let saved = frame.saved_color;
        self.push(RenderPrimitive::Group {
            transform: frame.transform,
            children: frame.children,
        });
        saved
    }

    /// Close all open groups and return the recorded primitives
    pub fn finish(mut self) -> Vec<RenderPrimitive> {
        while self.frames.len() > 1 {
            self.close_top();
        }
        self.frames.pop().map(|f| f.children).unwrap_or_default()
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect) {
        let color = self.color;
        self.push(RenderPrimitive::Rectangle {
            rect,
            fill: Some(color),
            stroke: None,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, thickness: f32) {
        let color = self.color;
        self.push(RenderPrimitive::Rectangle {
            rect,
            fill: None,
            stroke: Some((color, thickness)),
        });
    }

    fn draw_arc(&mut self, rect: Rect, start_angle: f32, sweep_angle: f32, thickness: f32) {
        let color = self.color;
        self.push(RenderPrimitive::Arc {
            rect,
            start_angle,
            sweep_angle,
            stroke: (color, thickness),
        });
    }

    fn draw_glyph(&mut self, glyph: &Glyph, x: f32, y: f32) {
        let color = self.color;
        self.push(RenderPrimitive::Glyph {
            ch: glyph.ch,
            font_id: glyph.font_id,
            position: Point::new(x, y),
            size: glyph.scale,
            color,
        });
    }

    fn draw_image(&mut self, name: &str, rect: Rect) {
        self.push(RenderPrimitive::Image {
            name: name.to_string(),
            rect,
        });
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn color(&self) -> Color {
        self.color
    }

    fn save(&mut self) {
        let color = self.color;
        self.open(Transform::default(), Some(color));
    }

    fn restore(&mut self) {
        // implicit transform frames are closed until the saved one is reached
        while self.frames.len() > 1 {
            if let Some(color) = self.close_top() {
                self.color = color;
                break;
            }
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.open(Transform::translate(dx, dy), None);
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.open(Transform::scale(sx, sy), None);
    }

    fn rotate(&mut self, angle: f32) {
        self.open(Transform::rotate(angle), None);
    }
}

// =============================================================================
// Renderer
// =============================================================================

/// The complete render output for a formula
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOutput {
    /// All render primitives
    pub primitives: Vec<RenderPrimitive>,
    /// Total bounding box in points
    pub bounds: Rect,
    /// Baseline position (y coordinate) in points
    pub baseline: f32,
}

/// Configuration for the renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Points per layout unit
    pub font_size: f32,
    /// Initial foreground color
    pub color: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_size: 20.0,
            color: Color::BLACK,
        }
    }
}

/// Renders a box tree through a [`RecordingCanvas`]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// Create a new renderer with default config
    pub fn new() -> Self {
        Self {
            config: RenderConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Draw a box with its top-left corner at the origin
    pub fn render(&self, root: &MathBox) -> RenderOutput {
        let size = self.config.font_size;
        let mut canvas = RecordingCanvas::new(self.config.color);
        canvas.save();
        canvas.scale(size, size);
        root.draw(&mut canvas, 0.0, root.height());
        canvas.restore();

        let bounds = Rect::new(
            0.0,
            0.0,
            root.width() * size,
            (root.height() + root.depth()) * size,
        );
        RenderOutput {
            primitives: canvas.finish(),
            bounds,
            baseline: root.height() * size,
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Count the primitives of a render output, descending into groups
pub fn count_primitives(primitives: &[RenderPrimitive], pred: &dyn Fn(&RenderPrimitive) -> bool) -> usize {
    primitives
        .iter()
        .map(|p| match p {
            RenderPrimitive::Group { children, .. } => count_primitives(children, pred),
            other => usize::from(pred(other)),
        })
        .sum()
}

// =============================================================================
// Tests
// =============================================================================
