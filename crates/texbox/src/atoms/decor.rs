//! Atoms that wrap a single base: colors, frames, scaling, rotation,
//! phantoms and images

use super::{Atom, AtomRef, AtomType};
use crate::boxes::{
    CharBox, ColorBox, FramedBox, GraphicsBox, HorizontalBox, MathBox, RotateBox, RotationOrigin,
    ScaleBox, ShadowBox, StrutBox,
};
use crate::environment::{Environment, Unit};
use crate::error::{LayoutError, MathResult};
use crate::render::Color;
use tracing::warn;

/// Forward the classes of a wrapper to its base
macro_rules! forward_types {
    () => {
        fn atom_type(&self) -> AtomType {
            self.base.atom_type()
        }

        fn left_type(&self) -> AtomType {
            self.base.left_type()
        }

        fn right_type(&self) -> AtomType {
            self.base.right_type()
        }
    };
}

// =============================================================================
// Color
// =============================================================================

/// Sets the foreground and/or background color of its base
#[derive(Debug)]
pub struct ColorAtom {
    base: AtomRef,
    foreground: Option<Color>,
    background: Option<Color>,
}

impl ColorAtom {
    pub fn new(base: AtomRef, foreground: Option<Color>, background: Option<Color>) -> Self {
        Self {
            base,
            foreground,
            background,
        }
    }
}

impl Atom for ColorAtom {
    fn create_box(&self, env: &Environment<'_>) -> MathResult<MathBox> {
        env.flags().mark_color();
        let mut inner = env.clone();
        if self.foreground.is_some() {
            inner = inner.with_foreground(self.foreground);
        }
        if self.background.is_some() {
            inner = inner.with_background(self.background);
        }
        let b = self.base.create_box(&inner)?;
        Ok(ColorBox::new(b, self.foreground, self.background).into())
    }

    forward_types!();
}

// =============================================================================
// Frames
// =============================================================================

/// `\fbox`: a frame around the base
#[derive(Debug)]
pub struct FBoxAtom {
    base: AtomRef,
    line: Option<Color>,
    background: Option<Color>,
}

impl FBoxAtom {
    /// Padding between the base and the frame, in ex
    pub const INTERSPACE: f32 = 0.65;

    pub fn new(base: AtomRef) -> Self {
        Self {
            base,
            line: None,
            background: None,
        }
    }

    /// `\fcolorbox`
    pub fn colored(base: AtomRef, line: Color, background: Color) -> Self {
        Self {
            base,
            line: Some(line),
            background: Some(background),
        }
    }

    fn framed(&self, env: &Environment<'_>) -> MathResult<FramedBox> {
        let b = self.base.create_box(env)?;
        let space = Unit::Ex.to_layout(Self::INTERSPACE, env);
        let frame = FramedBox::new(b, env.rule_thickness(), space);
        if self.line.is_some() || self.background.is_some() {
            env.flags().mark_color();
            return Ok(frame.with_colors(self.line, self.background));
        }
        Ok(frame)
    }
}

impl Atom for FBoxAtom {
    fn create_box(&self, env: &Environment<'_>) -> MathResult<MathBox> {
        Ok(self.framed(env)?.into())
    }
}

/// `\shadowbox`: a frame with a drop shadow
#[derive(Debug)]
pub struct ShadowAtom {
    frame: FBoxAtom,
}

impl ShadowAtom {
    /// Shadow width, in points
    pub const SHADOW_SIZE: f32 = 4.0;

    pub fn new(base: AtomRef) -> Self {
        Self {
            frame: FBoxAtom::new(base),
        }
    }
}

impl Atom for ShadowAtom {
    fn create_box(&self, env: &Environment<'_>) -> MathResult<MathBox> {
        let frame = self.frame.framed(env)?;
        let rule = Unit::Point.to_layout(Self::SHADOW_SIZE, env);
        Ok(ShadowBox::new(frame, rule).into())
    }
}

// =============================================================================
// Scaling and rotation
// =============================================================================

/// Scales its base; a horizontal factor of -1 is `\reflectbox`
#[derive(Debug)]
pub struct ScaleAtom {
    base: AtomRef,
    xscale: f32,
    yscale: f32,
}

impl ScaleAtom {
    pub fn new(base: AtomRef, xscale: f32, yscale: f32) -> Self {
        Self { base, xscale, yscale }
    }

    pub fn reflect(base: AtomRef) -> Self {
        Self::new(base, -1.0, 1.0)
    }
}

impl Atom for ScaleAtom {
    fn create_box(&self, env: &Environment<'_>) -> MathResult<MathBox> {
        let b = self.base.create_box(env)?;
        Ok(ScaleBox::new(b, self.xscale, self.yscale).into())
    }

    forward_types!();
}

/// `\resizebox`: scales its base to a target width and/or height
#[derive(Debug)]
pub struct ResizeAtom {
    base: AtomRef,
    width: Option<(Unit, f32)>,
    height: Option<(Unit, f32)>,
    keep_aspect_ratio: bool,
}

impl ResizeAtom {
    pub fn new(base: AtomRef, width: Option<(Unit, f32)>, height: Option<(Unit, f32)>) -> Self {
        Self {
            base,
            width,
            height,
            keep_aspect_ratio: false,
        }
    }

    /// With both sizes given, scale by the smaller factor on both axes
    pub fn keep_aspect_ratio(mut self) -> Self {
        self.keep_aspect_ratio = true;
        self
    }
}

impl Atom for ResizeAtom {
    fn create_box(&self, env: &Environment<'_>) -> MathResult<MathBox> {
        let b = self.base.create_box(env)?;
        let width = self.width.map(|(unit, w)| unit.to_layout(w, env));
        let height = self.height.map(|(unit, h)| unit.to_layout(h, env));
        let (xscale, yscale) = match (width, height) {
            (None, None) => return Ok(b),
            (Some(w), None) => {
                let s = w / b.width();
                (s, s)
            }
            (None, Some(h)) => {
                let s = h / b.height();
                (s, s)
            }
            (Some(w), Some(h)) => {
                let (x, y) = (w / b.width(), h / b.height());
                if self.keep_aspect_ratio {
                    let s = x.min(y);
                    (s, s)
                } else {
                    (x, y)
                }
            }
        };
        // a zero-sized base gives a non-finite factor, which the scale box neutralises
        Ok(ScaleBox::new(b, xscale, yscale).into())
    }

    forward_types!();
}

/// Where a [`RotateAtom`] turns its base
#[derive(Debug, Clone, Copy, PartialEq)]
enum Pivot {
    Named(RotationOrigin),
    Point(Unit, f32, f32),
}

/// `\rotatebox`: turns its base counterclockwise by an angle in degrees
#[derive(Debug)]
pub struct RotateAtom {
    base: AtomRef,
    angle: f32,
    pivot: Pivot,
}

impl RotateAtom {
    /// Rotate around the left end of the baseline
    pub fn new(base: AtomRef, angle: f32) -> Self {
        Self {
            base,
            angle,
            pivot: Pivot::Named(RotationOrigin::BaselineLeft),
        }
    }

    pub fn around(mut self, origin: RotationOrigin) -> Self {
        self.pivot = Pivot::Named(origin);
        self
    }

    /// Rotate around an explicit point, relative to the reference point
    pub fn around_point(mut self, unit: Unit, x: f32, y: f32) -> Self {
        self.pivot = Pivot::Point(unit, x, y);
        self
    }
}

impl Atom for RotateAtom {
    fn create_box(&self, env: &Environment<'_>) -> MathResult<MathBox> {
        let b = self.base.create_box(env)?;
        let rotated = match self.pivot {
            Pivot::Named(origin) => RotateBox::around(b, self.angle, origin),
            Pivot::Point(unit, x, y) => {
                let factor = unit.factor(env);
                RotateBox::new(b, self.angle, x * factor, y * factor)
            }
        };
        Ok(rotated.into())
    }

    forward_types!();
}

// =============================================================================
// Phantoms and smashing
// =============================================================================

/// Takes the space of its base without drawing it
#[derive(Debug)]
pub struct PhantomAtom {
    base: AtomRef,
    width: bool,
    height: bool,
    depth: bool,
}

impl PhantomAtom {
    /// `\phantom`: all dimensions kept
    pub fn new(base: AtomRef) -> Self {
        Self::with_dimensions(base, true, true, true)
    }

    /// `\hphantom` keeps only the width, `\vphantom` only height and depth
    pub fn with_dimensions(base: AtomRef, width: bool, height: bool, depth: bool) -> Self {
        Self {
            base,
            width,
            height,
            depth,
        }
    }
}

impl Atom for PhantomAtom {
    fn create_box(&self, env: &Environment<'_>) -> MathResult<MathBox> {
        let b = self.base.create_box(env)?;
        let pick = |keep: bool, value: f32| if keep { value } else { 0.0 };
        Ok(StrutBox::new(
            pick(self.width, b.width()),
            pick(self.height, b.height()),
            pick(self.depth, b.depth()),
            b.shift(),
        )
        .into())
    }

    forward_types!();
}

/// `\smash`: draws its base but reports no height and/or depth
#[derive(Debug)]
pub struct SmashedAtom {
    base: AtomRef,
    top: bool,
    bottom: bool,
}

impl SmashedAtom {
    pub fn new(base: AtomRef) -> Self {
        Self::with_sides(base, true, true)
    }

    /// `\smash[t]` smashes the top only, `\smash[b]` the bottom only
    pub fn with_sides(base: AtomRef, top: bool, bottom: bool) -> Self {
        Self { base, top, bottom }
    }
}

impl Atom for SmashedAtom {
    fn create_box(&self, env: &Environment<'_>) -> MathResult<MathBox> {
        let mut b = self.base.create_box(env)?;
        if self.top {
            b.set_height(0.0);
        }
        if self.bottom {
            b.set_depth(0.0);
        }
        Ok(b)
    }

    forward_types!();
}

// =============================================================================
// Graphics
// =============================================================================

/// An external image.
///
/// Images are loaded by the caller; the atom only needs the pixel size. An
/// image that could not be read is replaced by its name in red.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsAtom {
    name: String,
    size: Option<(u32, u32)>,
}

impl GraphicsAtom {
    pub fn new(name: &str, width: u32, height: u32) -> Self {
        Self {
            name: name.to_string(),
            size: Some((width, height)),
        }
    }

    /// An image that failed to load
    pub fn unreadable(name: &str) -> Self {
        Self {
            name: name.to_string(),
            size: None,
        }
    }

    fn placeholder(&self, env: &Environment<'_>) -> MathResult<MathBox> {
        let mut text = HorizontalBox::new();
        for ch in self.name.chars() {
            match env.font().text_glyph(ch, "mathrm", env.style()) {
                Ok(glyph) => text.add(CharBox::new(glyph).into()),
                // characters the font lacks are left out of the placeholder
                Err(err @ LayoutError::MissingGlyph { .. }) => {
                    warn!(image = %self.name, %err, "character left out of image placeholder");
                }
                Err(err) => return Err(err),
            }
        }
        env.flags().mark_color();
        Ok(ColorBox::new(text.into(), Some(Color::RED), None).into())
    }
}

impl Atom for GraphicsAtom {
    fn create_box(&self, env: &Environment<'_>) -> MathResult<MathBox> {
        match self.size {
            Some((w, h)) if w > 0 && h > 0 => {
                env.flags().mark_graphics();
                let pixel = Unit::Pixel.factor(env);
                Ok(GraphicsBox::new(&self.name, w as f32 * pixel, h as f32 * pixel).into())
            }
            _ => {
                warn!(image = %self.name, "unreadable image replaced by its name");
                self.placeholder(env)
            }
        }
    }
}
