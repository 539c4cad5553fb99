//! Scaled and rotated boxes

use super::{BoxMetrics, MathBox};
use crate::render::Canvas;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A child scaled by independent horizontal and vertical factors.
///
/// A negative horizontal factor mirrors the child; a negative vertical factor
/// flips it over the baseline. Non-finite factors are replaced by zero, which
/// yields a degenerate box of zero size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleBox {
    pub(crate) metrics: BoxMetrics,
    pub(crate) inner: Box<MathBox>,
    xscale: f32,
    yscale: f32,
}

fn finite_or_zero(factor: f32) -> f32 {
    if factor.is_finite() {
        factor
    } else {
        0.0
    }
}

impl ScaleBox {
    pub fn new(inner: MathBox, xscale: f32, yscale: f32) -> Self {
        let xscale = finite_or_zero(xscale);
        let yscale = finite_or_zero(yscale);
        let m = *inner.metrics();
        let (height, depth) = if yscale > 0.0 {
            (m.height * yscale, m.depth * yscale)
        } else {
            (-m.depth * yscale, -m.height * yscale)
        };
        Self {
            metrics: BoxMetrics::new(m.width * xscale.abs(), height, depth, m.shift * yscale),
            inner: Box::new(inner),
            xscale,
            yscale,
        }
    }

    /// Uniform scaling
    pub fn uniform(inner: MathBox, factor: f32) -> Self {
        Self::new(inner, factor, factor)
    }

    pub fn inner(&self) -> &MathBox {
        &self.inner
    }

    pub fn xscale(&self) -> f32 {
        self.xscale
    }

    pub fn yscale(&self) -> f32 {
        self.yscale
    }

    pub(crate) fn draw(&self, canvas: &mut dyn Canvas, x: f32, y: f32) {
        if self.xscale == 0.0 || self.yscale == 0.0 {
            return;
        }
        let origin_x = if self.xscale < 0.0 { x + self.metrics.width } else { x };
        canvas.save();
        canvas.translate(origin_x, y);
        canvas.scale(self.xscale, self.yscale);
        self.inner.draw(canvas, 0.0, 0.0);
        canvas.restore();
    }
}

/// Point of a box that stays fixed while it is rotated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RotationOrigin {
    /// Bottom edge (below the depth)
    #[default]
    BottomLeft,
    BottomCenter,
    BottomRight,
    TopLeft,
    TopCenter,
    TopRight,
    /// On the baseline
    BaselineLeft,
    BaselineCenter,
    BaselineRight,
    /// Halfway between top and bottom
    CenterLeft,
    CenterCenter,
    CenterRight,
}

impl RotationOrigin {
    /// Coordinates of the origin relative to the reference point, y upwards
    fn point(self, m: &BoxMetrics) -> (f32, f32) {
        let middle = (m.height - m.depth) / 2.0;
        match self {
            RotationOrigin::BottomLeft => (0.0, -m.depth),
            RotationOrigin::BottomCenter => (m.width / 2.0, -m.depth),
            RotationOrigin::BottomRight => (m.width, -m.depth),
            RotationOrigin::TopLeft => (0.0, m.height),
            RotationOrigin::TopCenter => (m.width / 2.0, m.height),
            RotationOrigin::TopRight => (m.width, m.height),
            RotationOrigin::BaselineLeft => (0.0, 0.0),
            RotationOrigin::BaselineCenter => (m.width / 2.0, 0.0),
            RotationOrigin::BaselineRight => (m.width, 0.0),
            RotationOrigin::CenterLeft => (0.0, middle),
            RotationOrigin::CenterCenter => (m.width / 2.0, middle),
            RotationOrigin::CenterRight => (m.width, middle),
        }
    }
}

impl FromStr for RotationOrigin {
    type Err = String;

    /// Parse graphicx-style origin codes such as `bl`, `c`, `Br` or `tc`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut vertical = 'c';
        let mut horizontal = 'c';
        let mut saw_vertical = false;
        for c in s.chars() {
            match c {
                't' | 'b' | 'B' => {
                    vertical = c;
                    saw_vertical = true;
                }
                'l' | 'r' => horizontal = c,
                'c' if !saw_vertical => vertical = 'c',
                'c' => horizontal = 'c',
                other => return Err(format!("invalid rotation origin '{other}' in {s:?}")),
            }
        }
        Ok(match (vertical, horizontal) {
            ('t', 'l') => RotationOrigin::TopLeft,
            ('t', 'r') => RotationOrigin::TopRight,
            ('t', _) => RotationOrigin::TopCenter,
            ('b', 'l') => RotationOrigin::BottomLeft,
            ('b', 'r') => RotationOrigin::BottomRight,
            ('b', _) => RotationOrigin::BottomCenter,
            ('B', 'l') => RotationOrigin::BaselineLeft,
            ('B', 'r') => RotationOrigin::BaselineRight,
            ('B', _) => RotationOrigin::BaselineCenter,
            (_, 'l') => RotationOrigin::CenterLeft,
            (_, 'r') => RotationOrigin::CenterRight,
            _ => RotationOrigin::CenterCenter,
        })
    }
}

/// A child rotated counterclockwise around a fixed point.
///
/// The metrics are the bounding box of the rotated child; the rotation point
/// keeps its position relative to the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotateBox {
    pub(crate) metrics: BoxMetrics,
    pub(crate) inner: Box<MathBox>,
    angle: f32,
    shift_x: f32,
    shift_y: f32,
    x_min: f32,
}

impl RotateBox {
    /// Rotate by `degrees` around `(origin_x, origin_y)`, given relative to
    /// the reference point with y pointing up
    pub fn new(inner: MathBox, degrees: f32, origin_x: f32, origin_y: f32) -> Self {
        let angle = degrees.to_radians();
        let m = *inner.metrics();
        let (s, c) = angle.sin_cos();
        let shift_x = origin_x * (1.0 - c) + origin_y * s;
        let shift_y = origin_y * (1.0 - c) - origin_x * s;

        let xs = [-m.height * s, m.depth * s, m.width * c + m.depth * s, m.width * c - m.height * s];
        let ys = [m.height * c, -m.depth * c, m.width * s - m.depth * c, m.width * s + m.height * c];
        let x_max = xs.iter().copied().fold(f32::NEG_INFINITY, f32::max) + shift_x;
        let x_min = xs.iter().copied().fold(f32::INFINITY, f32::min) + shift_x;
        let y_max = ys.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let y_min = ys.iter().copied().fold(f32::INFINITY, f32::min);

        Self {
            metrics: BoxMetrics::new(x_max - x_min, y_max + shift_y, -y_min - shift_y, m.shift),
            inner: Box::new(inner),
            angle,
            shift_x,
            shift_y,
            x_min,
        }
    }

    /// Rotate around one of the named points of the child
    pub fn around(inner: MathBox, degrees: f32, origin: RotationOrigin) -> Self {
        let (ox, oy) = origin.point(inner.metrics());
        Self::new(inner, degrees, ox, oy)
    }

    pub fn inner(&self) -> &MathBox {
        &self.inner
    }

    /// Rotation angle in radians
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub(crate) fn draw(&self, canvas: &mut dyn Canvas, x: f32, y: f32) {
        let x = x + self.shift_x - self.x_min;
        let y = y - self.shift_y;
        canvas.save();
        canvas.translate(x, y);
        canvas.rotate(-self.angle);
        self.inner.draw(canvas, 0.0, 0.0);
        canvas.restore();
    }
}
