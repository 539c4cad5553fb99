//! Base with a horizontal brace (and optional script) above or below it

use super::{BoxMetrics, MathBox};
use crate::render::Canvas;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

/// A base box with a delimiter laid on its side above or below it.
///
/// The delimiter is built vertically and turned a quarter counterclockwise
/// when drawn, so its width becomes the vertical space it occupies. An
/// optional script sits `kern` beyond the delimiter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverUnderBox {
    pub(crate) metrics: BoxMetrics,
    pub(crate) base: Box<MathBox>,
    delimiter: Box<MathBox>,
    script: Option<Box<MathBox>>,
    kern: f32,
    over: bool,
}

impl OverUnderBox {
    pub fn new(base: MathBox, delimiter: MathBox, script: Option<MathBox>, kern: f32, over: bool) -> Self {
        let b = *base.metrics();
        let band = delimiter.width();
        let script_extent = script.as_ref().map_or(0.0, |s| s.total_height() + kern);
        let (height, depth) = if over {
            (b.height + band + script_extent, b.depth)
        } else {
            (b.height, b.depth + band + script_extent)
        };
        Self {
            metrics: BoxMetrics::new(b.width, height, depth, 0.0),
            base: Box::new(base),
            delimiter: Box::new(delimiter),
            script: script.map(Box::new),
            kern,
            over,
        }
    }

    pub fn base(&self) -> &MathBox {
        &self.base
    }

    pub fn delimiter(&self) -> &MathBox {
        &self.delimiter
    }

    pub fn script(&self) -> Option<&MathBox> {
        self.script.as_deref()
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub(crate) fn draw(&self, canvas: &mut dyn Canvas, x: f32, y: f32) {
        self.base.draw(canvas, x, y);

        // hang the delimiter from its top so that, once turned, it spans the band
        let mut del = (*self.delimiter).clone();
        let length = del.total_height();
        del.set_depth(length);
        del.set_height(0.0);
        let band = del.width();
        let offset = (self.metrics.width - length) / 2.0;

        let band_bottom = if self.over {
            y - self.base.height()
        } else {
            y + self.base.depth() + band
        };
        canvas.save();
        canvas.translate(x + offset, band_bottom);
        canvas.rotate(-FRAC_PI_2);
        del.draw(canvas, 0.0, 0.0);
        canvas.restore();

        if let Some(script) = &self.script {
            let script_y = if self.over {
                band_bottom - band - self.kern - script.depth()
            } else {
                band_bottom + self.kern + script.height()
            };
            script.draw(canvas, x, script_y);
        }
    }
}
