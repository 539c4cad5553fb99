//! Frames, shadows and colors around a single child

use super::{BoxMetrics, MathBox};
use crate::render::{Canvas, Color, Rect};
use serde::{Deserialize, Serialize};

/// A child surrounded by a rectangular frame.
///
/// The frame adds `thickness + space` on all four sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FramedBox {
    pub(crate) metrics: BoxMetrics,
    pub(crate) inner: Box<MathBox>,
    thickness: f32,
    space: f32,
    line: Option<Color>,
    background: Option<Color>,
}

impl FramedBox {
    pub fn new(inner: MathBox, thickness: f32, space: f32) -> Self {
        let m = *inner.metrics();
        let pad = thickness + space;
        Self {
            metrics: BoxMetrics::new(m.width + 2.0 * pad, m.height + pad, m.depth + pad, m.shift),
            inner: Box::new(inner),
            thickness,
            space,
            line: None,
            background: None,
        }
    }

    /// Frame line and background colors
    pub fn with_colors(mut self, line: Option<Color>, background: Option<Color>) -> Self {
        self.line = line;
        self.background = background;
        self
    }

    pub fn inner(&self) -> &MathBox {
        &self.inner
    }

    pub fn thickness(&self) -> f32 {
        self.thickness
    }

    pub fn space(&self) -> f32 {
        self.space
    }

    pub(crate) fn draw(&self, canvas: &mut dyn Canvas, x: f32, y: f32) {
        self.draw_frame(canvas, x, y, 0.0);
    }

    fn draw_frame(&self, canvas: &mut dyn Canvas, x: f32, y: f32, shadow: f32) {
        let m = &self.metrics;
        let th = self.thickness;
        let previous = canvas.color();
        let frame = Rect::new(
            x + th / 2.0,
            y - m.height + th / 2.0,
            m.width - shadow - th,
            m.total_height() - shadow - th,
        );
        if let Some(bg) = self.background {
            canvas.set_color(bg);
            canvas.fill_rect(frame);
        }
        canvas.set_color(self.line.unwrap_or(previous));
        canvas.stroke_rect(frame, th);
        if shadow > 0.0 {
            canvas.fill_rect(Rect::new(x + shadow, y + m.depth - shadow, m.width - shadow, shadow));
            canvas.fill_rect(Rect::new(
                x + m.width - shadow,
                y - m.height + th + shadow,
                shadow,
                m.total_height() - 2.0 * shadow - th,
            ));
        }
        canvas.set_color(previous);
        // the frame took over the child's shift
        self.inner.draw(canvas, x + self.space + th, y);
    }
}

/// A framed box with a drop shadow on its right and bottom edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowBox {
    pub(crate) metrics: BoxMetrics,
    pub(crate) frame: FramedBox,
    shadow_rule: f32,
}

impl ShadowBox {
    pub fn new(frame: FramedBox, shadow_rule: f32) -> Self {
        let mut metrics = frame.metrics;
        metrics.width += shadow_rule;
        metrics.depth += shadow_rule;
        Self {
            metrics,
            frame,
            shadow_rule,
        }
    }

    pub fn frame(&self) -> &FramedBox {
        &self.frame
    }

    pub(crate) fn draw(&self, canvas: &mut dyn Canvas, x: f32, y: f32) {
        let mut frame = self.frame.clone();
        frame.metrics = self.metrics;
        frame.draw_frame(canvas, x, y, self.shadow_rule);
    }
}

/// Paints its child with a foreground and an optional background color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorBox {
    pub(crate) metrics: BoxMetrics,
    pub(crate) inner: Box<MathBox>,
    foreground: Option<Color>,
    background: Option<Color>,
}

impl ColorBox {
    pub fn new(inner: MathBox, foreground: Option<Color>, background: Option<Color>) -> Self {
        Self {
            metrics: *inner.metrics(),
            inner: Box::new(inner),
            foreground,
            background,
        }
    }

    pub fn inner(&self) -> &MathBox {
        &self.inner
    }

    pub fn foreground(&self) -> Option<Color> {
        self.foreground
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub(crate) fn draw(&self, canvas: &mut dyn Canvas, x: f32, y: f32) {
        let m = &self.metrics;
        let previous = canvas.color();
        if let Some(bg) = self.background {
            canvas.set_color(bg);
            canvas.fill_rect(Rect::new(x, y - m.height, m.width, m.total_height()));
        }
        canvas.set_color(self.foreground.unwrap_or(previous));
        // the child's own shift is already part of ours
        self.inner.draw(canvas, x, y);
        canvas.set_color(previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::StrutBox;
    use crate::render::{count_primitives, RenderPrimitive, Renderer};

    fn content() -> MathBox {
        StrutBox::new(2.0, 1.0, 0.5, 0.25).into()
    }

    #[test]
    fn test_frame_padding() {
        let framed = FramedBox::new(content(), 0.1, 0.2);
        assert!((framed.metrics.width - 2.6).abs() < 1e-6);
        assert!((framed.metrics.height - 1.3).abs() < 1e-6);
        assert!((framed.metrics.depth - 0.8).abs() < 1e-6);
        assert_eq!(framed.metrics.shift, 0.25);
    }

    #[test]
    fn test_shadow_extends_right_and_bottom() {
        let framed = FramedBox::new(content(), 0.1, 0.2);
        let frame_metrics = framed.metrics;
        let shadow = ShadowBox::new(framed, 0.3);
        assert!((shadow.metrics.width - (frame_metrics.width + 0.3)).abs() < 1e-6);
        assert!((shadow.metrics.depth - (frame_metrics.depth + 0.3)).abs() < 1e-6);
        assert_eq!(shadow.metrics.height, frame_metrics.height);

        let output = Renderer::new().render(&MathBox::Shadow(shadow));
        let filled = count_primitives(&output.primitives, &|p| {
            matches!(p, RenderPrimitive::Rectangle { fill: Some(_), .. })
        });
        assert_eq!(filled, 2);
    }

    #[test]
    fn test_color_box_keeps_metrics() {
        let colored = ColorBox::new(content(), Some(Color::RED), Some(Color::WHITE));
        assert_eq!(colored.metrics, *content().metrics());
    }
}
