use cgmath::Point2;

use crate::faces::Rgba;

/// Pixel position, origin top-left.
pub type PixelPoint = Point2<f64>;

/// 2D drawing surface the diagnostic panels paint onto.
pub trait Canvas {
    fn fill_rect(&mut self, min: PixelPoint, max: PixelPoint, color: Rgba);
    fn stroke_rect(&mut self, min: PixelPoint, max: PixelPoint, color: Rgba, thickness: f32);
    fn line(&mut self, start: PixelPoint, end: PixelPoint, color: Rgba, thickness: f32);
    fn circle(&mut self, center: PixelPoint, radius: f64, color: Rgba, filled: bool);
    fn text(&mut self, origin: PixelPoint, text: &str, scale: f32, color: Rgba);
}

#[derive(Clone, Debug, PartialEq)]
pub enum OverlayPrimitive {
    FillRect {
        min: PixelPoint,
        max: PixelPoint,
        color: Rgba,
    },
    StrokeRect {
        min: PixelPoint,
        max: PixelPoint,
        color: Rgba,
        thickness: f32,
    },
    Line {
        start: PixelPoint,
        end: PixelPoint,
        color: Rgba,
        thickness: f32,
    },
    Circle {
        center: PixelPoint,
        radius: f64,
        color: Rgba,
        filled: bool,
    },
    Text {
        origin: PixelPoint,
        text: String,
        scale: f32,
        color: Rgba,
    },
}

/// Canvas that just records what was drawn.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    pub primitives: Vec<OverlayPrimitive>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn clear(&mut self) {
        self.primitives.clear();
    }

    pub fn texts(&self) -> Vec<&str> {
        self.primitives
            .iter()
            .filter_map(|p| match p {
                OverlayPrimitive::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn lines(&self) -> impl Iterator<Item = &OverlayPrimitive> {
        self.primitives
            .iter()
            .filter(|p| matches!(p, OverlayPrimitive::Line { .. }))
    }
}

impl Canvas for DrawList {
    fn fill_rect(&mut self, min: PixelPoint, max: PixelPoint, color: Rgba) {
        self.primitives.push(OverlayPrimitive::FillRect { min, max, color });
    }

    fn stroke_rect(&mut self, min: PixelPoint, max: PixelPoint, color: Rgba, thickness: f32) {
        self.primitives.push(OverlayPrimitive::StrokeRect {
            min,
            max,
            color,
            thickness,
        });
    }

    fn line(&mut self, start: PixelPoint, end: PixelPoint, color: Rgba, thickness: f32) {
        self.primitives.push(OverlayPrimitive::Line {
            start,
            end,
            color,
            thickness,
        });
    }

    fn circle(&mut self, center: PixelPoint, radius: f64, color: Rgba, filled: bool) {
        self.primitives.push(OverlayPrimitive::Circle {
            center,
            radius,
            color,
            filled,
        });
    }

    fn text(&mut self, origin: PixelPoint, text: &str, scale: f32, color: Rgba) {
        self.primitives.push(OverlayPrimitive::Text {
            origin,
            text: text.to_owned(),
            scale,
            color,
        });
    }
}
