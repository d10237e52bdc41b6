use crate::model::{Color, PixelPoint, PixelRect};

/// The immediate-mode draw primitives the host renderer already provides.
/// The editor orchestrates these; it never rasterizes anything itself. Text
/// metrics live here too because label layout depends on the host font.
pub trait DrawSurface {
    fn font_height(&self) -> i32;
    fn text_width(&self, text: &str) -> i32;
    fn line(&mut self, from: PixelPoint, to: PixelPoint, color: Color);
    fn fill_rect(&mut self, rect: PixelRect, color: Color);
    fn fill_triangle(&mut self, a: PixelPoint, b: PixelPoint, c: PixelPoint, color: Color);
    fn fill_circle(&mut self, center: PixelPoint, radius: f32, color: Color);
    /// `rotated` text runs bottom-to-top from the anchor (Y axis label).
    fn text(&mut self, at: PixelPoint, text: &str, color: Color, rotated: bool);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Line {
        from: PixelPoint,
        to: PixelPoint,
        color: Color,
    },
    FillRect {
        rect: PixelRect,
        color: Color,
    },
    FillTriangle {
        a: PixelPoint,
        b: PixelPoint,
        c: PixelPoint,
        color: Color,
    },
    FillCircle {
        center: PixelPoint,
        radius: f32,
        color: Color,
    },
    Text {
        at: PixelPoint,
        text: String,
        rotated: bool,
    },
}

/// Captures draw calls instead of rasterizing them, with fixed-size font
/// metrics so layout is deterministic in tests.
#[derive(Debug)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
    font_height: i32,
    char_width: i32,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            font_height: 12,
            char_width: 6,
        }
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Line { .. }))
    }

    pub fn rects(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::FillRect { .. }))
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::FillCircle { .. }))
    }

    pub fn triangles(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::FillTriangle { .. }))
    }

    pub fn texts(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Text { .. }))
    }
}

impl DrawSurface for RecordingSurface {
    fn font_height(&self) -> i32 {
        self.font_height
    }

    fn text_width(&self, text: &str) -> i32 {
        text.chars().count() as i32 * self.char_width
    }

    fn line(&mut self, from: PixelPoint, to: PixelPoint, color: Color) {
        self.calls.push(DrawCall::Line { from, to, color });
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        self.calls.push(DrawCall::FillRect { rect, color });
    }

    fn fill_triangle(&mut self, a: PixelPoint, b: PixelPoint, c: PixelPoint, color: Color) {
        self.calls.push(DrawCall::FillTriangle { a, b, c, color });
    }

    fn fill_circle(&mut self, center: PixelPoint, radius: f32, color: Color) {
        self.calls.push(DrawCall::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn text(&mut self, at: PixelPoint, text: &str, _color: Color, rotated: bool) {
        self.calls.push(DrawCall::Text {
            at,
            text: text.to_owned(),
            rotated,
        });
    }
}
