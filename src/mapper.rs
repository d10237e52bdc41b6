use crate::model::{PixelPoint, PixelRect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Time,
    Value,
}

/// Mapping between a zero-span axis and pixels has no defined result, so the
/// mapper refuses it instead of dividing by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DegenerateRangeError {
    pub axis: Axis,
}

impl std::fmt::Display for DegenerateRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.axis {
            Axis::Time => write!(f, "time axis spans zero width"),
            Axis::Value => write!(f, "value axis spans zero height"),
        }
    }
}

impl std::error::Error for DegenerateRangeError {}

/// The domain window mapped onto the content rect, with the label strings
/// shown at the axis extremes.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRange {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
    pub min_x_label: String,
    pub min_y_label: String,
    pub max_x_label: String,
    pub max_y_label: String,
}

impl Default for DisplayRange {
    fn default() -> Self {
        DisplayRange::from_labels("0", "0", "1", "10")
    }
}

fn parse_label(label: &str) -> f32 {
    label.trim().parse().unwrap_or(0.0)
}

/// Quantizes a 0..1 ratio to 1/100 steps, giving 101 discrete positions per
/// axis for editing precision.
fn snap(ratio: f32) -> f32 {
    (ratio * 100.0).round() / 100.0
}

impl DisplayRange {
    /// Builds a range from the four boundary labels. Non-numeric labels fall
    /// back to zero.
    pub fn from_labels(min_x: &str, min_y: &str, max_x: &str, max_y: &str) -> Self {
        Self {
            min_x: parse_label(min_x),
            max_x: parse_label(max_x),
            min_y: parse_label(min_y),
            max_y: parse_label(max_y),
            min_x_label: min_x.to_owned(),
            min_y_label: min_y.to_owned(),
            max_x_label: max_x.to_owned(),
            max_y_label: max_y.to_owned(),
        }
    }

    /// Maps a (time, value) sample into the content rect. Y is inverted so a
    /// larger value lands higher on screen.
    pub fn to_pixel(
        &self,
        rect: PixelRect,
        time: f32,
        value: f32,
    ) -> Result<PixelPoint, DegenerateRangeError> {
        let width = self.max_x - self.min_x;
        if width == 0.0 {
            return Err(DegenerateRangeError { axis: Axis::Time });
        }
        let height = self.max_y - self.min_y;
        if height == 0.0 {
            return Err(DegenerateRangeError { axis: Axis::Value });
        }

        let ratio_x = (time - self.min_x) / width;
        let ratio_y = (value - self.min_y) / height;
        Ok(PixelPoint::new(
            rect.x + (rect.width as f32 * ratio_x) as i32,
            rect.y + (rect.height as f32 * (1.0 - ratio_y)) as i32,
        ))
    }

    /// Inverse of the X mapping, snapped to the 1/100 grid.
    pub fn time_at(&self, rect: PixelRect, x: i32) -> Result<f32, DegenerateRangeError> {
        if rect.width == 0 {
            return Err(DegenerateRangeError { axis: Axis::Time });
        }
        let ratio = snap((x - rect.x) as f32 / rect.width as f32);
        Ok(self.min_x + (self.max_x - self.min_x) * ratio)
    }

    /// Inverse of the Y mapping, snapped to the 1/100 grid.
    pub fn value_at(&self, rect: PixelRect, y: i32) -> Result<f32, DegenerateRangeError> {
        if rect.height == 0 {
            return Err(DegenerateRangeError { axis: Axis::Value });
        }
        let ratio = snap((y - rect.y) as f32 / rect.height as f32);
        Ok(self.min_y + (self.max_y - self.min_y) * (1.0 - ratio))
    }
}
