use crate::model::{PixelPoint, RenderPoint};

/// Finds the first rendered point within `radius` pixels of `at`. Scan order
/// breaks ties; markers are small enough that overlaps don't happen in
/// practice.
pub fn find_hit(points: &[RenderPoint], at: PixelPoint, radius: f32) -> Option<usize> {
    points
        .iter()
        .position(|point| point.pixel.distance_to(at) <= radius)
}
