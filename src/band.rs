use crate::clip::clip_line;
use crate::mapper::{DegenerateRangeError, DisplayRange};
use crate::model::{Color, PixelPoint, PixelRect, RenderPoint};
use crate::surface::DrawSurface;

/// Shades the `base ± variation` envelope. The two curves are keyed
/// independently, so a pen walks each list and the curve without a key at
/// the current merge time is resampled by linear interpolation; once a list
/// runs out its last value is held. Each merge step emits one quadrilateral,
/// and the final value pair is extended flat to the right edge, mirroring
/// the curve's own trailing segment.
///
/// Either list being empty means there is nothing to composite.
pub fn draw_band(
    surface: &mut dyn DrawSurface,
    rect: PixelRect,
    range: &DisplayRange,
    base: &[RenderPoint],
    variation: &[RenderPoint],
    color: Color,
) -> Result<(), DegenerateRangeError> {
    if base.is_empty() || variation.is_empty() {
        return Ok(());
    }

    let mut base_pen = 0usize;
    let mut vari_pen = 0usize;
    let mut up1 = PixelPoint::default();
    let mut down1 = PixelPoint::default();

    while vari_pen < variation.len() || base_pen < base.len() {
        let vari = &variation[vari_pen.min(variation.len() - 1)];
        let b = &base[base_pen.min(base.len() - 1)];

        // The first pair seeds the envelope edges at time zero.
        if vari_pen == 0 && base_pen == 0 {
            up1 = range.to_pixel(rect, 0.0, b.value + vari.value)?;
            down1 = range.to_pixel(rect, 0.0, b.value - vari.value)?;
            vari_pen = 1;
            base_pen = 1;
            continue;
        }

        let up2;
        let down2;
        if vari_pen >= variation.len() || base_pen >= base.len() {
            // One curve is exhausted: hold its value and advance along the
            // other curve's times.
            let time = if vari_pen >= variation.len() {
                b.time
            } else {
                vari.time
            };
            up2 = range.to_pixel(rect, time, b.value + vari.value)?;
            down2 = range.to_pixel(rect, time, b.value - vari.value)?;
            vari_pen += 1;
            base_pen += 1;
        } else if vari.time == b.time {
            up2 = range.to_pixel(rect, b.time, b.value + vari.value)?;
            down2 = range.to_pixel(rect, b.time, b.value - vari.value)?;
            vari_pen += 1;
            base_pen += 1;
        } else if vari.time < b.time {
            let prev = &base[base_pen - 1];
            let ratio = (vari.time - prev.time) / (b.time - prev.time);
            let base_value = prev.value + (b.value - prev.value) * ratio;
            up2 = range.to_pixel(rect, vari.time, base_value + vari.value)?;
            down2 = range.to_pixel(rect, vari.time, base_value - vari.value)?;
            vari_pen += 1;
        } else {
            let prev = &variation[vari_pen - 1];
            let ratio = (b.time - prev.time) / (vari.time - prev.time);
            let vari_value = prev.value + (vari.value - prev.value) * ratio;
            up2 = range.to_pixel(rect, b.time, b.value + vari_value)?;
            down2 = range.to_pixel(rect, b.time, b.value - vari_value)?;
            base_pen += 1;
        }

        fill_quad(surface, rect, up1, up2, down1, down2, color);
        up1 = up2;
        down1 = down2;
    }

    let up2 = PixelPoint::new(rect.right(), up1.y);
    let down2 = PixelPoint::new(rect.right(), down1.y);
    if up1.x < up2.x {
        fill_quad(surface, rect, up1, up2, down1, down2, color);
    }
    Ok(())
}

/// Fills the quad `p1` (left-top), `p2` (right-top), `p3` (left-bottom),
/// `p4` (right-bottom) clipped against the rect, as a middle rectangle plus
/// a rectangle/triangle wedge along each sloped edge.
///
/// A quad whose top-left corner sits below its bottom-right (or top-right
/// below bottom-left) can't be decomposed that way without visible error, so
/// it is bisected at the midpoints of its horizontal edges and both halves
/// recurse. The recursion terminates because each split halves the height.
pub fn fill_quad(
    surface: &mut dyn DrawSurface,
    rect: PixelRect,
    p1: PixelPoint,
    p2: PixelPoint,
    p3: PixelPoint,
    p4: PixelPoint,
    color: Color,
) {
    if p1.y - p3.y == 0 && p2.y - p4.y == 0 {
        return;
    }

    let top = p1.y.min(p2.y);
    let height = p3.y.max(p4.y) - top;
    let area = PixelRect::new(p1.x, top, p2.x - p1.x, height);
    if !rect.overlaps(area) {
        return;
    }

    if (p1.y > p4.y || p2.y > p3.y) && area.height > 1 {
        let p5 = PixelPoint::new((p1.x + p2.x) / 2, (p1.y + p2.y) / 2);
        let p6 = PixelPoint::new((p3.x + p4.x) / 2, (p3.y + p4.y) / 2);
        fill_quad(surface, rect, p1, p5, p3, p6, color);
        fill_quad(surface, rect, p5, p2, p6, p4, color);
        return;
    }

    let top_edge = clip_line(rect, p1, p2);
    let bottom_edge = clip_line(rect, p3, p4);
    let left_edge = clip_line(rect, p1, p3);
    let right_edge = clip_line(rect, p2, p4);

    // A side edge entirely outside the rect means the quad runs off that
    // side; stand in a vertical segment on the rect boundary.
    let (left_start, left_end) = match left_edge {
        Some(edge) => edge,
        None => {
            let top_y = top_edge.map_or(rect.y, |(start, _)| start.y);
            let bottom_y = bottom_edge.map_or(rect.bottom(), |(start, _)| start.y);
            (
                PixelPoint::new(rect.x, top_y),
                PixelPoint::new(rect.x, bottom_y),
            )
        }
    };
    let (right_start, right_end) = match right_edge {
        Some(edge) => edge,
        None => {
            let x = rect.right() - 1;
            let top_y = top_edge.map_or(rect.y, |(_, end)| end.y);
            let bottom_y = bottom_edge.map_or(rect.bottom(), |(_, end)| end.y);
            (PixelPoint::new(x, top_y), PixelPoint::new(x, bottom_y))
        }
    };

    let left_x = left_start.x;
    let right_x = right_start.x;

    // Middle band spanning the vertical overlap of the two side edges.
    let y = left_start.y.max(right_start.y);
    let h = (left_end.y - y).min(right_end.y - y);
    surface.fill_rect(PixelRect::new(left_x, y, right_x - left_x, h), color);

    // Top wedge: the area between the sloped top edge and the middle band,
    // a backing rectangle plus a triangle oriented by the slope direction.
    if let Some((start, end)) = top_edge {
        if start.y != end.y {
            if left_x != start.x && start.y < end.y {
                surface.fill_rect(
                    PixelRect::new(left_x, start.y, start.x - left_x, end.y - start.y),
                    color,
                );
                surface.fill_triangle(start, PixelPoint::new(start.x, end.y), end, color);
            } else if right_x != end.x && start.y > end.y {
                surface.fill_rect(
                    PixelRect::new(end.x, end.y, right_x - end.x, start.y - end.y),
                    color,
                );
                surface.fill_triangle(start, PixelPoint::new(end.x, start.y), end, color);
            } else if start.y > end.y {
                surface.fill_triangle(start, PixelPoint::new(end.x, start.y), end, color);
            } else {
                surface.fill_triangle(start, PixelPoint::new(start.x, end.y), end, color);
            }
        }
    }

    // Bottom wedge, mirrored.
    if let Some((start, end)) = bottom_edge {
        if start.y != end.y {
            if left_x != start.x && start.y > end.y {
                surface.fill_rect(
                    PixelRect::new(left_x, end.y, start.x - left_x, start.y - end.y),
                    color,
                );
                surface.fill_triangle(end, PixelPoint::new(start.x, end.y), start, color);
            } else if right_x != end.x && start.y < end.y {
                surface.fill_rect(
                    PixelRect::new(end.x, start.y, right_x - end.x, end.y - start.y),
                    color,
                );
                surface.fill_triangle(start, end, PixelPoint::new(end.x, start.y), color);
            } else if start.y < end.y {
                surface.fill_triangle(start, end, PixelPoint::new(end.x, start.y), color);
            } else {
                surface.fill_triangle(start, end, PixelPoint::new(start.x, end.y), color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCall, RecordingSurface};

    const RECT: PixelRect = PixelRect::new(0, 0, 100, 100);
    const COLOR: Color = Color::rgba(255, 255, 255, 60);

    fn sample(time: f32, value: f32) -> RenderPoint {
        RenderPoint {
            pixel: PixelPoint::default(),
            time,
            value,
            index: 0,
        }
    }

    #[test]
    fn zero_height_quad_emits_no_draw_calls() {
        let mut surface = RecordingSurface::new();
        fill_quad(
            &mut surface,
            RECT,
            PixelPoint::new(0, 20),
            PixelPoint::new(50, 30),
            PixelPoint::new(0, 20),
            PixelPoint::new(50, 30),
            COLOR,
        );
        assert!(surface.calls.is_empty());
    }

    #[test]
    fn axis_aligned_quad_fills_a_single_rect() {
        let mut surface = RecordingSurface::new();
        fill_quad(
            &mut surface,
            RECT,
            PixelPoint::new(10, 10),
            PixelPoint::new(20, 10),
            PixelPoint::new(10, 20),
            PixelPoint::new(20, 20),
            COLOR,
        );
        assert_eq!(
            surface.calls,
            vec![DrawCall::FillRect {
                rect: PixelRect::new(10, 10, 10, 10),
                color: COLOR
            }]
        );
    }

    #[test]
    fn sloped_quad_fills_middle_band_plus_wedges() {
        let mut surface = RecordingSurface::new();
        fill_quad(
            &mut surface,
            RECT,
            PixelPoint::new(10, 10),
            PixelPoint::new(20, 15),
            PixelPoint::new(10, 20),
            PixelPoint::new(20, 25),
            COLOR,
        );
        let rects: Vec<_> = surface.rects().collect();
        assert_eq!(
            rects[0],
            &DrawCall::FillRect {
                rect: PixelRect::new(10, 15, 10, 5),
                color: COLOR
            }
        );
        assert_eq!(surface.triangles().count(), 2);
    }

    #[test]
    fn quad_outside_the_rect_is_skipped() {
        let mut surface = RecordingSurface::new();
        fill_quad(
            &mut surface,
            RECT,
            PixelPoint::new(200, 10),
            PixelPoint::new(250, 15),
            PixelPoint::new(200, 30),
            PixelPoint::new(250, 40),
            COLOR,
        );
        assert!(surface.calls.is_empty());
    }

    #[test]
    fn crossing_edges_bisect_until_renderable() {
        let mut surface = RecordingSurface::new();
        fill_quad(
            &mut surface,
            RECT,
            PixelPoint::new(0, 30),
            PixelPoint::new(40, 0),
            PixelPoint::new(0, 40),
            PixelPoint::new(40, 10),
            COLOR,
        );
        assert!(!surface.calls.is_empty());
        for call in &surface.calls {
            if let DrawCall::FillRect { rect, .. } = call {
                assert!(rect.x >= RECT.x && rect.right() <= RECT.right() + 1);
            }
        }
    }

    #[test]
    fn flat_variation_band_fills_one_rect_across_the_graph() {
        let mut surface = RecordingSurface::new();
        let range = DisplayRange::default();
        let base = [sample(0.0, 5.0), sample(1.0, 5.0)];
        let variation = [sample(0.0, 1.0)];

        draw_band(&mut surface, RECT, &range, &base, &variation, COLOR).unwrap();

        // upper = 6 maps to y 40, lower = 4 maps to y 60; the variation list
        // is exhausted after the seed so the band stays flat through time 1,
        // and the trailing quad is skipped because the last pair already
        // touches the right edge.
        assert_eq!(
            surface.calls,
            vec![DrawCall::FillRect {
                rect: PixelRect::new(0, 40, 100, 20),
                color: COLOR
            }]
        );
    }

    #[test]
    fn short_base_holds_its_value_through_the_variation_tail() {
        let mut surface = RecordingSurface::new();
        let range = DisplayRange::default();
        let base = [sample(0.0, 5.0)];
        let variation = [sample(0.0, 1.0), sample(0.5, 3.0)];

        draw_band(&mut surface, RECT, &range, &base, &variation, COLOR).unwrap();

        // Envelope widens from ±1 at t=0 to ±3 at t=0.5 (one sloped quad:
        // middle band plus two triangle wedges), then runs flat to the right
        // edge via the trailing quad.
        assert_eq!(surface.triangles().count(), 2);
        let rects: Vec<_> = surface.rects().collect();
        assert_eq!(
            rects,
            vec![
                &DrawCall::FillRect {
                    rect: PixelRect::new(0, 40, 50, 20),
                    color: COLOR
                },
                &DrawCall::FillRect {
                    rect: PixelRect::new(50, 20, 50, 60),
                    color: COLOR
                },
            ]
        );
    }

    #[test]
    fn empty_lists_composite_nothing() {
        let mut surface = RecordingSurface::new();
        let range = DisplayRange::default();
        draw_band(&mut surface, RECT, &range, &[], &[sample(0.0, 1.0)], COLOR).unwrap();
        draw_band(&mut surface, RECT, &range, &[sample(0.0, 1.0)], &[], COLOR).unwrap();
        assert!(surface.calls.is_empty());
    }

    #[test]
    fn single_key_curves_emit_only_the_trailing_band() {
        let mut surface = RecordingSurface::new();
        let range = DisplayRange::default();
        let base = [sample(0.0, 5.0)];
        let variation = [sample(0.0, 2.0)];

        draw_band(&mut surface, RECT, &range, &base, &variation, COLOR).unwrap();

        // Seed consumes both lists; the only geometry is the flat extension
        // to the right edge: ±2 around 5 maps to y 30..70.
        assert_eq!(
            surface.calls,
            vec![DrawCall::FillRect {
                rect: PixelRect::new(0, 30, 100, 40),
                color: COLOR
            }]
        );
    }

    #[test]
    fn mismatched_key_times_interpolate_the_other_curve() {
        let mut surface = RecordingSurface::new();
        let range = DisplayRange::default();
        // Base ramps 4..6 over t 0..1; the variation key at t=0.5 has no
        // matching base key, so the base resamples to 5 there and the upper
        // edge passes through value 8 => pixel (50, 20).
        let base = [sample(0.0, 4.0), sample(1.0, 6.0)];
        let variation = [sample(0.0, 3.0), sample(0.5, 3.0)];

        draw_band(&mut surface, RECT, &range, &base, &variation, COLOR).unwrap();

        let rects: Vec<_> = surface.rects().collect();
        assert_eq!(
            rects,
            vec![
                &DrawCall::FillRect {
                    rect: PixelRect::new(0, 30, 50, 50),
                    color: COLOR
                },
                &DrawCall::FillRect {
                    rect: PixelRect::new(50, 20, 50, 50),
                    color: COLOR
                },
            ]
        );
        assert_eq!(surface.triangles().count(), 4);
    }
}
