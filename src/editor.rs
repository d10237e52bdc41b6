use crate::hit::find_hit;
use crate::mapper::{DegenerateRangeError, DisplayRange};
use crate::model::{PixelPoint, PixelRect, RenderPoint};
use crate::store::KeyframeField;

/// Everything a gesture needs besides the field store: the grid rect the
/// points were computed against, the domain window, the computed point list
/// and the marker hit radius.
pub struct EditContext<'a> {
    pub grid: PixelRect,
    pub range: &'a DisplayRange,
    pub points: &'a [RenderPoint],
    pub radius: f32,
}

/// Pointer press: a double press on a marker deletes its key, a press on
/// empty grid space inserts a key at the snapped cursor position, a single
/// press on a marker just selects it. Returns whether the store changed.
pub fn handle_press(
    ctx: &EditContext<'_>,
    field: &mut dyn KeyframeField,
    at: PixelPoint,
    click_count: u32,
    selection: &mut Option<usize>,
) -> Result<bool, DegenerateRangeError> {
    *selection = find_hit(ctx.points, at, ctx.radius);

    match *selection {
        Some(index) if click_count == 2 => {
            field.remove_key(index);
            *selection = None;
            tracing::debug!(index, "removed keyframe");
            Ok(true)
        }
        None if ctx.grid.contains(at) => {
            let time = ctx.range.time_at(ctx.grid, at.x)?;
            let value = ctx.range.value_at(ctx.grid, at.y)?;
            let index = field.add_key(time, value);
            *selection = Some(index);
            tracing::debug!(index, time, value, "inserted keyframe");
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Pointer drag with a selected marker. The position is clamped into the
/// grid first. Key 0 is pinned to time 0 and only its value moves. For later
/// keys, a candidate time that matches the key's current time or collides
/// with another key updates the value in place; otherwise the key is
/// re-inserted at the new time and the selection follows the returned index.
pub fn handle_drag(
    ctx: &EditContext<'_>,
    field: &mut dyn KeyframeField,
    at: PixelPoint,
    selection: &mut Option<usize>,
) -> Result<bool, DegenerateRangeError> {
    let Some(index) = *selection else {
        return Ok(false);
    };

    let point = ctx.grid.clamp_point(at);

    if index == 0 {
        let value = ctx.range.value_at(ctx.grid, point.y)?;
        field.set_key_value(0, value);
        return Ok(true);
    }

    let time = ctx.range.time_at(ctx.grid, point.x)?;
    let value = ctx.range.value_at(ctx.grid, point.y)?;
    if time == field.key(index).time || field.has_key_at(time) {
        field.set_key_value(index, value);
    } else {
        field.remove_key(index);
        let new_index = field.add_key(time, value);
        *selection = Some(new_index);
        tracing::trace!(from = index, to = new_index, time, "keyframe moved in time");
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryField;

    fn context<'a>(range: &'a DisplayRange, points: &'a [RenderPoint]) -> EditContext<'a> {
        EditContext {
            grid: PixelRect::new(0, 0, 100, 100),
            range,
            points,
            radius: 5.0,
        }
    }

    fn projected(field: &MemoryField, range: &DisplayRange, grid: PixelRect) -> Vec<RenderPoint> {
        field
            .keys()
            .iter()
            .enumerate()
            .map(|(index, key)| RenderPoint {
                pixel: range.to_pixel(grid, key.time, key.value).unwrap(),
                time: key.time,
                value: key.value,
                index,
            })
            .collect()
    }

    #[test]
    fn press_on_empty_grid_inserts_a_snapped_key() {
        let range = DisplayRange::default();
        let mut field = MemoryField::new();
        let mut selection = None;

        let changed = handle_press(
            &context(&range, &[]),
            &mut field,
            PixelPoint::new(50, 50),
            1,
            &mut selection,
        )
        .unwrap();

        assert!(changed);
        assert_eq!(field.key_count(), 1);
        assert_eq!(selection, Some(0));
        let key = field.key(0);
        assert!((key.time - 0.5).abs() < 0.011);
        assert!((key.value - 5.0).abs() < 0.11);
    }

    #[test]
    fn single_press_on_a_marker_selects_without_mutating() {
        let range = DisplayRange::default();
        let mut field = MemoryField::from_keys(&[(0.0, 5.0), (0.5, 5.0)]);
        let points = projected(&field, &range, PixelRect::new(0, 0, 100, 100));
        let mut selection = None;

        let changed = handle_press(
            &context(&range, &points),
            &mut field,
            PixelPoint::new(51, 50),
            1,
            &mut selection,
        )
        .unwrap();

        assert!(!changed);
        assert_eq!(selection, Some(1));
        assert_eq!(field.key_count(), 2);
    }

    #[test]
    fn double_press_on_a_marker_removes_exactly_that_key() {
        let range = DisplayRange::default();
        let mut field = MemoryField::from_keys(&[(0.0, 5.0), (0.5, 5.0), (1.0, 2.0)]);
        let points = projected(&field, &range, PixelRect::new(0, 0, 100, 100));
        let mut selection = Some(2);

        let changed = handle_press(
            &context(&range, &points),
            &mut field,
            points[1].pixel,
            2,
            &mut selection,
        )
        .unwrap();

        assert!(changed);
        assert_eq!(selection, None);
        let times: Vec<f32> = field.keys().iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0.0, 1.0]);
    }

    #[test]
    fn dragging_key_zero_only_moves_its_value() {
        let range = DisplayRange::default();
        let mut field = MemoryField::from_keys(&[(0.0, 5.0), (0.5, 5.0)]);
        let points = projected(&field, &range, PixelRect::new(0, 0, 100, 100));
        let mut selection = Some(0);

        handle_drag(
            &context(&range, &points),
            &mut field,
            PixelPoint::new(90, 20),
            &mut selection,
        )
        .unwrap();

        let key = field.key(0);
        assert_eq!(key.time, 0.0);
        assert!((key.value - 8.0).abs() < 0.11);
        assert_eq!(selection, Some(0));
    }

    #[test]
    fn dragging_onto_an_occupied_time_changes_value_only() {
        let range = DisplayRange::default();
        let mut field = MemoryField::from_keys(&[(0.0, 5.0), (0.5, 5.0), (1.0, 2.0)]);
        let points = projected(&field, &range, PixelRect::new(0, 0, 100, 100));
        let mut selection = Some(1);

        // Pixel 100 maps to time 1.0, which key 2 already occupies.
        handle_drag(
            &context(&range, &points),
            &mut field,
            PixelPoint::new(100, 30),
            &mut selection,
        )
        .unwrap();

        assert_eq!(field.key_count(), 3);
        assert_eq!(selection, Some(1));
        assert_eq!(field.key(1).time, 0.5);
        assert!((field.key(1).value - 7.0).abs() < 0.11);
    }

    #[test]
    fn dragging_to_a_free_time_reinserts_and_follows_the_key() {
        let range = DisplayRange::default();
        let mut field = MemoryField::from_keys(&[(0.0, 5.0), (0.2, 5.0), (1.0, 2.0)]);
        let points = projected(&field, &range, PixelRect::new(0, 0, 100, 100));
        let mut selection = Some(1);

        handle_drag(
            &context(&range, &points),
            &mut field,
            PixelPoint::new(60, 50),
            &mut selection,
        )
        .unwrap();

        assert_eq!(field.key_count(), 3);
        assert_eq!(selection, Some(1));
        assert!((field.key(1).time - 0.6).abs() < 0.011);
    }

    #[test]
    fn drag_positions_are_clamped_into_the_grid() {
        let range = DisplayRange::default();
        let mut field = MemoryField::from_keys(&[(0.0, 5.0), (0.5, 5.0)]);
        let points = projected(&field, &range, PixelRect::new(0, 0, 100, 100));
        let mut selection = Some(1);

        handle_drag(
            &context(&range, &points),
            &mut field,
            PixelPoint::new(500, -40),
            &mut selection,
        )
        .unwrap();

        // Clamped to the right edge: time 1.0, value 10.0.
        let index = selection.unwrap();
        assert!((field.key(index).time - 1.0).abs() < 0.011);
        assert!((field.key(index).value - 10.0).abs() < 0.11);
    }

    #[test]
    fn drag_without_a_selection_is_ignored() {
        let range = DisplayRange::default();
        let mut field = MemoryField::from_keys(&[(0.0, 5.0)]);
        let mut selection = None;

        let changed = handle_drag(
            &context(&range, &[]),
            &mut field,
            PixelPoint::new(10, 10),
            &mut selection,
        )
        .unwrap();

        assert!(!changed);
        assert_eq!(field.key_count(), 1);
    }
}
