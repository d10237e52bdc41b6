use crate::clip::clip_line;
use crate::mapper::DisplayRange;
use crate::model::{Color, PixelPoint, PixelRect, RenderPoint};
use crate::settings::EditorSettings;
use crate::surface::DrawSurface;

const GRID_DIVISIONS: i32 = 10;

/// Shrinks the widget bounds down to the graph content rect: padding on all
/// sides, one font row reserved under the graph for the X labels, a left
/// gutter wide enough for the Y labels, and finally a trim so both extents
/// divide evenly by the grid division count (grid lines then land on exact
/// pixel boundaries). The trimmed remainder is split across both sides.
pub fn content_rect(
    bounds: PixelRect,
    padding: i32,
    surface: &dyn DrawSurface,
    range: &DisplayRange,
) -> PixelRect {
    let mut rect = PixelRect::new(
        bounds.x + padding,
        bounds.y + padding,
        bounds.width - padding * 2,
        bounds.height - padding * 2,
    );

    let font_height = surface.font_height();
    rect.height -= font_height;

    let gutter = font_height
        .max(surface.text_width(&range.max_y_label))
        .max(surface.text_width(&range.min_y_label));
    rect.x += gutter;
    rect.width -= gutter;

    if rect.width > 0 {
        let trim = rect.width % GRID_DIVISIONS;
        rect.width -= trim;
        rect.x += trim / 2;
    }
    if rect.height > 0 {
        let trim = rect.height % GRID_DIVISIONS;
        rect.height -= trim;
        rect.y += trim / 2;
    }
    rect
}

/// Axis labels sit in the gutters around the content rect: X labels on the
/// reserved row below, Y labels (and the rotated axis name) to the left.
/// Drawn even when the rect itself is too small to show a grid.
pub fn draw_labels(
    surface: &mut dyn DrawSurface,
    rect: PixelRect,
    range: &DisplayRange,
    label_x: &str,
    label_y: &str,
    color: Color,
) {
    let font_height = surface.font_height();

    let width = surface.text_width(label_x);
    surface.text(
        PixelPoint::new(rect.x + rect.width / 2 - width / 2, rect.bottom() + 2),
        label_x,
        color,
        false,
    );

    surface.text(
        PixelPoint::new(rect.x + 1, rect.bottom() + 2),
        &range.min_x_label,
        color,
        false,
    );

    let width = surface.text_width(&range.max_x_label);
    surface.text(
        PixelPoint::new(rect.right() - 1 - width, rect.bottom() + 2),
        &range.max_x_label,
        color,
        false,
    );

    let width = surface.text_width(label_y);
    surface.text(
        PixelPoint::new(
            rect.x - (font_height + 2),
            rect.y + rect.height / 2 + width / 2,
        ),
        label_y,
        color,
        true,
    );

    let width = surface.text_width(&range.min_y_label);
    surface.text(
        PixelPoint::new(rect.x - (width + 2), rect.bottom() - 2 - font_height / 2),
        &range.min_y_label,
        color,
        false,
    );

    let width = surface.text_width(&range.max_y_label);
    surface.text(
        PixelPoint::new(rect.x - (width + 2), rect.y + 4 - font_height / 2),
        &range.max_y_label,
        color,
        false,
    );
}

/// 11 lines per axis; the middle line of each axis is a 3 pixel filled band
/// marking the half-way reference.
pub fn draw_grid(surface: &mut dyn DrawSurface, rect: PixelRect, color: Color) {
    let step_x = rect.width / GRID_DIVISIONS;
    let step_y = rect.height / GRID_DIVISIONS;

    for i in 0..=GRID_DIVISIONS {
        let y = rect.y + step_y * i;
        if i == GRID_DIVISIONS / 2 {
            surface.fill_rect(PixelRect::new(rect.x, y - 1, rect.width, 3), color);
        } else {
            surface.line(
                PixelPoint::new(rect.x, y),
                PixelPoint::new(rect.right(), y),
                color,
            );
        }
    }

    for i in 0..=GRID_DIVISIONS {
        let x = rect.x + step_x * i;
        if i == GRID_DIVISIONS / 2 {
            surface.fill_rect(PixelRect::new(x - 1, rect.y, 3, rect.height), color);
        } else {
            surface.line(
                PixelPoint::new(x, rect.y),
                PixelPoint::new(x, rect.bottom()),
                color,
            );
        }
    }
}

/// Draws the curve polyline (clipped to the rect) with a marker per point.
/// The last point's value is held flat out to the right edge.
pub fn draw_curve(
    surface: &mut dyn DrawSurface,
    rect: PixelRect,
    points: &[RenderPoint],
    selection: Option<usize>,
    cursor: Option<PixelPoint>,
    settings: &EditorSettings,
) {
    let Some(last) = points.last() else {
        return;
    };

    for i in 1..points.len() {
        draw_segment(
            surface,
            rect,
            points[i - 1].pixel,
            points[i].pixel,
            settings.line_color,
        );
        draw_marker(surface, rect, &points[i - 1], selection, cursor, settings);
    }

    let edge = PixelPoint::new(rect.right(), last.pixel.y);
    if last.pixel.x < edge.x {
        draw_segment(surface, rect, last.pixel, edge, settings.line_color);
    }
    draw_marker(surface, rect, last, selection, cursor, settings);
}

fn draw_segment(
    surface: &mut dyn DrawSurface,
    rect: PixelRect,
    from: PixelPoint,
    to: PixelPoint,
    color: Color,
) {
    if let Some((p1, p2)) = clip_line(rect, from, to) {
        surface.line(p1, p2, color);
    }
}

fn draw_marker(
    surface: &mut dyn DrawSurface,
    rect: PixelRect,
    point: &RenderPoint,
    selection: Option<usize>,
    cursor: Option<PixelPoint>,
    settings: &EditorSettings,
) {
    if !rect.contains(point.pixel) {
        return;
    }

    let hovered = cursor.is_some_and(|c| c.distance_to(point.pixel) <= settings.hit_radius);
    let tint = if selection == Some(point.index) {
        settings.selected_point_color
    } else if hovered {
        settings.hover_point_color
    } else {
        settings.normal_point_color
    };

    surface.fill_circle(point.pixel, settings.hit_radius, Color::rgba(0, 0, 0, 100));
    surface.fill_circle(point.pixel, settings.hit_radius - 2.0, tint);
}
