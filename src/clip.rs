use crate::model::{PixelPoint, PixelRect};

const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const BOTTOM: u8 = 4;
const TOP: u8 = 8;

fn outcode(rect: PixelRect, x: f32, y: f32) -> u8 {
    let mut code = INSIDE;
    if x < rect.x as f32 {
        code |= LEFT;
    } else if x > rect.right() as f32 {
        code |= RIGHT;
    }
    if y < rect.y as f32 {
        code |= TOP;
    } else if y > rect.bottom() as f32 {
        code |= BOTTOM;
    }
    code
}

/// Clips the segment `a`..`b` to the rect (edges inclusive). Returns `None`
/// when the segment lies entirely outside.
pub fn clip_line(
    rect: PixelRect,
    a: PixelPoint,
    b: PixelPoint,
) -> Option<(PixelPoint, PixelPoint)> {
    let (mut x0, mut y0) = (a.x as f32, a.y as f32);
    let (mut x1, mut y1) = (b.x as f32, b.y as f32);
    let mut code0 = outcode(rect, x0, y0);
    let mut code1 = outcode(rect, x1, y1);

    loop {
        if code0 | code1 == INSIDE {
            return Some((
                PixelPoint::new(x0.round() as i32, y0.round() as i32),
                PixelPoint::new(x1.round() as i32, y1.round() as i32),
            ));
        }
        if code0 & code1 != INSIDE {
            return None;
        }

        // At least one endpoint is outside; push it to the rect boundary.
        let out = if code0 != INSIDE { code0 } else { code1 };
        let (x, y);
        if out & TOP != INSIDE {
            let edge = rect.y as f32;
            x = x0 + (x1 - x0) * (edge - y0) / (y1 - y0);
            y = edge;
        } else if out & BOTTOM != INSIDE {
            let edge = rect.bottom() as f32;
            x = x0 + (x1 - x0) * (edge - y0) / (y1 - y0);
            y = edge;
        } else if out & RIGHT != INSIDE {
            let edge = rect.right() as f32;
            y = y0 + (y1 - y0) * (edge - x0) / (x1 - x0);
            x = edge;
        } else {
            let edge = rect.x as f32;
            y = y0 + (y1 - y0) * (edge - x0) / (x1 - x0);
            x = edge;
        }

        if out == code0 {
            x0 = x;
            y0 = y;
            code0 = outcode(rect, x0, y0);
        } else {
            x1 = x;
            y1 = y;
            code1 = outcode(rect, x1, y1);
        }
    }
}
