// Software drawing primitives over a Raster.
//
// Shapes are stamped by scanning their bounding box and testing each pixel
// against the shape; out-of-bounds pixels are silently skipped. The paint's
// composite mode decides whether a covered pixel is painted over or cleared.

use crate::types::{Composite, Paint, Raster};
use image::RgbaImage;

/// Write one RGBA pixel if (x, y) is inside bounds.
#[inline]
fn put_pixel(raster: &mut Raster, x: i32, y: i32, rgba: [u8; 4]) {
    if x < 0 || y < 0 {
        return;
    }
    let Some(i) = raster.offset(x as usize, y as usize) else {
        return;
    };
    raster.data[i..i + 4].copy_from_slice(&rgba);
}

/// Source-over blend `src` onto the pixel at byte offset `i`.
/// Uses the (v + 1 + (v >> 8)) >> 8 approximation for division by 255.
#[inline]
fn blend_over(data: &mut [u8], i: usize, src: [u8; 4]) {
    let a = src[3] as u16;
    if a == 0 {
        return;
    }
    if a == 255 {
        data[i..i + 4].copy_from_slice(&src);
        return;
    }
    let inv = 255 - a;
    for c in 0..3 {
        let v = src[c] as u16 * a + data[i + c] as u16 * inv;
        data[i + c] = ((v + 1 + (v >> 8)) >> 8) as u8;
    }
    let va = a * 255 + data[i + 3] as u16 * inv;
    data[i + 3] = ((va + 1 + (va >> 8)) >> 8) as u8;
}

/// Stamp one covered pixel according to the paint's composite mode.
#[inline]
fn stamp_pixel(raster: &mut Raster, paint: &Paint, x: i32, y: i32) {
    match paint.composite {
        Composite::Erase => put_pixel(raster, x, y, [0, 0, 0, 0]),
        Composite::SourceOver => {
            if x < 0 || y < 0 {
                return;
            }
            let color = paint.color;
            let Some(i) = raster.offset(x as usize, y as usize) else {
                return;
            };
            blend_over(&mut raster.data, i, color);
        }
    }
}

/// Fill a circle of radius `r` centered at (cx, cy) under the given paint.
pub fn fill_circle(raster: &mut Raster, paint: &Paint, cx: f32, cy: f32, r: f32) {
    if r <= 0.0 {
        return;
    }
    let r2 = r * r;
    // Scan just the bounding box.
    let x0 = (cx - r).floor() as i32;
    let x1 = (cx + r).ceil() as i32;
    let y0 = (cy - r).floor() as i32;
    let y1 = (cy + r).ceil() as i32;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if dx * dx + dy * dy <= r2 {
                stamp_pixel(raster, paint, x, y);
            }
        }
    }
}

/// Stroke the segment (x0,y0)-(x1,y1) at the paint's line width: every pixel
/// within line_width / 2 of the segment is stamped. Covers the union of both
/// end circles and the connecting band, so successive brush positions are
/// bridged without gaps.
pub fn stroke_segment(raster: &mut Raster, paint: &Paint, x0: f32, y0: f32, x1: f32, y1: f32) {
    let hw = paint.line_width * 0.5;
    if hw <= 0.0 {
        return;
    }
    let hw2 = hw * hw;
    let dx = x1 - x0;
    let dy = y1 - y0;
    let len2 = dx * dx + dy * dy;

    let bx0 = (x0.min(x1) - hw).floor() as i32;
    let bx1 = (x0.max(x1) + hw).ceil() as i32;
    let by0 = (y0.min(y1) - hw).floor() as i32;
    let by1 = (y0.max(y1) + hw).ceil() as i32;
    for y in by0..=by1 {
        for x in bx0..=bx1 {
            let px = x as f32 - x0;
            let py = y as f32 - y0;
            // Closest point on the segment, clamped to its ends.
            let t = if len2 <= f32::EPSILON {
                0.0
            } else {
                ((px * dx + py * dy) / len2).clamp(0.0, 1.0)
            };
            let ex = px - t * dx;
            let ey = py - t * dy;
            if ex * ex + ey * ey <= hw2 {
                stamp_pixel(raster, paint, x, y);
            }
        }
    }
}

/// Clear a rectangular region to transparent black, clipped to the raster.
pub fn clear_rect(raster: &mut Raster, x: i32, y: i32, w: usize, h: usize) {
    for ry in 0..h as i32 {
        for rx in 0..w as i32 {
            put_pixel(raster, x + rx, y + ry, [0, 0, 0, 0]);
        }
    }
}

/// Source-over blit of a decoded RGBA image at (ox, oy), clipped to the raster.
pub fn blit_rgba(raster: &mut Raster, src: &RgbaImage, ox: i32, oy: i32) {
    for (sx, sy, px) in src.enumerate_pixels() {
        let x = ox + sx as i32;
        let y = oy + sy as i32;
        if x < 0 || y < 0 {
            continue;
        }
        let Some(i) = raster.offset(x as usize, y as usize) else {
            continue;
        };
        blend_over(&mut raster.data, i, px.0);
    }
}
