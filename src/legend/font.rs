//! 8x8 bitmap glyphs for legend labels.

use crate::canvas::{Canvas, Rect};
use crate::color::Rgb;

pub const GLYPH_WIDTH: usize = 8;
pub const GLYPH_HEIGHT: usize = 8;

/// One byte per row, most significant bit leftmost.
fn glyph(ch: char) -> Option<[u8; GLYPH_HEIGHT]> {
    Some(match ch {
        '0' => [0x3C, 0x42, 0x46, 0x5A, 0x62, 0x42, 0x3C, 0x00],
        '1' => [0x08, 0x18, 0x28, 0x08, 0x08, 0x08, 0x3E, 0x00],
        '2' => [0x3C, 0x42, 0x02, 0x0C, 0x30, 0x40, 0x7E, 0x00],
        '3' => [0x3C, 0x42, 0x02, 0x1C, 0x02, 0x42, 0x3C, 0x00],
        '4' => [0x04, 0x0C, 0x14, 0x24, 0x7E, 0x04, 0x04, 0x00],
        '5' => [0x7E, 0x40, 0x7C, 0x02, 0x02, 0x42, 0x3C, 0x00],
        '6' => [0x1C, 0x20, 0x40, 0x7C, 0x42, 0x42, 0x3C, 0x00],
        '7' => [0x7E, 0x02, 0x04, 0x08, 0x10, 0x10, 0x10, 0x00],
        '8' => [0x3C, 0x42, 0x42, 0x3C, 0x42, 0x42, 0x3C, 0x00],
        '9' => [0x3C, 0x42, 0x42, 0x3E, 0x02, 0x04, 0x38, 0x00],
        ' ' => [0x00; GLYPH_HEIGHT],
        '-' => [0x00, 0x00, 0x00, 0x7E, 0x00, 0x00, 0x00, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x00],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x08, 0x10],
        _ => return None,
    })
}

/// Pixel width of `text` when drawn.
pub fn text_width(text: &str) -> usize {
    text.chars().count() * GLYPH_WIDTH
}

/// Draw `text` with its top-left corner at (x, y). Only pixels inside `clip`
/// are written; unknown characters leave a blank cell.
pub fn draw_text(canvas: &mut Canvas, x: usize, y: usize, text: &str, color: Rgb, clip: Rect) {
    for (i, ch) in text.chars().enumerate() {
        let Some(bitmap) = glyph(ch) else {
            continue;
        };
        let gx = x + i * GLYPH_WIDTH;
        for (row_idx, &row) in bitmap.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if (row >> (7 - col)) & 1 == 1 {
                    let px = gx + col;
                    let py = y.saturating_add(row_idx);
                    if clip.contains(px, py) {
                        canvas.put_pixel(px, py, color);
                    }
                }
            }
        }
    }
}
