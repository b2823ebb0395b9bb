//! Owned RGB pixel grid.
//!
//! The canvas is the only render target: the waterfall scrolls and paints a
//! region of it, the legend redraws the strip below. Display backends read it
//! between updates.

use std::io::{self, Write};

use crate::color::Rgb;
use crate::error::{Error, Result};

/// Axis-aligned rectangle in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Row-major grid of `width * height` pixels. Never resized after creation.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: Vec<Rgb>,
    width: usize,
    height: usize,
}

impl Canvas {
    pub fn new(width: usize, height: usize, fill: Rgb) -> Self {
        Self {
            pixels: vec![fill; width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Fail unless `rect` is non-empty and lies entirely inside the canvas.
    pub fn check_fits(&self, rect: Rect, what: &str) -> Result<()> {
        if rect.is_empty() {
            return Err(Error::Precondition(format!("{what} has zero size")));
        }
        if rect.right() > self.width || rect.bottom() > self.height {
            return Err(Error::Precondition(format!(
                "{what} {}x{}+{}+{} exceeds canvas {}x{}",
                rect.width, rect.height, rect.x, rect.y, self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Fill `rect`, clipped to the canvas.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let x_end = rect.right().min(self.width);
        for y in rect.y..rect.bottom().min(self.height) {
            if rect.x < x_end {
                let start = y * self.width;
                self.pixels[start + rect.x..start + x_end].fill(color);
            }
        }
    }

    /// Write a pixel; writes outside the canvas are dropped.
    #[inline]
    pub fn put_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Full row `y`. Panics if `y` is out of range.
    pub fn row(&self, y: usize) -> &[Rgb] {
        let start = y * self.width;
        &self.pixels[start..start + self.width]
    }

    /// Copy `colors` into row `y` starting at column `x`, clipped to the canvas.
    pub fn write_span(&mut self, x: usize, y: usize, colors: &[Rgb]) {
        if y >= self.height || x >= self.width {
            return;
        }
        let n = colors.len().min(self.width - x);
        let start = y * self.width + x;
        self.pixels[start..start + n].copy_from_slice(&colors[..n]);
    }

    /// Shift the content of `rect` up by one row.
    ///
    /// The top row is discarded and the bottom row keeps its old content until
    /// the caller overwrites it. Pixels outside `rect` are untouched.
    pub fn scroll_up(&mut self, rect: Rect) {
        let x_end = rect.right().min(self.width);
        let y_end = rect.bottom().min(self.height);
        if rect.x >= x_end || rect.y >= y_end {
            return;
        }
        let span = x_end - rect.x;
        for y in rect.y..y_end - 1 {
            let src = (y + 1) * self.width + rect.x;
            let dst = y * self.width + rect.x;
            self.pixels.copy_within(src..src + span, dst);
        }
    }

    /// Horizontal line from `x0` to `x1` inclusive.
    pub fn hline(&mut self, x0: usize, x1: usize, y: usize, color: Rgb) {
        for x in x0.min(x1)..=x0.max(x1) {
            self.put_pixel(x, y, color);
        }
    }

    /// Vertical line from `y0` to `y1` inclusive.
    pub fn vline(&mut self, x: usize, y0: usize, y1: usize, color: Rgb) {
        for y in y0.min(y1)..=y0.max(y1) {
            self.put_pixel(x, y, color);
        }
    }

    /// Write the canvas as a binary PPM (P6) image.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for p in &self.pixels {
            bytes.extend_from_slice(&[p.red, p.green, p.blue]);
        }
        out.write_all(&bytes)?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::Srgb;

    const BG: Rgb = Srgb::new(0, 0, 0);
    const A: Rgb = Srgb::new(10, 20, 30);
    const B: Rgb = Srgb::new(200, 100, 50);

    #[test]
    fn new_canvas_is_filled() {
        let c = Canvas::new(4, 3, A);
        assert!((0..3).all(|y| c.row(y).iter().all(|&p| p == A)));
        assert_eq!(c.get_pixel(4, 0), None);
    }

    #[test]
    fn scroll_moves_rows_up_inside_rect_only() {
        let mut c = Canvas::new(4, 4, BG);
        // Mark every row inside the region with a distinct colour
        for y in 0..4 {
            c.put_pixel(1, y, Srgb::new(y as u8, 0, 0));
            c.put_pixel(2, y, Srgb::new(y as u8, 0, 0));
        }
        c.put_pixel(0, 3, B);
        c.scroll_up(Rect::new(1, 1, 2, 3));

        // Row above the region untouched
        assert_eq!(c.get_pixel(1, 0), Some(Srgb::new(0, 0, 0)));
        assert_eq!(c.get_pixel(1, 1), Some(Srgb::new(2, 0, 0)));
        assert_eq!(c.get_pixel(2, 2), Some(Srgb::new(3, 0, 0)));
        // Bottom row keeps its previous content
        assert_eq!(c.get_pixel(1, 3), Some(Srgb::new(3, 0, 0)));
        // Column outside the region untouched
        assert_eq!(c.get_pixel(0, 3), Some(B));
    }

    #[test]
    fn fill_rect_clips() {
        let mut c = Canvas::new(3, 3, BG);
        c.fill_rect(Rect::new(2, 2, 5, 5), A);
        assert_eq!(c.get_pixel(2, 2), Some(A));
        assert_eq!(c.get_pixel(1, 2), Some(BG));
    }

    #[test]
    fn write_span_clips_to_width() {
        let mut c = Canvas::new(3, 1, BG);
        c.write_span(1, 0, &[A, A, A, A]);
        assert_eq!(c.row(0), &[BG, A, A]);
    }

    #[test]
    fn check_fits_rejects_overflow_and_empty() {
        let c = Canvas::new(10, 10, BG);
        assert!(c.check_fits(Rect::new(0, 0, 10, 10), "region").is_ok());
        assert!(c.check_fits(Rect::new(1, 0, 10, 10), "region").is_err());
        assert!(c.check_fits(Rect::new(0, 0, 0, 10), "region").is_err());
    }

    #[test]
    fn ppm_has_header_and_payload() {
        let c = Canvas::new(2, 1, B);
        let mut out = Vec::new();
        c.write_ppm(&mut out).unwrap();
        let header = b"P6\n2 1\n255\n";
        assert_eq!(&out[..header.len()], header);
        assert_eq!(&out[header.len()..], &[200, 100, 50, 200, 100, 50]);
    }
}
