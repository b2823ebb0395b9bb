//! Frequency legend drawn in a fixed strip below the waterfall.
//!
//! Every draw repaints the whole strip, so the result depends only on the
//! frequency passed in.

mod font;

use palette::named;

use crate::canvas::{Canvas, Rect};
use crate::color::Rgb;

pub use font::{text_width, GLYPH_HEIGHT};

/// Colours and geometry of the legend decorations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendStyle {
    pub background: Rgb,
    pub foreground: Rgb,
    pub label: Rgb,
    /// Cursor centre, in pixels from the strip's left edge.
    pub cursor_x: usize,
    pub tick_height: usize,
    /// Rows in the cursor triangle.
    pub cursor_size: usize,
}

impl Default for LegendStyle {
    fn default() -> Self {
        Self {
            background: named::BLACK,
            foreground: named::WHITE,
            label: named::WHITE,
            cursor_x: 100,
            tick_height: 5,
            cursor_size: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    strip: Rect,
    style: LegendStyle,
}

impl Legend {
    pub fn new(strip: Rect, style: LegendStyle) -> Self {
        Self { strip, style }
    }

    /// Strip of `height` rows directly under `region`, same columns.
    pub fn below(region: Rect, height: usize, style: LegendStyle) -> Self {
        Self::new(Rect::new(region.x, region.bottom(), region.width, height), style)
    }

    pub fn strip(&self) -> Rect {
        self.strip
    }

    pub fn style(&self) -> &LegendStyle {
        &self.style
    }

    /// Column of the centre tick.
    pub fn tick_x(&self) -> usize {
        self.strip.x + self.strip.width / 2
    }

    /// Top-left corner of the frequency label for `text`.
    pub fn label_origin(&self, text: &str) -> (usize, usize) {
        let x = self.tick_x().saturating_sub(text_width(text) / 2).max(self.strip.x);
        let y = self
            .strip
            .y
            .saturating_add(self.style.tick_height)
            .saturating_add(3);
        (x, y)
    }

    pub fn draw(&self, canvas: &mut Canvas, frequency_hz: f64) {
        let s = &self.style;
        let strip = self.strip;
        if strip.is_empty() {
            return;
        }

        canvas.fill_rect(strip, s.background);

        // Boundary line along the top edge
        canvas.hline(strip.x, strip.right() - 1, strip.y, s.foreground);

        let tick_x = self.tick_x();
        let tick_end = strip.y.saturating_add(s.tick_height).min(strip.bottom() - 1);
        canvas.vline(tick_x, strip.y, tick_end, s.foreground);

        self.draw_cursor(canvas);

        let text = legend_label(frequency_hz);
        let (lx, ly) = self.label_origin(&text);
        font::draw_text(canvas, lx, ly, &text, s.label, strip);
    }

    /// Filled triangle pointing down, apex on the bottom row.
    fn draw_cursor(&self, canvas: &mut Canvas) {
        let strip = self.strip;
        let cx = strip.x.saturating_add(self.style.cursor_x);
        let top = strip.y + 1;
        for k in 0..self.style.cursor_size {
            let y = top.saturating_add(k);
            if y >= strip.bottom() {
                break;
            }
            let half = self.style.cursor_size - 1 - k;
            let x0 = cx.saturating_sub(half).max(strip.x);
            let x1 = cx.saturating_add(half).min(strip.right() - 1);
            if x0 <= x1 {
                canvas.hline(x0, x1, y, self.style.foreground);
            }
        }
    }
}

/// Frequency label in whole kHz, truncated toward zero, with thousands separators.
///
/// Non-finite input renders as `0`.
pub fn legend_label(frequency_hz: f64) -> String {
    let khz = if frequency_hz.is_finite() {
        (frequency_hz / 1000.0).trunc() as i64
    } else {
        0
    };
    group_thousands(khz)
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
