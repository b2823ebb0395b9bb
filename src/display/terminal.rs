//! Terminal output: the canvas sampled onto half-block cells.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::buffer::Buffer;
use ratatui::prelude::*;
use std::io::{self, stdout};
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::info;

use crate::canvas::Canvas;
use crate::color::Rgb;
use crate::config::Config;
use crate::feed::Feed;
use crate::legend::legend_label;
use crate::scope::{Scope, Stats};

pub async fn run(config: &Config, scope: Scope, feed: Feed) -> Result<Stats> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, config, scope, feed).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &Config,
    mut scope: Scope,
    mut feed: Feed,
) -> Result<Stats> {
    let frame_period = Duration::from_secs_f64(1.0 / config.display.fps as f64);
    let max_lines_per_frame = config.feed.queue_capacity;
    let mut feed_open = true;

    loop {
        // Drain what the feed has queued since the last frame
        for _ in 0..max_lines_per_frame {
            match feed.try_recv() {
                Ok(line) => scope.tick(&line),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if feed_open {
                        info!("Feed closed, keeping last image");
                        feed_open = false;
                    }
                    break;
                }
            }
        }
        scope.note_discarded(feed.take_discarded());

        terminal.draw(|frame| {
            let area = frame.area();
            let status_area = Rect::new(area.x, area.y, area.width, area.height.min(1));
            let canvas_area = Rect::new(
                area.x,
                area.y + status_area.height,
                area.width,
                area.height - status_area.height,
            );

            render_canvas(frame.buffer_mut(), canvas_area, scope.canvas());
            render_status(frame.buffer_mut(), status_area, &scope, feed_open);
        })?;

        // Handle input
        if event::poll(frame_period)? {
            if let Event::Key(key) = event::read()? {
                match key {
                    KeyEvent {
                        code: KeyCode::Char('q'),
                        ..
                    }
                    | KeyEvent {
                        code: KeyCode::Esc, ..
                    }
                    | KeyEvent {
                        code: KeyCode::Char('c'),
                        modifiers: KeyModifiers::CONTROL,
                        ..
                    } => break,
                    _ => {}
                }
            }
        }
    }

    Ok(scope.stats())
}

/// Canvas pixels shown by terminal cell (cx, cy) of a `cols` x `rows` area:
/// the upper and lower half of the cell.
fn cell_pixels(canvas: &Canvas, cols: usize, rows: usize, cx: usize, cy: usize) -> (Rgb, Rgb) {
    let x = cx * canvas.width() / cols;
    let y_top = (2 * cy) * canvas.height() / (2 * rows);
    let y_bottom = (2 * cy + 1) * canvas.height() / (2 * rows);
    let black = Rgb::new(0, 0, 0);
    (
        canvas.get_pixel(x, y_top).unwrap_or(black),
        canvas.get_pixel(x, y_bottom).unwrap_or(black),
    )
}

#[inline]
fn to_term(c: Rgb) -> Color {
    Color::Rgb(c.red, c.green, c.blue)
}

fn render_canvas(buf: &mut Buffer, area: Rect, canvas: &Canvas) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let (cols, rows) = (area.width as usize, area.height as usize);
    for cy in 0..rows {
        for cx in 0..cols {
            let (top, bottom) = cell_pixels(canvas, cols, rows, cx, cy);
            if let Some(cell) = buf.cell_mut((area.x + cx as u16, area.y + cy as u16)) {
                cell.set_char('▀');
                cell.set_fg(to_term(top));
                cell.set_bg(to_term(bottom));
            }
        }
    }
}

fn render_status(buf: &mut Buffer, area: Rect, scope: &Scope, feed_open: bool) {
    if area.height == 0 {
        return;
    }
    let stats = scope.stats();
    let frequency = scope
        .frequency_hz()
        .map(|f| format!("{} kHz", legend_label(f)))
        .unwrap_or_else(|| "-- kHz".to_string());
    let status = format!(
        " {} | lines: {} | dropped: {} | rejected: {} | feed: {} | [q]uit ",
        frequency,
        stats.rendered,
        stats.discarded,
        stats.rejected,
        if feed_open { "live" } else { "closed" },
    );

    buf.set_string(area.x, area.y, &status, Style::default().fg(Color::DarkGray));
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::Srgb;

    #[test]
    fn one_cell_per_two_pixel_rows_at_native_size() {
        let mut canvas = Canvas::new(2, 4, Srgb::new(0, 0, 0));
        canvas.put_pixel(1, 2, Srgb::new(1, 0, 0));
        canvas.put_pixel(1, 3, Srgb::new(2, 0, 0));
        assert_eq!(
            cell_pixels(&canvas, 2, 2, 1, 1),
            (Srgb::new(1, 0, 0), Srgb::new(2, 0, 0))
        );
    }

    #[test]
    fn render_fills_whole_area() {
        let canvas = Canvas::new(320, 240, Srgb::new(9, 8, 7));
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        render_canvas(&mut buf, area, &canvas);
        for y in 0..10 {
            for x in 0..40 {
                let cell = &buf[(x, y)];
                assert_eq!(cell.symbol(), "▀");
                assert_eq!(cell.fg, Color::Rgb(9, 8, 7));
                assert_eq!(cell.bg, Color::Rgb(9, 8, 7));
            }
        }
    }
}
