//! Render-side state driven by whatever scheduler delivers lines.

use tracing::{debug, warn};

use crate::canvas::Canvas;
use crate::config::Config;
use crate::error::Result;
use crate::legend::Legend;
use crate::protocol::{self, WfLine};
use crate::waterfall::Waterfall;

/// Line counters, reported in the status bar and on exit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub rendered: u64,
    /// Wire lines that did not parse as records.
    pub discarded: u64,
    /// Parsed records the renderer refused.
    pub rejected: u64,
}

pub struct Scope {
    waterfall: Waterfall,
    frequency_hz: Option<f64>,
    stats: Stats,
}

impl Scope {
    pub fn new(waterfall: Waterfall) -> Self {
        Self {
            waterfall,
            frequency_hz: None,
            stats: Stats::default(),
        }
    }

    /// Build canvas, waterfall and legend from a validated config.
    pub fn from_config(config: &Config) -> Result<Self> {
        let canvas = Canvas::new(
            config.canvas.width,
            config.canvas.height,
            config.canvas.background.into(),
        );
        let region = config.waterfall.region();
        let legend = config
            .legend
            .enabled
            .then(|| Legend::below(region, config.legend.height, config.legend.style()));

        let waterfall =
            Waterfall::new(canvas, region, legend)?.with_policy(config.waterfall.out_of_range);
        Ok(Self::new(waterfall))
    }

    /// Render one record: remember its frequency, add the line, redraw the legend.
    ///
    /// A refused line is counted and logged; the canvas keeps its previous image.
    pub fn tick(&mut self, line: &WfLine) {
        self.frequency_hz = Some(line.frequency_hz);
        match self.waterfall.add_line(&line.intensities) {
            Ok(()) => self.stats.rendered += 1,
            Err(e) => {
                self.stats.rejected += 1;
                warn!("Rejected line at {} Hz: {}", line.frequency_hz, e);
            }
        }
        self.waterfall.draw_legend(line.frequency_hz);
    }

    /// Parse a raw wire line and render it. Returns whether it was a record.
    pub fn ingest(&mut self, raw: &str) -> bool {
        match protocol::parse_line(raw) {
            Some(line) => {
                self.tick(&line);
                true
            }
            None => {
                self.stats.discarded += 1;
                debug!("Discarded wire line ({} bytes)", raw.len());
                false
            }
        }
    }

    /// Count a line the feed dropped before it reached the scope.
    pub fn note_discarded(&mut self, count: u64) {
        self.stats.discarded += count;
    }

    pub fn canvas(&self) -> &Canvas {
        self.waterfall.canvas()
    }

    pub fn frequency_hz(&self) -> Option<f64> {
        self.frequency_hz
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }
}
