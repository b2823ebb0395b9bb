//! Scrolling waterfall renderer.
//!
//! Each `add_line` shifts the region up one row and paints the new line,
//! colour-mapped, into the bottom row. The region therefore always shows the
//! last `height` lines, newest at the bottom.

use tracing::trace;

use crate::canvas::{Canvas, Rect};
use crate::color::{self, Rgb};
use crate::error::Result;
use crate::legend::Legend;
use crate::resample::resample;

/// What to do with intensities outside `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    /// Refuse the whole line; the canvas is left unchanged.
    #[default]
    Reject,
    /// Pin each value to the nearest end of the colour ramp.
    Clamp,
}

pub struct Waterfall {
    canvas: Canvas,
    region: Rect,
    legend: Option<Legend>,
    policy: RangePolicy,
}

impl Waterfall {
    /// Create a renderer drawing into `region` of `canvas`, with an optional
    /// legend strip. Fails if either rectangle is empty or leaves the canvas.
    pub fn new(canvas: Canvas, region: Rect, legend: Option<Legend>) -> Result<Self> {
        canvas.check_fits(region, "waterfall region")?;
        if let Some(legend) = &legend {
            canvas.check_fits(legend.strip(), "legend strip")?;
        }
        Ok(Self {
            canvas,
            region,
            legend,
            policy: RangePolicy::Reject,
        })
    }

    pub fn with_policy(mut self, policy: RangePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn region(&self) -> Rect {
        self.region
    }

    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    /// Render one sample line at the bottom of the region.
    ///
    /// Resampling and colour mapping finish before the canvas is touched, so
    /// an error leaves the previous image intact.
    pub fn add_line(&mut self, data: &[f64]) -> Result<()> {
        let scaled = resample(data, self.region.width)?;
        let colors = self.map_colors(&scaled)?;

        // Scroll and paint back to back; nothing observes the canvas in between
        self.canvas.scroll_up(self.region);
        let n = colors.len().min(self.region.width);
        self.canvas
            .write_span(self.region.x, self.region.bottom() - 1, &colors[..n]);

        trace!(samples = data.len(), width = self.region.width, "line rendered");
        Ok(())
    }

    /// Redraw the legend strip for `frequency_hz`. No-op without a legend.
    pub fn draw_legend(&mut self, frequency_hz: f64) {
        if let Some(legend) = &self.legend {
            legend.draw(&mut self.canvas, frequency_hz);
        }
    }

    fn map_colors(&self, scaled: &[f64]) -> Result<Vec<Rgb>> {
        match self.policy {
            RangePolicy::Reject => scaled.iter().map(|&v| color::colorize(v)).collect(),
            RangePolicy::Clamp => Ok(scaled.iter().map(|&v| color::colorize_clamped(v)).collect()),
        }
    }
}
