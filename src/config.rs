use anyhow::{bail, Context, Result};
use palette::Srgb;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

use crate::canvas::Rect;
use crate::cli::Args;
use crate::color::{self, Rgb};
use crate::display::DisplayMode;
use crate::feed::FeedSource;
use crate::legend::LegendStyle;
use crate::waterfall::RangePolicy;

/// RGB colour written as `"#RRGGBB"` in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse from hex string like "#FF0000" or "FF0000"
    pub fn from_hex(hex: &str) -> Option<Self> {
        color::from_hex(hex).map(Self::from)
    }
}

impl From<RgbColor> for Rgb {
    fn from(c: RgbColor) -> Self {
        Srgb::new(c.r, c.g, c.b)
    }
}

impl From<Rgb> for RgbColor {
    fn from(c: Rgb) -> Self {
        Self::new(c.red, c.green, c.blue)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&color::to_hex((*self).into()))
    }
}

impl FromStr for RgbColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| format!("Invalid colour '{}': expected #RRGGBB", s))
    }
}

impl Serialize for RgbColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RgbColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RgbColor::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub canvas: CanvasConfig,
    pub waterfall: WaterfallConfig,
    pub legend: LegendConfig,
    pub feed: FeedConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: usize,
    pub height: usize,
    pub background: RgbColor,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            background: RgbColor::new(0, 0, 0),
        }
    }
}

/// Scrolling region inside the canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterfallConfig {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    pub out_of_range: RangePolicy,
}

impl Default for WaterfallConfig {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 320,
            height: 200,
            out_of_range: RangePolicy::Reject,
        }
    }
}

impl WaterfallConfig {
    pub fn region(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendConfig {
    pub enabled: bool,
    pub height: usize,
    /// Cursor position relative to the strip's left edge.
    pub cursor_x: usize,
    pub tick_height: usize,
    pub cursor_size: usize,
    pub background: RgbColor,
    pub foreground: RgbColor,
    pub label: RgbColor,
}

impl Default for LegendConfig {
    fn default() -> Self {
        let style = LegendStyle::default();
        Self {
            enabled: true,
            height: 40,
            cursor_x: style.cursor_x,
            tick_height: style.tick_height,
            cursor_size: style.cursor_size,
            background: style.background.into(),
            foreground: style.foreground.into(),
            label: style.label.into(),
        }
    }
}

impl LegendConfig {
    pub fn style(&self) -> LegendStyle {
        LegendStyle {
            background: self.background.into(),
            foreground: self.foreground.into(),
            label: self.label.into(),
            cursor_x: self.cursor_x,
            tick_height: self.tick_height,
            cursor_size: self.cursor_size,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub source: FeedSource,
    /// `host:port` for the tcp source
    pub address: String,
    /// Input file for the file source
    pub path: Option<PathBuf>,
    /// Parsed records buffered between the reader and the renderer
    pub queue_capacity: usize,
    pub demo_interval_ms: u64,
    /// Change of the demo pattern's cosine frequency per line
    pub demo_drift: f64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source: FeedSource::Demo,
            address: "127.0.0.1:7355".to_string(),
            path: None,
            queue_capacity: 256,
            demo_interval_ms: 100,
            demo_drift: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub mode: DisplayMode,
    pub fps: u32,
    /// PPM file written when the headless display finishes
    pub snapshot: Option<PathBuf>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Terminal,
            fps: 30,
            snapshot: None,
        }
    }
}

fn fits(rect: Rect, width: usize, height: usize) -> bool {
    !rect.is_empty() && rect.right() <= width && rect.bottom() <= height
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Get the default XDG config path (~/.config/wfscope/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("wfscope").join("config.toml"))
    }

    /// Load config from the default XDG path if it exists.
    /// Returns None if the file doesn't exist, logs a warning on parse errors.
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            return None;
        }
        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("{:#}. Using defaults.", e);
                None
            }
        }
    }

    /// Initialize default config file at XDG path, returns the path
    pub fn init_default_config() -> Result<PathBuf> {
        let path = Self::default_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, Self::generate_config_template())?;

        Ok(path)
    }

    /// Check geometry and feed settings before anything is rendered.
    pub fn validate(&self) -> Result<()> {
        let (cw, ch) = (self.canvas.width, self.canvas.height);
        if cw == 0 || ch == 0 {
            bail!("Canvas must be at least 1x1, got {}x{}", cw, ch);
        }

        let region = self.waterfall.region();
        if !fits(region, cw, ch) {
            bail!(
                "Waterfall region {}x{}+{}+{} does not fit the {}x{} canvas",
                region.width,
                region.height,
                region.x,
                region.y,
                cw,
                ch
            );
        }

        if self.legend.enabled {
            let strip = Rect::new(region.x, region.bottom(), region.width, self.legend.height);
            if !fits(strip, cw, ch) {
                bail!(
                    "Legend strip of height {} below row {} does not fit the {}x{} canvas",
                    self.legend.height,
                    region.bottom(),
                    cw,
                    ch
                );
            }
        }

        if self.feed.queue_capacity == 0 {
            bail!("feed.queue_capacity must be positive");
        }
        if self.feed.demo_interval_ms == 0 {
            bail!("feed.demo_interval_ms must be positive");
        }
        if self.feed.source == FeedSource::File && self.feed.path.is_none() {
            bail!("feed.source = \"file\" needs feed.path");
        }
        if self.display.fps == 0 {
            bail!("display.fps must be positive");
        }
        Ok(())
    }

    /// Generate a commented TOML config template
    pub fn generate_config_template() -> String {
        r##"# wfscope configuration
# This file is auto-generated. Edit as needed.

[canvas]
# Pixel size of the whole display
width = 320
height = 240
background = "#000000"

[waterfall]
# Scrolling region inside the canvas
x = 0
y = 0
width = 320
height = 200
# Intensities outside 0.0-1.0: "reject" drops the line, "clamp" pins the colour
out_of_range = "reject"

[legend]
# Strip directly below the waterfall region
enabled = true
height = 40
# Cursor position in pixels from the strip's left edge
cursor_x = 100
tick_height = 5
cursor_size = 6
background = "#000000"
foreground = "#FFFFFF"
label = "#FFFFFF"

[feed]
# Line source: "demo", "stdin", "tcp" or "file"
source = "demo"
# Address for the tcp source
address = "127.0.0.1:7355"
# Input for the file source
# path = "capture.wf"
# Parsed lines buffered between the reader and the renderer
queue_capacity = 256
# Demo generator pacing and pattern drift
demo_interval_ms = 100
demo_drift = 0.0

[display]
# "terminal" or "headless"
mode = "terminal"
fps = 30
# Headless mode writes a PPM image here when the feed ends
# snapshot = "waterfall.ppm"
"##
        .to_string()
    }

    /// Merge CLI arguments into config (CLI takes priority)
    pub fn merge_args(&mut self, args: &Args) {
        if let Some(mode) = args.mode {
            self.display.mode = mode;
        }
        if let Some(fps) = args.fps {
            self.display.fps = fps;
        }
        if let Some(ref path) = args.snapshot {
            self.display.snapshot = Some(path.clone());
        }

        if let Some(source) = args.source {
            self.feed.source = source;
        }
        if let Some(ref address) = args.address {
            self.feed.address = address.clone();
        }
        if let Some(ref path) = args.file {
            self.feed.path = Some(path.clone());
            if args.source.is_none() {
                self.feed.source = FeedSource::File;
            }
        }

        if args.no_legend {
            self.legend.enabled = false;
        }
        if args.clamp {
            self.waterfall.out_of_range = RangePolicy::Clamp;
        }
    }
}
