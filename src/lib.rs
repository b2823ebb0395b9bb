//! Scrolling waterfall display.
//!
//! Incoming `[WF]` records are resampled to the display width, colour-mapped
//! and painted as the bottom row of a pixel canvas whose older rows scroll up,
//! with a frequency legend strip underneath. Display backends only read the
//! canvas between updates.

pub mod canvas;
pub mod cli;
pub mod color;
pub mod config;
pub mod display;
pub mod error;
pub mod feed;
pub mod legend;
pub mod protocol;
pub mod resample;
pub mod scope;
pub mod waterfall;

pub use error::{Error, Result};
