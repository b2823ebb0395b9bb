use clap::Parser;
use std::path::PathBuf;

use crate::display::DisplayMode;
use crate::feed::FeedSource;

#[derive(Parser, Debug, Default)]
#[command(name = "wfscope")]
#[command(author, version, about = "Scrolling waterfall display for [WF] spectrum feeds")]
pub struct Args {
    /// Display mode: terminal or headless
    #[arg(short, long)]
    pub mode: Option<DisplayMode>,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Line source: demo, stdin, tcp or file
    #[arg(short, long)]
    pub source: Option<FeedSource>,

    /// host:port to read from with the tcp source
    #[arg(long)]
    pub address: Option<String>,

    /// File to read (selects the file source unless --source is given)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Write a PPM image of the final canvas (headless mode)
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Terminal refresh rate
    #[arg(long)]
    pub fps: Option<u32>,

    /// Hide the frequency legend
    #[arg(long)]
    pub no_legend: bool,

    /// Clamp out-of-range intensities instead of dropping the line
    #[arg(long)]
    pub clamp: bool,

    /// Write a commented config template to the default path and exit
    #[arg(long)]
    pub init_config: bool,

    /// Print the demo pattern as [WF] lines on stdout instead of displaying it
    #[arg(long)]
    pub emit_demo: bool,
}
