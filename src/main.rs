use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tracing::info;

use wfscope::cli::Args;
use wfscope::config::Config;
use wfscope::display::{self, DisplayMode};
use wfscope::feed::{self, demo::DemoGenerator};
use wfscope::scope::Scope;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wfscope=info".parse()?),
        )
        .init();

    let args = Args::parse();

    if args.init_config {
        let path = Config::init_default_config()?;
        println!("Wrote config template to {}", path.display());
        return Ok(());
    }

    // Load or create config
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_from_default_path().unwrap_or_default(),
    };
    config.merge_args(&args);
    config.validate()?;

    if args.emit_demo {
        let period = Duration::from_millis(config.feed.demo_interval_ms);
        let generator = DemoGenerator::new(config.feed.demo_drift);
        return feed::demo::emit(&mut tokio::io::stdout(), generator, period, None).await;
    }

    info!(
        "Starting wfscope in {:?} mode, source {:?}",
        config.display.mode, config.feed.source
    );

    let scope = Scope::from_config(&config)?;
    let feed = feed::start(&config.feed).await?;

    let stats = match config.display.mode {
        DisplayMode::Terminal => display::terminal::run(&config, scope, feed).await?,
        DisplayMode::Headless => display::headless::run(&config, scope, feed).await?,
    };

    info!(
        "Done: {} lines rendered, {} discarded, {} rejected",
        stats.rendered, stats.discarded, stats.rejected
    );

    Ok(())
}
