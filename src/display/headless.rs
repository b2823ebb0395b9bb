use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

use crate::canvas::Canvas;
use crate::config::Config;
use crate::feed::Feed;
use crate::scope::{Scope, Stats};

/// Render every line until the feed ends or Ctrl-C, then write the snapshot.
pub async fn run(config: &Config, mut scope: Scope, mut feed: Feed) -> Result<Stats> {
    loop {
        tokio::select! {
            line = feed.recv() => match line {
                Some(line) => scope.tick(&line),
                None => {
                    info!("Feed closed");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }
    scope.note_discarded(feed.take_discarded());

    if let Some(path) = &config.display.snapshot {
        write_snapshot(scope.canvas(), path)?;
        info!("Wrote snapshot to {}", path.display());
    }

    Ok(scope.stats())
}

pub fn write_snapshot(canvas: &Canvas, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Could not create snapshot {}", path.display()))?;
    canvas
        .write_ppm(BufWriter::new(file))
        .with_context(|| format!("Could not write snapshot {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{self, FeedSource};

    #[tokio::test]
    async fn renders_file_feed_and_writes_snapshot() {
        let dir = std::env::temp_dir();
        let input = dir.join(format!("wfscope-headless-{}.wf", std::process::id()));
        let snapshot = dir.join(format!("wfscope-headless-{}.ppm", std::process::id()));
        std::fs::write(&input, "[WF]7000000,1.0,1.0\n[WF]7000000,1.0,0.0\ngarbage\n").unwrap();

        let mut config = Config::default();
        config.feed.source = FeedSource::File;
        config.feed.path = Some(input.clone());
        config.display.snapshot = Some(snapshot.clone());

        let scope = Scope::from_config(&config).unwrap();
        let feed = feed::start(&config.feed).await.unwrap();
        let stats = run(&config, scope, feed).await.unwrap();

        assert_eq!(stats.rendered, 2);
        assert_eq!(stats.discarded, 1);

        let bytes = std::fs::read(&snapshot).unwrap();
        std::fs::remove_file(&input).unwrap();
        std::fs::remove_file(&snapshot).unwrap();

        let header = b"P6\n320 240\n255\n";
        assert_eq!(&bytes[..header.len()], header);
        assert_eq!(bytes.len(), header.len() + 320 * 240 * 3);
        // Row 198 holds the first (white) line, row 199 the second (black)
        let pixel = |x: usize, y: usize| {
            let i = header.len() + (y * 320 + x) * 3;
            [bytes[i], bytes[i + 1], bytes[i + 2]]
        };
        assert_eq!(pixel(10, 198), [255, 255, 255]);
        assert_eq!(pixel(10, 199), [0, 0, 0]);
    }
}
