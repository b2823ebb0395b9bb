//! Line sources feeding the renderer.
//!
//! A background task reads newline-delimited wire text, parses it, and hands
//! complete records to the render loop over a bounded channel. The render
//! loop is the only consumer and the only writer of the canvas.

pub mod demo;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::FeedConfig;
use crate::protocol::{self, WfLine};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FeedSource {
    /// Built-in synthetic pattern
    #[default]
    Demo,
    Stdin,
    Tcp,
    File,
}

/// Receiving end of a running feed.
pub struct Feed {
    lines: mpsc::Receiver<WfLine>,
    discarded: Arc<AtomicU64>,
    task: JoinHandle<()>,
}

impl Drop for Feed {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl Feed {
    /// Next record, or `None` once the source has ended.
    pub async fn recv(&mut self) -> Option<WfLine> {
        self.lines.recv().await
    }

    /// Next record if one is already queued. `Err` distinguishes an empty
    /// queue from a closed feed.
    pub fn try_recv(&mut self) -> Result<WfLine, mpsc::error::TryRecvError> {
        self.lines.try_recv()
    }

    /// Lines dropped by the parser since the last call.
    pub fn take_discarded(&self) -> u64 {
        self.discarded.swap(0, Ordering::Relaxed)
    }
}

/// Open the configured source and start reading it in the background.
pub async fn start(config: &FeedConfig) -> Result<Feed> {
    let (tx, rx) = mpsc::channel(config.queue_capacity);
    let discarded = Arc::new(AtomicU64::new(0));

    let task = match config.source {
        FeedSource::Demo => {
            let period = Duration::from_millis(config.demo_interval_ms);
            let generator = demo::DemoGenerator::new(config.demo_drift);
            info!("Feeding demo pattern every {:?}", period);
            tokio::spawn(demo::run(generator, period, tx))
        }
        FeedSource::Stdin => {
            info!("Reading waterfall lines from stdin");
            spawn_reader("stdin", tokio::io::stdin(), tx, discarded.clone())
        }
        FeedSource::Tcp => {
            let stream = TcpStream::connect(&config.address)
                .await
                .with_context(|| format!("Could not connect to {}", config.address))?;
            info!("Connected to {}", config.address);
            spawn_reader("tcp", stream, tx, discarded.clone())
        }
        FeedSource::File => {
            let path = config
                .path
                .as_ref()
                .context("File source selected but no path configured")?;
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Could not open {}", path.display()))?;
            info!("Reading waterfall lines from {}", path.display());
            spawn_reader("file", file, tx, discarded.clone())
        }
    };

    Ok(Feed {
        lines: rx,
        discarded,
        task,
    })
}

fn spawn_reader<R>(
    name: &'static str,
    reader: R,
    tx: mpsc::Sender<WfLine>,
    discarded: Arc<AtomicU64>,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        match pump(reader, tx, &discarded).await {
            Ok(forwarded) => info!("{} feed ended after {} lines", name, forwarded),
            Err(e) => warn!("{} feed failed: {}", name, e),
        }
    })
}

/// Forward every record in `reader` to `tx`; returns how many were sent.
///
/// Bytes are decoded lossily so a corrupt line is discarded rather than
/// ending the stream.
async fn pump<R>(reader: R, tx: mpsc::Sender<WfLine>, discarded: &AtomicU64) -> Result<u64>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut forwarded = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let text = String::from_utf8_lossy(&buf);
        match protocol::parse_line(&text) {
            Some(line) => {
                if tx.send(line).await.is_err() {
                    debug!("Renderer gone, stopping feed");
                    break;
                }
                forwarded += 1;
            }
            None => {
                discarded.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    Ok(forwarded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pump_forwards_records_and_counts_the_rest() {
        let input: &[u8] = b"[WF]1,1,0.5\nnoise\n\xff\xfe\n[WF]2,2,1,0.5";
        let (tx, mut rx) = mpsc::channel(8);
        let discarded = AtomicU64::new(0);

        let forwarded = pump(input, tx, &discarded).await.unwrap();
        assert_eq!(forwarded, 2);
        assert_eq!(discarded.load(Ordering::Relaxed), 2);

        assert_eq!(rx.recv().await.unwrap().intensities, vec![0.5]);
        let second = rx.recv().await.unwrap();
        assert_eq!(second.frequency_hz, 2.0);
        assert_eq!(second.intensities, vec![0.5, 0.25]);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn pump_stops_when_renderer_is_gone() {
        let input: &[u8] = b"[WF]1,1,0.5\n[WF]1,1,0.5\n";
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let forwarded = pump(input, tx, &AtomicU64::new(0)).await.unwrap();
        assert_eq!(forwarded, 0);
    }

    #[tokio::test]
    async fn file_feed_delivers_lines_then_closes() {
        let path = std::env::temp_dir().join(format!("wfscope-feed-{}.wf", std::process::id()));
        std::fs::write(&path, "[WF]7000000,1.0,1.0,0.57\n[WF]1,2\n[WF]7000000,1.0,0.5\n").unwrap();

        let config = FeedConfig {
            source: FeedSource::File,
            path: Some(path.clone()),
            ..FeedConfig::default()
        };
        let mut feed = start(&config).await.unwrap();

        let mut lines = Vec::new();
        while let Some(line) = feed.recv().await {
            lines.push(line);
        }
        std::fs::remove_file(&path).unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].intensities, vec![1.0, 0.57]);
        assert_eq!(feed.take_discarded(), 1);
        assert_eq!(feed.take_discarded(), 0);
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let config = FeedConfig {
            source: FeedSource::File,
            path: Some("/nonexistent/wfscope/input.wf".into()),
            ..FeedConfig::default()
        };
        assert!(start(&config).await.is_err());
    }
}
