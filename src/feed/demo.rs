//! Synthetic cosine pattern for running without a receiver attached.

use anyhow::Result;
use std::f64::consts::PI;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use crate::protocol::{self, WfLine};

pub const DEMO_SAMPLES: usize = 50;
pub const DEMO_FREQUENCY_HZ: f64 = 7_000_000.0;
const INITIAL_CYCLES: f64 = 8.0;

/// Produces `(1.5 + cos(phi)) / 3` stripes whose spatial frequency moves by
/// `drift` per line.
#[derive(Debug, Clone)]
pub struct DemoGenerator {
    cycles: f64,
    drift: f64,
}

impl DemoGenerator {
    pub fn new(drift: f64) -> Self {
        Self {
            cycles: INITIAL_CYCLES,
            drift,
        }
    }

    pub fn next_line(&mut self) -> WfLine {
        let intensities = (0..DEMO_SAMPLES)
            .map(|t| {
                let phi = (t as f64 / DEMO_SAMPLES as f64) * self.cycles * PI;
                (1.5 + phi.cos()) / 3.0
            })
            .collect();
        self.cycles += self.drift;
        WfLine {
            frequency_hz: DEMO_FREQUENCY_HZ,
            intensities,
        }
    }
}

/// Send one generated line per `period` until the receiver goes away.
pub async fn run(mut generator: DemoGenerator, period: Duration, tx: mpsc::Sender<WfLine>) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        if tx.send(generator.next_line()).await.is_err() {
            debug!("Renderer gone, stopping demo feed");
            break;
        }
    }
}

/// Write generated lines in wire form, one per `period`, `count` lines or
/// forever. Lets the demo drive another instance through a pipe.
pub async fn emit<W>(
    out: &mut W,
    mut generator: DemoGenerator,
    period: Duration,
    count: Option<usize>,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut ticker = interval(period);
    let mut written = 0;
    while count.map_or(true, |c| written < c) {
        ticker.tick().await;
        let line = protocol::format_line(&generator.next_line(), 1.0);
        out.write_all(line.as_bytes()).await?;
        out.write_all(b"\n").await?;
        out.flush().await?;
        written += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_stay_inside_unit_range() {
        let mut generator = DemoGenerator::new(0.37);
        for _ in 0..100 {
            let line = generator.next_line();
            assert_eq!(line.intensities.len(), DEMO_SAMPLES);
            assert!(line.intensities.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn pattern_starts_at_peak() {
        let line = DemoGenerator::new(0.0).next_line();
        assert!((line.intensities[0] - 2.5 / 3.0).abs() < 1e-12);
        assert_eq!(line.frequency_hz, DEMO_FREQUENCY_HZ);
    }

    #[test]
    fn zero_drift_repeats_the_same_line() {
        let mut generator = DemoGenerator::new(0.0);
        assert_eq!(generator.next_line(), generator.next_line());
    }

    #[tokio::test]
    async fn emitted_lines_parse_back() {
        let mut out: Vec<u8> = Vec::new();
        emit(&mut out, DemoGenerator::new(0.0), Duration::from_millis(1), Some(3))
            .await
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().map(protocol::parse_line).collect();
        assert_eq!(lines.len(), 3);
        let expected = DemoGenerator::new(0.0).next_line();
        for line in lines {
            let line = line.unwrap();
            assert_eq!(line.frequency_hz, expected.frequency_hz);
            assert_eq!(line.intensities.len(), DEMO_SAMPLES);
        }
    }
}
