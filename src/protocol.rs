//! Wire format of the spectrum feed.
//!
//! One record per line: `[WF]<freq_hz>,<max_magnitude>,<v1>,...,<vn>`.
//! Anything else is dropped; a bad line must never stop the render loop.

use tracing::debug;

/// Marker every waterfall record starts with.
pub const MARKER: &str = "[WF]";

/// A parsed waterfall record.
#[derive(Debug, Clone, PartialEq)]
pub struct WfLine {
    /// Centre frequency in Hz.
    pub frequency_hz: f64,
    /// Samples divided by the line's magnitude normalizer.
    pub intensities: Vec<f64>,
}

/// Parse one wire line. Returns `None` for anything that is not a complete
/// record: missing marker, fewer than three fields, unparseable numbers, or a
/// normalizer that is zero, negative or not finite.
pub fn parse_line(line: &str) -> Option<WfLine> {
    let body = line.trim_end_matches(['\r', '\n']).strip_prefix(MARKER)?;

    let fields: Vec<&str> = body.split(',').collect();
    if fields.len() < 3 {
        debug!(fields = fields.len(), "Dropping record without samples");
        return None;
    }

    let numbers = match fields
        .iter()
        .map(|f| f.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(n) => n,
        Err(e) => {
            debug!("Dropping malformed record: {}", e);
            return None;
        }
    };

    let frequency_hz = numbers[0];
    let max_magnitude = numbers[1];
    if !(max_magnitude.is_finite() && max_magnitude > 0.0) {
        debug!(max_magnitude, "Dropping record with unusable magnitude");
        return None;
    }

    let intensities = numbers[2..].iter().map(|v| v / max_magnitude).collect();
    Some(WfLine {
        frequency_hz,
        intensities,
    })
}

/// Format a record in wire form.
pub fn format_line(line: &WfLine, max_magnitude: f64) -> String {
    let mut out = format!("{}{},{}", MARKER, line.frequency_hz, max_magnitude);
    for v in &line.intensities {
        out.push(',');
        out.push_str(&(v * max_magnitude).to_string());
    }
    out
}
