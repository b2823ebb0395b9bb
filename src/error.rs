use thiserror::Error;

/// Errors raised by the rendering core.
///
/// Both variants are caller contract violations. The render loop logs them
/// and drops the offending line; they never leave the canvas half-updated.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// Intensity handed to the colour mapping was outside `[0.0, 1.0]` (or NaN).
    #[error("intensity {0} is out of range [0.0, 1.0]")]
    Range(f64),

    /// Input violated a precondition (empty data, zero length, bad geometry).
    #[error("precondition failed: {0}")]
    Precondition(String),
}

pub type Result<T> = std::result::Result<T, Error>;
