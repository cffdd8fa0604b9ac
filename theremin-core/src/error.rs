//! Errors for the pure pitch/note conversions.

use thiserror::Error;

/// Precondition violations of the pitch-axis and note conversions.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum PitchError {
    /// Frequency was zero, negative, or not finite.
    #[error("invalid frequency: {0} Hz (must be finite and > 0)")]
    InvalidFrequency(f64),

    /// Axis bounds did not satisfy `0 < low < high`.
    #[error("invalid pitch range: low {low} Hz, high {high} Hz")]
    InvalidRange { low: f64, high: f64 },

    /// Axis length was zero, negative, or not finite.
    #[error("invalid axis length: {0}")]
    InvalidAxisLength(f64),
}
