//! Error types for the bounds crate.

use thiserror::Error;

/// Errors produced while evaluating error bounds.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BoundsError {
    /// Decimal precision must be at least one significant digit.
    #[error("decimal precision must be at least 1 significant digit, got {0}")]
    InvalidPrecision(u64),

    /// A parameter that must be non-negative was negative.
    #[error("{name} must be non-negative, got {value}")]
    Negative {
        /// Parameter name (`epsilon`, `delta`).
        name: &'static str,
        /// The offending value, rendered as a decimal string.
        value: String,
    },

    /// A float input was NaN or infinite and has no decimal representation.
    #[error("{name} must be finite, got {value}")]
    NonFinite {
        /// Parameter name.
        name: &'static str,
        /// The offending value.
        value: f64,
    },

    /// `n + 1` levels do not fit in a `u32`.
    #[error("depth {0} is too large")]
    DepthOverflow(u32),
}

/// Result type for bounds operations.
pub type BoundsResult<T> = Result<T, BoundsError>;
