//! Error types for the price_forecast crate

use chrono::NaiveDate;
use price_math::MathError;
use std::fmt;
use thiserror::Error;

/// Which side of the estimation window a rejected query fell on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutOfRangeKind {
    /// Query date precedes the first observation
    TooEarly,
    /// Query date follows the last forecast date
    TooLate,
}

impl fmt::Display for OutOfRangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutOfRangeKind::TooEarly => write!(f, "earlier than available data"),
            OutOfRangeKind::TooLate => write!(f, "beyond the forecast range"),
        }
    }
}

/// Custom error types for the price_forecast crate
#[derive(Debug, Error)]
pub enum EstimationError {
    /// Query date outside `[earliest_date, latest_forecast_date]`
    #[error("Date {date} is {kind} (bound: {bound})")]
    OutOfRange {
        kind: OutOfRangeKind,
        date: NaiveDate,
        bound: NaiveDate,
    },

    /// Too few observations for the requested model
    #[error("Insufficient data for {context}: need at least {required} observations, got {actual}")]
    InsufficientData {
        context: &'static str,
        required: usize,
        actual: usize,
    },

    /// Duplicate, non-monotonic or irregularly spaced dates
    #[error("Invalid series: {0}")]
    InvalidSeries(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid engine configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unparseable date or price text
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error from numeric primitives
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from CSV decoding
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl EstimationError {
    /// The out-of-range side, if this is a range rejection
    pub fn out_of_range_kind(&self) -> Option<OutOfRangeKind> {
        match self {
            EstimationError::OutOfRange { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for EstimationError {
    fn from(err: serde_json::Error) -> Self {
        EstimationError::Config(err.to_string())
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, EstimationError>;
