//! # Price Math
//!
//! Numeric building blocks for the price estimation engine.
//! This crate provides piecewise-linear interpolation, a bounded
//! simplex optimiser with a grid-search seed, and decimal rounding.

use thiserror::Error;

pub mod interpolation;
pub mod optimize;
pub mod rounding;

pub use interpolation::LinearInterpolator;
pub use optimize::{grid_search, nelder_mead, Bounds, OptimizeResult, SimplexConfig};
pub use rounding::{round_to, RoundingMode};

/// Errors that can occur in numeric calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numeric operations
pub type Result<T> = std::result::Result<T, MathError>;
