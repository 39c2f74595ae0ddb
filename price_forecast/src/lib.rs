//! # Price Forecast
//!
//! Point-price estimates for a commodity on any date inside, or up to a
//! year past, a window of monthly observations.
//!
//! ## Features
//!
//! - Time series of dated prices with ordering checks, loaded from CSV
//! - Piecewise-linear interpolation across the observed history
//! - Additive Holt-Winters forecasting (12-month season) with optimised
//!   smoothing constants
//! - A query engine that validates bounds, dispatches to the right model
//!   and rounds the result
//!
//! ## Quick Start
//!
//! ```no_run
//! use price_forecast::data::DataLoader;
//! use price_forecast::estimator::PriceEstimationEngine;
//!
//! // Load data
//! let series = DataLoader::from_csv("Nat_Gas.csv")?;
//!
//! // Fit the interpolation and the seasonal model once
//! let engine = PriceEstimationEngine::new(series)?;
//!
//! // Query any date in the window
//! let in_history = engine.estimate_str("2022-06-15")?;
//! let in_forecast = engine.estimate_str("2024-11-30")?;
//! # Ok::<(), price_forecast::EstimationError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod estimator;
pub mod metrics;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use crate::config::{EngineConfig, OptimizerConfig};
pub use crate::data::{DataLoader, Observation, TimeSeries};
pub use crate::error::{EstimationError, OutOfRangeKind};
pub use crate::estimator::{CombinedPoint, EstimationBounds, PointKind, PriceEstimationEngine};
pub use crate::models::{
    FittedSeasonalModel, ForecastModel, ForecastSeries, HistoricalInterpolator, HoltWinters,
    SeasonalForecaster, SmoothingParams, TrainedForecastModel,
};
pub use price_math::RoundingMode;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
