//! Engine configuration
//!
//! Every field has a default, so a JSON document only needs the keys it
//! overrides:
//!
//! ```json
//! { "rounding": "half_even", "optimizer": { "grid_steps": 7 } }
//! ```

use crate::error::{EstimationError, Result};
use price_math::rounding::MAX_DECIMALS;
use price_math::{RoundingMode, SimplexConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings for the smoothing-constant search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Grid points per smoothing constant in the seeding search
    pub grid_steps: usize,
    /// Iteration cap for the simplex refinement
    pub max_iterations: usize,
    /// Convergence tolerance for the simplex refinement
    pub tolerance: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            grid_steps: 5,
            max_iterations: 500,
            tolerance: 1e-10,
        }
    }
}

impl OptimizerConfig {
    pub(crate) fn simplex(&self) -> SimplexConfig {
        SimplexConfig {
            max_iter: self.max_iterations,
            initial_step: 0.1,
            diameter_tol: self.tolerance.sqrt(),
            fvalue_tol: self.tolerance,
        }
    }
}

/// Configuration of a [`PriceEstimationEngine`](crate::estimator::PriceEstimationEngine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Observations per seasonal cycle
    pub season_length: usize,
    /// Number of months projected past the last observation
    pub forecast_horizon: usize,
    /// Full cycles required before the seasonal model will fit
    pub min_seasonal_cycles: usize,
    /// Decimal places kept in estimates
    pub decimals: u32,
    /// Tie-breaking rule for rounding
    pub rounding: RoundingMode,
    /// Smoothing-constant search settings
    pub optimizer: OptimizerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            season_length: 12,
            forecast_horizon: 12,
            min_seasonal_cycles: 2,
            decimals: 2,
            rounding: RoundingMode::HalfAwayFromZero,
            optimizer: OptimizerConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Minimum observations the seasonal model accepts
    pub fn min_seasonal_observations(&self) -> usize {
        self.season_length * self.min_seasonal_cycles
    }

    /// Check that every setting is usable
    pub fn validate(&self) -> Result<()> {
        if self.season_length < 2 {
            return Err(EstimationError::Config(format!(
                "season_length must be at least 2, got {}",
                self.season_length
            )));
        }

        if self.forecast_horizon < 2 {
            return Err(EstimationError::Config(format!(
                "forecast_horizon must be at least 2, got {}",
                self.forecast_horizon
            )));
        }

        if self.min_seasonal_cycles < 2 {
            return Err(EstimationError::Config(format!(
                "min_seasonal_cycles must be at least 2, got {}",
                self.min_seasonal_cycles
            )));
        }

        if self.decimals > MAX_DECIMALS {
            return Err(EstimationError::Config(format!(
                "decimals must be at most {}, got {}",
                MAX_DECIMALS, self.decimals
            )));
        }

        if self.optimizer.grid_steps < 2 {
            return Err(EstimationError::Config(
                "optimizer.grid_steps must be at least 2".to_string(),
            ));
        }

        if self.optimizer.max_iterations == 0 {
            return Err(EstimationError::Config(
                "optimizer.max_iterations must be at least 1".to_string(),
            ));
        }

        if !(self.optimizer.tolerance > 0.0 && self.optimizer.tolerance.is_finite()) {
            return Err(EstimationError::Config(format!(
                "optimizer.tolerance must be positive, got {}",
                self.optimizer.tolerance
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_seasonal_observations(), 24);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            EngineConfig::from_json_str(r#"{ "rounding": "half_even", "optimizer": { "grid_steps": 7 } }"#)
                .unwrap();

        assert_eq!(config.rounding, RoundingMode::HalfEven);
        assert_eq!(config.optimizer.grid_steps, 7);
        assert_eq!(config.optimizer.max_iterations, 500);
        assert_eq!(config.season_length, 12);
        assert_eq!(config.forecast_horizon, 12);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "forecast_horizon": 0 }"#),
            Err(EstimationError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "forecast_horizon": 1 }"#),
            Err(EstimationError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "min_seasonal_cycles": 1 }"#),
            Err(EstimationError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "decimals": 11 }"#),
            Err(EstimationError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "optimizer": { "tolerance": 0.0 } }"#),
            Err(EstimationError::Config(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        assert!(matches!(
            EngineConfig::from_json_str("{ not json"),
            Err(EstimationError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "rounding": "up" }"#),
            Err(EstimationError::Config(_))
        ));
    }

    #[test]
    fn test_serialises_round_trip_names() {
        let json = serde_json::to_string(&EngineConfig::default()).unwrap();
        assert!(json.contains("\"rounding\":\"half_away_from_zero\""));
    }
}
