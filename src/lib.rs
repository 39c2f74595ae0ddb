//! # Gas Price Estimator
//!
//! Facade over the workspace crates: `price_forecast` holds the estimation
//! engine and its data types, `price_math` the numeric primitives.
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use gas_price_estimator_workspace::{estimate_many, PriceEstimationEngine, TimeSeries};
//!
//! // Three years of month-end prices with a winter peak
//! let start = NaiveDate::from_ymd_opt(2020, 10, 31).unwrap();
//! let dates: Vec<NaiveDate> = (0..36)
//!     .map(|i| price_forecast::utils::month_end_after(start, i).unwrap())
//!     .collect();
//! let prices: Vec<f64> = (0..36)
//!     .map(|i| 10.0 + 0.05 * i as f64 + (i as f64 * std::f64::consts::PI / 6.0).cos())
//!     .collect();
//!
//! let engine = PriceEstimationEngine::new(TimeSeries::from_parts(dates, prices).unwrap()).unwrap();
//! let results = estimate_many(&engine, &["2021-03-15", "2019-01-01"]);
//! assert!(results[0].is_ok());
//! assert!(results[1].is_err());
//! ```

pub use price_forecast::{
    CombinedPoint, DataLoader, EngineConfig, EstimationBounds, EstimationError, Observation,
    OutOfRangeKind, PointKind, PriceEstimationEngine, TimeSeries,
};
pub use price_math::{round_to, MathError, RoundingMode};

/// Price every date string in `dates`, keeping failures per date
pub fn estimate_many(
    engine: &PriceEstimationEngine,
    dates: &[&str],
) -> Vec<Result<f64, EstimationError>> {
    dates.iter().map(|d| engine.estimate_str(d)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn engine() -> PriceEstimationEngine {
        let start = NaiveDate::from_ymd_opt(2020, 10, 31).unwrap();
        let dates = (0..24)
            .map(|i| price_forecast::utils::month_end_after(start, i).unwrap())
            .collect();
        let prices = (0..24).map(|i| 11.0 + 0.1 * i as f64).collect();
        PriceEstimationEngine::new(TimeSeries::from_parts(dates, prices).unwrap()).unwrap()
    }

    #[test]
    fn test_estimate_many_keeps_order() {
        let engine = engine();
        let results = estimate_many(&engine, &["2020-10-31", "not a date", "2030-01-01"]);

        assert_eq!(results.len(), 3);
        assert_eq!(*results[0].as_ref().unwrap(), 11.0);
        assert!(matches!(results[1], Err(EstimationError::Parse(_))));
        assert!(matches!(
            results[2],
            Err(EstimationError::OutOfRange {
                kind: OutOfRangeKind::TooLate,
                ..
            })
        ));
    }

    #[test]
    fn test_rounding_matches_engine_config() {
        let engine = engine();
        let config = engine.config();
        let raw = engine
            .estimate_unrounded(NaiveDate::from_ymd_opt(2021, 2, 14).unwrap())
            .unwrap();

        assert_eq!(config.rounding, RoundingMode::HalfAwayFromZero);
        assert_eq!(
            engine.estimate_str("2021-02-14").unwrap(),
            round_to(raw, config.decimals, config.rounding).unwrap()
        );
        assert!(matches!(
            round_to(raw, 11, RoundingMode::HalfEven),
            Err(MathError::InvalidInput(_))
        ));
    }
}
