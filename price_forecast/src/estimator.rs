//! Price estimation for arbitrary dates
//!
//! The engine is built once from a [`TimeSeries`] and answers queries
//! without mutating anything, so a single instance can be shared across
//! threads.
//!
//! Dispatch for a query date `d`:
//!
//! 1. `d < earliest_date` fails with [`OutOfRangeKind::TooEarly`]
//! 2. `d > latest_forecast_date` fails with [`OutOfRangeKind::TooLate`]
//! 3. `d <= last_observed_date` reads the historical interpolation
//! 4. otherwise the forecast points are interpolated linearly; dates
//!    before the first forecast point take that point's value
//!
//! The result is rounded to the configured number of decimals.
//!
//! ```no_run
//! use price_forecast::{DataLoader, PriceEstimationEngine};
//!
//! let series = DataLoader::from_csv("Nat_Gas.csv")?;
//! let engine = PriceEstimationEngine::new(series)?;
//! let price = engine.estimate_str("2024-11-30")?;
//! # Ok::<(), price_forecast::EstimationError>(())
//! ```

use crate::config::EngineConfig;
use crate::data::TimeSeries;
use crate::error::{EstimationError, OutOfRangeKind, Result};
use crate::metrics::{fit_accuracy, FitAccuracy};
use crate::models::interpolation::day_offset;
use crate::models::{ForecastSeries, HistoricalInterpolator, SeasonalForecaster, TrainedForecastModel};
use crate::utils::parse_date;
use chrono::NaiveDate;
use price_math::{round_to, LinearInterpolator};
use serde::Serialize;

/// Dates that partition the estimation window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EstimationBounds {
    /// First observed date
    pub earliest_date: NaiveDate,
    /// Last observed date; later dates use the forecast
    pub last_observed_date: NaiveDate,
    /// Last forecast date
    pub latest_forecast_date: NaiveDate,
}

impl EstimationBounds {
    /// Decide which branch prices `date`, or why it can't be priced
    pub fn classify(&self, date: NaiveDate) -> Result<PointKind> {
        if date < self.earliest_date {
            return Err(EstimationError::OutOfRange {
                kind: OutOfRangeKind::TooEarly,
                date,
                bound: self.earliest_date,
            });
        }

        if date > self.latest_forecast_date {
            return Err(EstimationError::OutOfRange {
                kind: OutOfRangeKind::TooLate,
                date,
                bound: self.latest_forecast_date,
            });
        }

        if date <= self.last_observed_date {
            Ok(PointKind::Historical)
        } else {
            Ok(PointKind::Forecast)
        }
    }
}

/// Where a price comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointKind {
    Historical,
    Forecast,
}

/// One point of the observed-plus-forecast series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CombinedPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub kind: PointKind,
}

/// Historical interpolation and seasonal forecast behind one query API
#[derive(Debug, Clone)]
pub struct PriceEstimationEngine {
    config: EngineConfig,
    series: TimeSeries,
    historical: HistoricalInterpolator,
    forecaster: SeasonalForecaster,
    /// Forecast points only; dates before the first one take its value
    forecast_curve: LinearInterpolator,
    bounds: EstimationBounds,
}

impl PriceEstimationEngine {
    /// Build an engine with the default configuration
    pub fn new(series: TimeSeries) -> Result<Self> {
        Self::with_config(series, EngineConfig::default())
    }

    /// Fit both models to `series`
    pub fn with_config(series: TimeSeries, config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let historical = HistoricalInterpolator::build(&series)?;
        let forecaster = SeasonalForecaster::fit(&series, &config)?;
        let forecast = forecaster.forecast_series();

        let origin = historical.origin();
        let (xs, ys) = forecast
            .points()
            .iter()
            .map(|p| (day_offset(origin, p.date), p.price))
            .unzip();
        let forecast_curve = LinearInterpolator::new(xs, ys)?;

        let bounds = EstimationBounds {
            earliest_date: series.first().date,
            last_observed_date: series.last().date,
            latest_forecast_date: forecast.last().date,
        };

        tracing::info!(
            observations = series.len(),
            earliest = %bounds.earliest_date,
            last_observed = %bounds.last_observed_date,
            latest_forecast = %bounds.latest_forecast_date,
            "price estimation engine ready"
        );

        Ok(Self {
            config,
            series,
            historical,
            forecaster,
            forecast_curve,
            bounds,
        })
    }

    /// Estimated price on `date`, rounded to the configured decimals
    pub fn estimate(&self, date: NaiveDate) -> Result<f64> {
        let price = self.estimate_unrounded(date)?;
        Ok(round_to(price, self.config.decimals, self.config.rounding)?)
    }

    /// Estimated price for a date written as `YYYY-MM-DD`, `MM/DD/YYYY` or
    /// `MM/DD/YY`
    pub fn estimate_str(&self, date: &str) -> Result<f64> {
        self.estimate(parse_date(date)?)
    }

    /// Estimated price on `date` before rounding
    pub fn estimate_unrounded(&self, date: NaiveDate) -> Result<f64> {
        let price = match self.bounds.classify(date)? {
            PointKind::Historical => self.historical.evaluate(date),
            PointKind::Forecast => self
                .forecast_curve
                .evaluate_clamped(self.historical.offset_of(date)),
        };

        tracing::trace!(%date, price, "estimated price");
        Ok(price)
    }

    /// Which branch would price `date`
    pub fn source(&self, date: NaiveDate) -> Result<PointKind> {
        self.bounds.classify(date)
    }

    /// Observations followed by the forecast points, in date order
    pub fn combined_series(&self) -> Vec<CombinedPoint> {
        let historical = self.series.observations().iter().map(|o| CombinedPoint {
            date: o.date,
            price: o.price,
            kind: PointKind::Historical,
        });
        let forecast = self
            .forecaster
            .forecast_series()
            .points()
            .iter()
            .map(|o| CombinedPoint {
                date: o.date,
                price: o.price,
                kind: PointKind::Forecast,
            });

        historical.chain(forecast).collect()
    }

    /// [`combined_series`](Self::combined_series) as a JSON array
    pub fn combined_series_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.combined_series())?)
    }

    /// In-sample accuracy of the seasonal model
    pub fn fit_accuracy(&self) -> Result<FitAccuracy> {
        fit_accuracy(self.forecaster.model().fitted_values(), &self.series.prices())
    }

    pub fn bounds(&self) -> &EstimationBounds {
        &self.bounds
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    pub fn forecast(&self) -> &ForecastSeries {
        self.forecaster.forecast_series()
    }

    pub fn forecaster(&self) -> &SeasonalForecaster {
        &self.forecaster
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
