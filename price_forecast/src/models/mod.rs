//! Price models: historical interpolation and seasonal forecasting

use crate::data::{Observation, TimeSeries};
use crate::error::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Debug;

/// Dated forecast values immediately following the last observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSeries {
    points: Vec<Observation>,
}

impl ForecastSeries {
    /// Pair forecast values with their dates
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(crate::error::EstimationError::InvalidParameter(format!(
                "Dates length ({}) doesn't match values length ({})",
                dates.len(),
                values.len()
            )));
        }

        if dates.is_empty() {
            return Err(crate::error::EstimationError::InvalidParameter(
                "A forecast needs at least one period".to_string(),
            ));
        }

        Ok(Self {
            points: dates
                .into_iter()
                .zip(values)
                .map(|(date, price)| Observation::new(date, price))
                .collect(),
        })
    }

    /// Get the forecast points
    pub fn points(&self) -> &[Observation] {
        &self.points
    }

    /// Get the number of periods forecasted
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> &Observation {
        &self.points[0]
    }

    pub fn last(&self) -> &Observation {
        &self.points[self.points.len() - 1]
    }

    /// Get the forecasted values
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Project `horizon` values past the end of the training data
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>>;

    /// One-step-ahead predictions over the training data
    fn fitted_values(&self) -> &[f64];

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a time series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a time series
    fn train(&self, series: &TimeSeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod holt_winters;
pub mod interpolation;

pub use holt_winters::{FittedSeasonalModel, HoltWinters, SeasonalForecaster, SmoothingParams};
pub use interpolation::HistoricalInterpolator;
