//! Price observations and the time series built from them

use crate::error::{EstimationError, Result};
use crate::utils::{month_index, parse_date};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A single dated price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub price: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Observations sorted by strictly increasing date
///
/// Construction is the only place the ordering is checked; the series is
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    observations: Vec<Observation>,
}

impl TimeSeries {
    /// Minimum length of any series
    pub const MIN_LEN: usize = 2;

    /// Create a series, failing on duplicate or out-of-order dates
    pub fn new(observations: Vec<Observation>) -> Result<Self> {
        if observations.len() < Self::MIN_LEN {
            return Err(EstimationError::InsufficientData {
                context: "time series",
                required: Self::MIN_LEN,
                actual: observations.len(),
            });
        }

        if let Some(obs) = observations.iter().find(|o| !o.price.is_finite()) {
            return Err(EstimationError::InvalidSeries(format!(
                "Price on {} is not finite",
                obs.date
            )));
        }

        for pair in observations.windows(2) {
            if pair[1].date == pair[0].date {
                return Err(EstimationError::InvalidSeries(format!(
                    "Duplicate date {}",
                    pair[0].date
                )));
            }
            if pair[1].date < pair[0].date {
                return Err(EstimationError::InvalidSeries(format!(
                    "Dates are not increasing: {} follows {}",
                    pair[1].date, pair[0].date
                )));
            }
        }

        Ok(Self { observations })
    }

    /// Create a series from parallel date and price vectors
    pub fn from_parts(dates: Vec<NaiveDate>, prices: Vec<f64>) -> Result<Self> {
        if dates.len() != prices.len() {
            return Err(EstimationError::InvalidSeries(format!(
                "Dates length ({}) doesn't match prices length ({})",
                dates.len(),
                prices.len()
            )));
        }

        Self::new(
            dates
                .into_iter()
                .zip(prices)
                .map(|(date, price)| Observation::new(date, price))
                .collect(),
        )
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the series holds no observations
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first(&self) -> &Observation {
        &self.observations[0]
    }

    pub fn last(&self) -> &Observation {
        &self.observations[self.observations.len() - 1]
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.date).collect()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.price).collect()
    }

    /// Fail unless every observation falls in the calendar month right
    /// after its predecessor's
    pub fn ensure_monthly(&self) -> Result<()> {
        for pair in self.observations.windows(2) {
            let gap = month_index(pair[1].date) - month_index(pair[0].date);
            if gap != 1 {
                return Err(EstimationError::InvalidSeries(format!(
                    "Observations must be monthly: {} is {} month(s) after {}",
                    pair[1].date, gap, pair[0].date
                )));
            }
        }
        Ok(())
    }
}

/// Loader for `Dates,Prices` CSV files
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a time series from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<TimeSeries> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load a time series from any CSV source with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<TimeSeries> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let date_idx = Self::detect_column(&headers, "date")?;
        let price_idx = Self::detect_column(&headers, "price")?;

        let mut observations = Vec::new();
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            let field = |idx: usize| {
                record.get(idx).ok_or_else(|| {
                    EstimationError::Parse(format!("Row {} is missing column {}", row + 1, idx))
                })
            };

            let date = parse_date(field(date_idx)?)?;
            let price_text = field(price_idx)?;
            let price = price_text.parse::<f64>().map_err(|e| {
                EstimationError::Parse(format!(
                    "Row {}: invalid price {:?}: {}",
                    row + 1,
                    price_text,
                    e
                ))
            })?;

            observations.push(Observation::new(date, price));
        }

        tracing::debug!(rows = observations.len(), "loaded price observations");

        TimeSeries::new(observations)
    }

    /// Index of the first header containing `needle`, case-insensitively
    fn detect_column(headers: &csv::StringRecord, needle: &str) -> Result<usize> {
        headers
            .iter()
            .position(|h| h.to_lowercase().contains(needle))
            .ok_or_else(|| {
                EstimationError::Parse(format!("No {} column found in header", needle))
            })
    }
}
