//! Continuous historical price curve

use crate::data::TimeSeries;
use crate::error::Result;
use chrono::NaiveDate;
use price_math::LinearInterpolator;

/// Piecewise-linear price curve over whole days since the first observation
///
/// Dates before the first or after the last observation continue the
/// nearest segment's slope; range policy belongs to the caller.
#[derive(Debug, Clone)]
pub struct HistoricalInterpolator {
    origin: NaiveDate,
    curve: LinearInterpolator,
}

impl HistoricalInterpolator {
    /// Fit the curve through every observation of `series`
    pub fn build(series: &TimeSeries) -> Result<Self> {
        let origin = series.first().date;
        let offsets = series
            .observations()
            .iter()
            .map(|o| day_offset(origin, o.date))
            .collect();

        let curve = LinearInterpolator::new(offsets, series.prices())?;

        Ok(Self { origin, curve })
    }

    /// Price at `date`
    pub fn evaluate(&self, date: NaiveDate) -> f64 {
        self.curve.evaluate(day_offset(self.origin, date))
    }

    /// First observation date; day offsets are measured from here
    pub fn origin(&self) -> NaiveDate {
        self.origin
    }

    /// Day offset of `date` from the origin
    pub fn offset_of(&self, date: NaiveDate) -> f64 {
        day_offset(self.origin, date)
    }
}

pub(crate) fn day_offset(origin: NaiveDate, date: NaiveDate) -> f64 {
    (date - origin).num_days() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series() -> TimeSeries {
        TimeSeries::from_parts(
            vec![ymd(2021, 1, 31), ymd(2021, 2, 28), ymd(2021, 3, 31)],
            vec![10.0, 12.8, 9.7],
        )
        .unwrap()
    }

    #[test]
    fn test_offsets_are_days_from_first_date() {
        let interp = HistoricalInterpolator::build(&series()).unwrap();
        assert_eq!(interp.origin(), ymd(2021, 1, 31));
        assert_eq!(interp.offset_of(ymd(2021, 2, 28)), 28.0);
        assert_eq!(interp.offset_of(ymd(2021, 1, 30)), -1.0);
    }

    #[test]
    fn test_exact_observations() {
        let interp = HistoricalInterpolator::build(&series()).unwrap();
        assert_relative_eq!(interp.evaluate(ymd(2021, 1, 31)), 10.0);
        assert_relative_eq!(interp.evaluate(ymd(2021, 2, 28)), 12.8);
        assert_relative_eq!(interp.evaluate(ymd(2021, 3, 31)), 9.7);
    }

    #[test]
    fn test_between_observations() {
        let interp = HistoricalInterpolator::build(&series()).unwrap();
        // 14 of the 28 days between observations: halfway
        assert_relative_eq!(interp.evaluate(ymd(2021, 2, 14)), 11.4, epsilon = 1e-12);
    }

    #[test]
    fn test_extrapolates_past_last_observation() {
        let interp = HistoricalInterpolator::build(&series()).unwrap();
        // Last segment falls 0.1 per day
        assert_relative_eq!(interp.evaluate(ymd(2021, 4, 10)), 8.7, epsilon = 1e-12);
        // First segment rises 0.1 per day
        assert_relative_eq!(interp.evaluate(ymd(2021, 1, 21)), 9.0, epsilon = 1e-12);
    }
}
