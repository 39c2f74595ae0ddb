//! Utility functions for the price_forecast crate

use crate::error::{EstimationError, Result};
use chrono::{Datelike, Months, NaiveDate};

/// Date formats accepted by [`parse_date`], tried in order
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];

/// Parse a calendar date written as `YYYY-MM-DD`, `MM/DD/YYYY` or `MM/DD/YY`
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let text = text.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| {
            NaiveDate::parse_from_str(text, fmt)
                .ok()
                // %Y happily reads "20" as year 20; leave two-digit years to %y
                .filter(|d| !(fmt.contains("%Y") && d.year() < 100))
        })
        .ok_or_else(|| EstimationError::Parse(format!("Unrecognised date: {:?}", text)))
}

/// Months since year zero, used to check monthly spacing
pub fn month_index(date: NaiveDate) -> i64 {
    date.year() as i64 * 12 + date.month0() as i64
}

/// Last day of the month `months_ahead` months after `date`'s month
pub fn month_end_after(date: NaiveDate, months_ahead: u32) -> Result<NaiveDate> {
    let first_of_month = date.with_day(1).ok_or_else(|| {
        EstimationError::InvalidParameter(format!("Cannot take month start of {}", date))
    })?;

    first_of_month
        .checked_add_months(Months::new(months_ahead + 1))
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| {
            EstimationError::InvalidParameter(format!(
                "Date overflow projecting {} months past {}",
                months_ahead, date
            ))
        })
}

/// Month-end dates for the `horizon` months following `last_date`
pub fn future_month_ends(last_date: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    (1..=horizon)
        .map(|h| {
            let h = u32::try_from(h).map_err(|_| {
                EstimationError::InvalidParameter(format!("Horizon too large: {}", horizon))
            })?;
            month_end_after(last_date, h)
        })
        .collect()
}
