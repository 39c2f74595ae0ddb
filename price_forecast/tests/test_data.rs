use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use price_forecast::data::{DataLoader, TimeSeries};
use price_forecast::error::EstimationError;
use price_forecast::PriceEstimationEngine;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Two years of month-ends in the `MM/DD/YY` layout of the source file
fn nat_gas_csv() -> String {
    let rows = [
        ("10/31/20", 10.1),
        ("11/30/20", 10.3),
        ("12/31/20", 11.0),
        ("1/31/21", 10.9),
        ("2/28/21", 10.9),
        ("3/31/21", 10.9),
        ("4/30/21", 10.4),
        ("5/31/21", 9.84),
        ("6/30/21", 10.0),
        ("7/31/21", 10.1),
        ("8/31/21", 10.3),
        ("9/30/21", 10.2),
        ("10/31/21", 10.1),
        ("11/30/21", 11.2),
        ("12/31/21", 11.4),
        ("1/31/22", 11.5),
        ("2/28/22", 11.8),
        ("3/31/22", 11.5),
        ("4/30/22", 10.7),
        ("5/31/22", 10.7),
        ("6/30/22", 10.4),
        ("7/31/22", 10.5),
        ("8/31/22", 10.4),
        ("9/30/22", 10.8),
    ];

    let mut csv = String::from("Dates,Prices\n");
    for (date, price) in rows {
        csv.push_str(&format!("{},{}\n", date, price));
    }
    csv
}

#[test]
fn test_from_csv() {
    let file = write_csv(&nat_gas_csv());
    let series = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(series.len(), 24);
    assert!(!series.is_empty());
    assert_eq!(
        series.first().date,
        NaiveDate::from_ymd_opt(2020, 10, 31).unwrap()
    );
    assert_eq!(
        series.last().date,
        NaiveDate::from_ymd_opt(2022, 9, 30).unwrap()
    );
    assert_eq!(series.observations()[7].price, 9.84);
    assert!(series.ensure_monthly().is_ok());
}

#[test]
fn test_csv_feeds_engine() {
    let file = write_csv(&nat_gas_csv());
    let series = DataLoader::from_csv(file.path()).unwrap();
    let engine = PriceEstimationEngine::new(series).unwrap();

    assert_eq!(engine.estimate_str("10/31/20").unwrap(), 10.1);
    assert_eq!(engine.estimate_str("2021-05-31").unwrap(), 9.84);
    assert_eq!(
        engine.bounds().latest_forecast_date,
        NaiveDate::from_ymd_opt(2023, 9, 30).unwrap()
    );
}

#[test]
fn test_csv_rejects_unsorted_rows() {
    let file = write_csv("Dates,Prices\n11/30/20,10.3\n10/31/20,10.1\n");
    assert!(matches!(
        DataLoader::from_csv(file.path()),
        Err(EstimationError::InvalidSeries(_))
    ));
}

#[test]
fn test_csv_rejects_duplicate_rows() {
    let file = write_csv("Dates,Prices\n10/31/20,10.1\n10/31/20,10.3\n");
    assert!(matches!(
        DataLoader::from_csv(file.path()),
        Err(EstimationError::InvalidSeries(_))
    ));
}

#[test]
fn test_csv_single_row_is_insufficient() {
    let file = write_csv("Dates,Prices\n10/31/20,10.1\n");
    assert!(matches!(
        DataLoader::from_csv(file.path()),
        Err(EstimationError::InsufficientData { required: 2, .. })
    ));
}

#[test]
fn test_missing_file() {
    let result = DataLoader::from_csv("/nonexistent/Nat_Gas.csv");
    assert!(matches!(result, Err(EstimationError::Io(_))));
}

#[test]
fn test_header_detection_is_case_insensitive() {
    let series = DataLoader::from_reader("PRICE,DATE\n10.1,2020-10-31\n10.3,2020-11-30\n".as_bytes())
        .unwrap();
    assert_eq!(series.prices(), vec![10.1, 10.3]);
}

#[test]
fn test_series_is_unchanged_by_engine() {
    let file = write_csv(&nat_gas_csv());
    let series = DataLoader::from_csv(file.path()).unwrap();
    let copy: TimeSeries = series.clone();
    let engine = PriceEstimationEngine::new(series).unwrap();
    assert_eq!(engine.series(), &copy);
}
