//! In-sample accuracy of a fitted model

use crate::error::{EstimationError, Result};
use serde::Serialize;

/// Error metrics for fitted values against observed values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitAccuracy {
    /// Sum of squared errors
    pub sse: f64,
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error, over non-zero observations
    pub mape: f64,
}

/// Calculate accuracy metrics for fitted vs actual values
pub fn fit_accuracy(fitted: &[f64], actual: &[f64]) -> Result<FitAccuracy> {
    if fitted.len() != actual.len() || fitted.is_empty() {
        return Err(EstimationError::InvalidParameter(
            "Fitted and actual values must have the same non-zero length".to_string(),
        ));
    }

    let n = fitted.len() as f64;

    let errors: Vec<f64> = fitted
        .iter()
        .zip(actual.iter())
        .map(|(&f, &a)| a - f)
        .collect();

    let sse = errors.iter().map(|e| e.powi(2)).sum::<f64>();
    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let mse = sse / n;
    let rmse = mse.sqrt();

    let nonzero: Vec<f64> = actual
        .iter()
        .zip(errors.iter())
        .filter(|(&a, _)| a != 0.0)
        .map(|(&a, &e)| (e / a).abs() * 100.0)
        .collect();
    let mape = if nonzero.is_empty() {
        0.0
    } else {
        nonzero.iter().sum::<f64>() / nonzero.len() as f64
    };

    Ok(FitAccuracy {
        sse,
        mae,
        mse,
        rmse,
        mape,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_regression_metrics() {
        let actual = vec![10.0, 20.0, 30.0, 40.0, 50.0];
        let fitted = vec![12.0, 18.0, 33.0, 37.0, 52.0];

        let acc = fit_accuracy(&fitted, &actual).unwrap();
        assert_abs_diff_eq!(acc.sse, 30.0, epsilon = 1e-12);
        assert_abs_diff_eq!(acc.mae, 2.4, epsilon = 1e-12);
        assert_abs_diff_eq!(acc.mse, 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(acc.rmse, 6.0_f64.sqrt(), epsilon = 1e-12);
        // 20% + 10% + 10% + 7.5% + 4%
        assert_abs_diff_eq!(acc.mape, 51.5 / 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_actuals_skipped_in_mape() {
        let acc = fit_accuracy(&[1.0, 11.0], &[0.0, 10.0]).unwrap();
        assert_abs_diff_eq!(acc.mape, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(fit_accuracy(&[1.0], &[1.0, 2.0]).is_err());
        assert!(fit_accuracy(&[], &[]).is_err());
    }
}
