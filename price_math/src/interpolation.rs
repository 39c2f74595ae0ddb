//! Piecewise-linear interpolation
//!
//! Connects consecutive control points with straight segments. Queries
//! outside the control range continue the first or last segment with
//! [`LinearInterpolator::evaluate`], or hold the edge value with
//! [`LinearInterpolator::evaluate_clamped`].

use crate::{MathError, Result};

/// Piecewise-linear function over strictly increasing knots
#[derive(Debug, Clone, PartialEq)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearInterpolator {
    /// Create a new interpolator from knot abscissae and values
    ///
    /// `xs` must be strictly increasing and both slices must hold at least
    /// two finite values of equal length.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(MathError::InvalidInput(format!(
                "Knot count ({}) doesn't match value count ({})",
                xs.len(),
                ys.len()
            )));
        }

        if xs.len() < 2 {
            return Err(MathError::InsufficientData(
                "Linear interpolation needs at least 2 points".to_string(),
            ));
        }

        if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Knots and values must be finite".to_string(),
            ));
        }

        if let Some(i) = xs.windows(2).position(|w| w[1] <= w[0]) {
            return Err(MathError::InvalidInput(format!(
                "Knots must be strictly increasing (x[{}]={} >= x[{}]={})",
                i,
                xs[i],
                i + 1,
                xs[i + 1]
            )));
        }

        Ok(Self { xs, ys })
    }

    /// Evaluate the function at `x`, extrapolating with the nearest segment
    pub fn evaluate(&self, x: f64) -> f64 {
        let n = self.xs.len();

        // Index of the segment [xs[i], xs[i + 1]] used for this query
        let i = match self.xs.partition_point(|&k| k <= x) {
            0 => 0,
            p if p >= n => n - 2,
            p => p - 1,
        };

        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);

        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }

    /// Evaluate the function at `x`, holding the first or last knot value
    /// outside the domain
    pub fn evaluate_clamped(&self, x: f64) -> f64 {
        let (lo, hi) = self.domain();
        self.evaluate(x.clamp(lo, hi))
    }

    /// Domain covered by the knots
    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }
}
