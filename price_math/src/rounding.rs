//! Decimal rounding of prices

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Tie-breaking rule applied when a value sits exactly halfway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// 2.345 -> 2.35, -2.345 -> -2.35
    #[default]
    HalfAwayFromZero,
    /// Banker's rounding: 2.345 -> 2.34, 2.355 -> 2.36
    HalfEven,
}

/// Largest number of decimal places accepted by [`round_to`]
pub const MAX_DECIMALS: u32 = 10;

/// Round `value` to `decimals` decimal places using `mode`
///
/// The value is scaled by `10^decimals` first, so ties are judged on the
/// scaled binary value.
pub fn round_to(value: f64, decimals: u32, mode: RoundingMode) -> Result<f64> {
    if !value.is_finite() {
        return Err(MathError::InvalidInput(format!(
            "Cannot round non-finite value {}",
            value
        )));
    }

    if decimals > MAX_DECIMALS {
        return Err(MathError::InvalidInput(format!(
            "At most {} decimal places are supported, got {}",
            MAX_DECIMALS, decimals
        )));
    }

    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    let rounded = match mode {
        RoundingMode::HalfAwayFromZero => scaled.round(),
        RoundingMode::HalfEven => scaled.round_ties_even(),
    };

    Ok(rounded / factor)
}
