//! Additive Holt-Winters (triple exponential) smoothing
//!
//! # Algorithm
//!
//! ```text
//! Level:    L_t = α (y_t - S_{t-m}) + (1 - α)(L_{t-1} + T_{t-1})
//! Trend:    T_t = β (L_t - L_{t-1}) + (1 - β) T_{t-1}
//! Seasonal: S_t = γ (y_t - L_t) + (1 - γ) S_{t-m}
//! Forecast: F_{n+h} = L_n + h T_n + S_{n+h-m}   (seasonal index wrapped on m)
//! ```
//!
//! α, β and γ are picked from `[0, 1]` by minimising the in-sample sum of
//! squared one-step-ahead errors: a coarse grid search seeds a bounded
//! Nelder-Mead refinement.
//!
//! Initial state comes from the first two cycles: the trend is the change
//! between the two cycle means spread over one cycle, the level is the first
//! cycle mean walked back to the step before the first observation, and each
//! seasonal offset is the first-cycle observation minus that trend line.

use crate::config::{EngineConfig, OptimizerConfig};
use crate::data::TimeSeries;
use crate::error::{EstimationError, Result};
use crate::models::{ForecastModel, ForecastSeries, TrainedForecastModel};
use crate::utils::future_month_ends;
use chrono::NaiveDate;
use price_math::{grid_search, nelder_mead, Bounds};
use serde::{Deserialize, Serialize};

/// Level, trend and seasonal smoothing constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingParams {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl SmoothingParams {
    /// Create smoothing constants, each within `[0, 1]`
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Result<Self> {
        for (name, value) in [("alpha", alpha), ("beta", beta), ("gamma", gamma)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EstimationError::InvalidParameter(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }

        Ok(Self { alpha, beta, gamma })
    }

    fn from_slice(p: &[f64]) -> Self {
        Self {
            alpha: p[0],
            beta: p[1],
            gamma: p[2],
        }
    }
}

/// Starting level, trend and one cycle of seasonal offsets
#[derive(Debug, Clone)]
struct InitialState {
    level: f64,
    trend: f64,
    seasonal: Vec<f64>,
}

impl InitialState {
    fn estimate(y: &[f64], m: usize) -> Self {
        let mean = |s: &[f64]| s.iter().sum::<f64>() / s.len() as f64;
        let first = mean(&y[..m]);
        let second = mean(&y[m..2 * m]);

        let trend = (second - first) / m as f64;
        // The first cycle mean sits at step (m - 1) / 2; walk back to step -1
        let level = first - trend * (m as f64 + 1.0) / 2.0;
        let seasonal = (0..m)
            .map(|i| y[i] - (level + trend * (i as f64 + 1.0)))
            .collect();

        Self {
            level,
            trend,
            seasonal,
        }
    }
}

/// Final smoothing state after one pass over the data
#[derive(Debug, Clone)]
struct SmoothingPass {
    level: f64,
    trend: f64,
    /// Seasonal offsets for the next `m` steps, next step first
    cycle: Vec<f64>,
    fitted: Vec<f64>,
    sse: f64,
}

fn smooth(y: &[f64], m: usize, init: &InitialState, p: &SmoothingParams) -> SmoothingPass {
    let n = y.len();
    let mut level = init.level;
    let mut trend = init.trend;

    // seasonal[t] is S_{t-m} for observation t
    let mut seasonal = Vec::with_capacity(n + m);
    seasonal.extend_from_slice(&init.seasonal);

    let mut fitted = Vec::with_capacity(n);
    let mut sse = 0.0;

    for (t, &obs) in y.iter().enumerate() {
        let s_prev = seasonal[t];
        let prediction = level + trend + s_prev;
        fitted.push(prediction);
        sse += (obs - prediction).powi(2);

        let new_level = p.alpha * (obs - s_prev) + (1.0 - p.alpha) * (level + trend);
        let new_trend = p.beta * (new_level - level) + (1.0 - p.beta) * trend;
        seasonal.push(p.gamma * (obs - new_level) + (1.0 - p.gamma) * s_prev);

        level = new_level;
        trend = new_trend;
    }

    SmoothingPass {
        level,
        trend,
        cycle: seasonal.split_off(n),
        fitted,
        sse,
    }
}

/// Additive Holt-Winters model configuration
#[derive(Debug, Clone)]
pub struct HoltWinters {
    name: String,
    season_length: usize,
    min_observations: usize,
    params: Option<SmoothingParams>,
    optimizer: OptimizerConfig,
}

impl HoltWinters {
    /// Create a model with `season_length` steps per cycle, requiring two
    /// full cycles of data
    pub fn new(season_length: usize) -> Result<Self> {
        if season_length < 2 {
            return Err(EstimationError::InvalidParameter(format!(
                "Season length must be at least 2, got {}",
                season_length
            )));
        }

        Ok(Self {
            name: format!("Holt-Winters additive (m={})", season_length),
            season_length,
            min_observations: 2 * season_length,
            params: None,
            optimizer: OptimizerConfig::default(),
        })
    }

    /// Create a model from engine settings
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.season_length)?
            .with_min_observations(config.min_seasonal_observations())
            .with_optimizer(config.optimizer.clone()))
    }

    /// Use fixed smoothing constants instead of optimising them
    pub fn with_params(mut self, params: SmoothingParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Raise the minimum training length; never below two cycles
    pub fn with_min_observations(mut self, min_observations: usize) -> Self {
        self.min_observations = min_observations.max(2 * self.season_length);
        self
    }

    pub fn season_length(&self) -> usize {
        self.season_length
    }

    pub fn min_observations(&self) -> usize {
        self.min_observations
    }

    fn choose_params(&self, y: &[f64], init: &InitialState) -> Result<(SmoothingParams, bool)> {
        if let Some(params) = self.params {
            return Ok((params, true));
        }

        let m = self.season_length;
        let sse = |p: &[f64]| smooth(y, m, init, &SmoothingParams::from_slice(p)).sse;
        let bounds = Bounds::unit(3)?;

        let seed = grid_search(sse, &bounds, self.optimizer.grid_steps)?;
        tracing::debug!(
            alpha = seed.x[0],
            beta = seed.x[1],
            gamma = seed.x[2],
            sse = seed.fval,
            evaluations = seed.iterations,
            "grid search seed"
        );

        let refined = nelder_mead(sse, &seed.x, &bounds, &self.optimizer.simplex())?;
        if !refined.converged {
            tracing::warn!(
                iterations = refined.iterations,
                sse = refined.fval,
                "smoothing constant search stopped at the iteration cap"
            );
        }

        let best = if refined.fval <= seed.fval {
            &refined.x
        } else {
            &seed.x
        };

        Ok((SmoothingParams::from_slice(best), refined.converged))
    }
}

impl ForecastModel for HoltWinters {
    type Trained = FittedSeasonalModel;

    fn train(&self, series: &TimeSeries) -> Result<Self::Trained> {
        if series.len() < self.min_observations {
            return Err(EstimationError::InsufficientData {
                context: "seasonal model",
                required: self.min_observations,
                actual: series.len(),
            });
        }
        series.ensure_monthly()?;

        let y = series.prices();
        let m = self.season_length;
        let init = InitialState::estimate(&y, m);
        let (params, converged) = self.choose_params(&y, &init)?;
        let pass = smooth(&y, m, &init, &params);

        tracing::debug!(
            alpha = params.alpha,
            beta = params.beta,
            gamma = params.gamma,
            level = pass.level,
            trend = pass.trend,
            sse = pass.sse,
            "fitted seasonal model"
        );

        Ok(FittedSeasonalModel {
            name: self.name.clone(),
            params,
            level: pass.level,
            trend: pass.trend,
            seasonal: pass.cycle,
            fitted: pass.fitted,
            sse: pass.sse,
            converged,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Holt-Winters state after training
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FittedSeasonalModel {
    name: String,
    params: SmoothingParams,
    level: f64,
    trend: f64,
    /// Offsets for the next cycle, first forecast step first
    seasonal: Vec<f64>,
    fitted: Vec<f64>,
    sse: f64,
    converged: bool,
}

impl FittedSeasonalModel {
    pub fn params(&self) -> SmoothingParams {
        self.params
    }

    /// Level after the last observation
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Trend after the last observation
    pub fn trend(&self) -> f64 {
        self.trend
    }

    /// One cycle of seasonal offsets, aligned so index 0 applies to the
    /// first forecast step
    pub fn seasonal(&self) -> &[f64] {
        &self.seasonal
    }

    pub fn season_length(&self) -> usize {
        self.seasonal.len()
    }

    /// In-sample sum of squared one-step-ahead errors
    pub fn sse(&self) -> f64 {
        self.sse
    }

    /// Whether the smoothing-constant search converged
    pub fn converged(&self) -> bool {
        self.converged
    }
}

impl TrainedForecastModel for FittedSeasonalModel {
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        if horizon == 0 {
            return Err(EstimationError::InvalidParameter(
                "Forecast horizon must be at least 1".to_string(),
            ));
        }

        let m = self.seasonal.len();
        Ok((1..=horizon)
            .map(|h| self.level + h as f64 * self.trend + self.seasonal[(h - 1) % m])
            .collect())
    }

    fn fitted_values(&self) -> &[f64] {
        &self.fitted
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Seasonal model fitted once, with its default-horizon forecast cached
#[derive(Debug, Clone)]
pub struct SeasonalForecaster {
    model: FittedSeasonalModel,
    last_date: NaiveDate,
    cached: ForecastSeries,
}

impl SeasonalForecaster {
    /// Fit the model to `series` and project `config.forecast_horizon` months
    pub fn fit(series: &TimeSeries, config: &EngineConfig) -> Result<Self> {
        let model = HoltWinters::from_config(config)?.train(series)?;
        Self::from_model(model, series.last().date, config.forecast_horizon)
    }

    /// Wrap an already trained model whose data ended on `last_date`
    pub fn from_model(model: FittedSeasonalModel, last_date: NaiveDate, horizon: usize) -> Result<Self> {
        let cached = project(&model, last_date, horizon)?;
        Ok(Self {
            model,
            last_date,
            cached,
        })
    }

    /// Forecast `periods` months past the last observation
    ///
    /// The fitted horizon is served from the cache; other horizons are
    /// projected from the same fitted state, so results never vary between
    /// calls.
    pub fn forecast(&self, periods: usize) -> Result<ForecastSeries> {
        if periods == self.cached.len() {
            return Ok(self.cached.clone());
        }
        project(&self.model, self.last_date, periods)
    }

    /// The cached forecast for the configured horizon
    pub fn forecast_series(&self) -> &ForecastSeries {
        &self.cached
    }

    pub fn model(&self) -> &FittedSeasonalModel {
        &self.model
    }
}

fn project(model: &FittedSeasonalModel, last_date: NaiveDate, periods: usize) -> Result<ForecastSeries> {
    let values = model.forecast(periods)?;
    ForecastSeries::new(future_month_ends(last_date, periods)?, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::month_end_after;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly(values: Vec<f64>) -> TimeSeries {
        let start = ymd(2020, 9, 30);
        let dates = (0..values.len())
            .map(|i| month_end_after(start, i as u32 + 1).unwrap())
            .collect();
        TimeSeries::from_parts(dates, values).unwrap()
    }

    fn seasonal_value(t: usize) -> f64 {
        10.0 + 0.1 * t as f64 + 2.0 * (2.0 * PI * t as f64 / 12.0).sin()
    }

    #[test]
    fn test_exact_additive_series_is_reproduced() {
        let series = monthly((0..36).map(seasonal_value).collect());
        let model = HoltWinters::new(12).unwrap().train(&series).unwrap();

        assert!(model.sse() < 1e-12);
        let forecast = model.forecast(12).unwrap();
        for (h, value) in forecast.iter().enumerate() {
            assert_abs_diff_eq!(*value, seasonal_value(36 + h), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_recurrences_with_fixed_params() {
        let values: Vec<f64> = (0..24)
            .map(|t| seasonal_value(t) + 0.3 * (1.7 * t as f64).cos())
            .collect();
        let series = monthly(values.clone());
        let params = SmoothingParams::new(0.4, 0.2, 0.3).unwrap();
        let model = HoltWinters::new(12)
            .unwrap()
            .with_params(params)
            .train(&series)
            .unwrap();

        let init = InitialState::estimate(&values, 12);
        let (mut level, mut trend) = (init.level, init.trend);
        let mut seasonal = init.seasonal.clone();
        for (t, &y) in values.iter().enumerate() {
            let s_prev = seasonal[t % 12];
            let l = 0.4 * (y - s_prev) + 0.6 * (level + trend);
            let b = 0.2 * (l - level) + 0.8 * trend;
            seasonal[t % 12] = 0.3 * (y - l) + 0.7 * s_prev;
            level = l;
            trend = b;
        }

        assert_abs_diff_eq!(model.level(), level, epsilon = 1e-12);
        assert_abs_diff_eq!(model.trend(), trend, epsilon = 1e-12);
        // 24 observations: the next step reuses the slot of observation 0
        for i in 0..12 {
            assert_abs_diff_eq!(model.seasonal()[i], seasonal[i], epsilon = 1e-12);
        }

        let forecast = model.forecast(14).unwrap();
        assert_abs_diff_eq!(forecast[0], level + trend + seasonal[0], epsilon = 1e-12);
        assert_abs_diff_eq!(forecast[12], level + 13.0 * trend + seasonal[0], epsilon = 1e-12);
    }

    #[test]
    fn test_optimised_params_beat_fixed_guess() {
        let values: Vec<f64> = (0..48)
            .map(|t| seasonal_value(t) + 0.4 * (7.3 * t as f64).sin())
            .collect();
        let series = monthly(values);

        let optimised = HoltWinters::new(12).unwrap().train(&series).unwrap();
        let fixed = HoltWinters::new(12)
            .unwrap()
            .with_params(SmoothingParams::new(0.5, 0.5, 0.5).unwrap())
            .train(&series)
            .unwrap();

        let p = optimised.params();
        for v in [p.alpha, p.beta, p.gamma] {
            assert!((0.0..=1.0).contains(&v));
        }
        assert!(optimised.sse() <= fixed.sse());
        assert_eq!(optimised.fitted_values().len(), 48);
    }

    #[test]
    fn test_requires_two_cycles() {
        let series = monthly((0..23).map(seasonal_value).collect());
        let err = HoltWinters::new(12).unwrap().train(&series).unwrap_err();
        assert!(matches!(
            err,
            EstimationError::InsufficientData {
                required: 24,
                actual: 23,
                ..
            }
        ));
    }

    #[test]
    fn test_requires_monthly_cadence() {
        let dates: Vec<NaiveDate> = (0..24)
            .map(|i| ymd(2020, 1, 1) + chrono::Duration::days(7 * i))
            .collect();
        let series = TimeSeries::from_parts(dates, (0..24).map(seasonal_value).collect()).unwrap();
        assert!(matches!(
            HoltWinters::new(12).unwrap().train(&series),
            Err(EstimationError::InvalidSeries(_))
        ));
    }

    #[test]
    fn test_invalid_params() {
        assert!(SmoothingParams::new(1.1, 0.5, 0.5).is_err());
        assert!(SmoothingParams::new(0.5, -0.1, 0.5).is_err());
        assert!(SmoothingParams::new(0.5, 0.5, f64::NAN).is_err());
        assert!(SmoothingParams::new(0.0, 1.0, 0.0).is_ok());
        assert!(HoltWinters::new(1).is_err());
    }

    #[test]
    fn test_forecaster_caches_and_dates() {
        let series = monthly((0..48).map(|t| seasonal_value(t) + 0.2 * (3.1 * t as f64).cos()).collect());
        let forecaster = SeasonalForecaster::fit(&series, &EngineConfig::default()).unwrap();

        let first = forecaster.forecast(12).unwrap();
        let second = forecaster.forecast(12).unwrap();
        assert_eq!(first, second);
        assert_eq!(&first, forecaster.forecast_series());

        assert_eq!(first.len(), 12);
        assert_eq!(series.last().date, ymd(2024, 9, 30));
        assert_eq!(first.first().date, ymd(2024, 10, 31));
        assert_eq!(first.last().date, ymd(2025, 9, 30));

        let short = forecaster.forecast(6).unwrap();
        assert_eq!(short.points(), &first.points()[..6]);

        assert!(matches!(
            forecaster.forecast(0),
            Err(EstimationError::InvalidParameter(_))
        ));
    }
}
