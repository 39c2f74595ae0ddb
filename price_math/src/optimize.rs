//! Box-constrained minimisation
//!
//! Contains:
//! - Grid search over a bounded box (used to seed the simplex)
//! - Nelder-Mead simplex with projection onto the box

use crate::{MathError, Result};
use std::cmp::Ordering;

/// Inclusive per-dimension bounds `(lower, upper)`
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    limits: Vec<(f64, f64)>,
}

impl Bounds {
    /// Create bounds from `(lower, upper)` pairs
    pub fn new(limits: Vec<(f64, f64)>) -> Result<Self> {
        if limits.is_empty() {
            return Err(MathError::InvalidInput(
                "Bounds need at least one dimension".to_string(),
            ));
        }

        for (i, &(lo, hi)) in limits.iter().enumerate() {
            if !lo.is_finite() || !hi.is_finite() || lo > hi {
                return Err(MathError::InvalidInput(format!(
                    "Invalid bounds for dimension {}: [{}, {}]",
                    i, lo, hi
                )));
            }
        }

        Ok(Self { limits })
    }

    /// The unit hypercube `[0, 1]^dim`
    pub fn unit(dim: usize) -> Result<Self> {
        Self::new(vec![(0.0, 1.0); dim])
    }

    /// Number of dimensions
    pub fn dim(&self) -> usize {
        self.limits.len()
    }

    /// Per-dimension limits
    pub fn limits(&self) -> &[(f64, f64)] {
        &self.limits
    }

    /// Project a point onto the box
    pub fn clamp(&self, point: &mut [f64]) {
        for (v, &(lo, hi)) in point.iter_mut().zip(&self.limits) {
            *v = v.clamp(lo, hi);
        }
    }

    /// Whether a point lies inside the box
    pub fn contains(&self, point: &[f64]) -> bool {
        point.len() == self.dim()
            && point
                .iter()
                .zip(&self.limits)
                .all(|(&v, &(lo, hi))| v >= lo && v <= hi)
    }
}

/// Settings for the Nelder-Mead simplex
#[derive(Debug, Clone, PartialEq)]
pub struct SimplexConfig {
    /// Maximum number of iterations
    pub max_iter: usize,
    /// Initial step along each axis, as a fraction of the bound width
    pub initial_step: f64,
    /// Convergence threshold on simplex diameter
    pub diameter_tol: f64,
    /// Convergence threshold on objective value spread
    pub fvalue_tol: f64,
}

impl Default for SimplexConfig {
    fn default() -> Self {
        Self {
            max_iter: 500,
            initial_step: 0.1,
            diameter_tol: 1e-8,
            fvalue_tol: 1e-10,
        }
    }
}

/// Outcome of a minimisation
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeResult {
    /// Best point found
    pub x: Vec<f64>,
    /// Objective value at `x`
    pub fval: f64,
    /// Iterations (or evaluations, for grid search) performed
    pub iterations: usize,
    /// Whether a convergence criterion was met before the iteration cap
    pub converged: bool,
}

// NaN never wins a comparison
fn sanitize(v: f64) -> f64 {
    if v.is_nan() {
        f64::INFINITY
    } else {
        v
    }
}

/// Evaluate `objective` on a regular grid of `steps` points per dimension
///
/// Returns the best grid point. Ties keep the first point in lexicographic
/// order, so the result is deterministic.
pub fn grid_search<F>(objective: F, bounds: &Bounds, steps: usize) -> Result<OptimizeResult>
where
    F: Fn(&[f64]) -> f64,
{
    if steps < 2 {
        return Err(MathError::InvalidInput(
            "Grid search needs at least 2 steps per dimension".to_string(),
        ));
    }

    let dim = bounds.dim();
    let total = steps
        .checked_pow(dim as u32)
        .ok_or_else(|| MathError::InvalidInput("Grid is too large".to_string()))?;

    let mut counter = vec![0usize; dim];
    let mut point = vec![0.0; dim];
    let mut best_x = Vec::new();
    let mut best_f = f64::INFINITY;

    for _ in 0..total {
        for (d, &(lo, hi)) in bounds.limits().iter().enumerate() {
            point[d] = lo + (hi - lo) * counter[d] as f64 / (steps - 1) as f64;
        }

        let f = sanitize(objective(point.as_slice()));
        if best_x.is_empty() || f < best_f {
            best_f = f;
            best_x = point.clone();
        }

        // Odometer increment, last dimension fastest
        for d in (0..dim).rev() {
            counter[d] += 1;
            if counter[d] < steps {
                break;
            }
            counter[d] = 0;
        }
    }

    Ok(OptimizeResult {
        x: best_x,
        fval: best_f,
        iterations: total,
        converged: true,
    })
}

/// Minimise `objective` with the Nelder-Mead simplex, projected onto `bounds`
///
/// Starts from `x0` and builds the initial simplex by stepping
/// `config.initial_step` of each bound's width along every axis (stepping
/// inwards when the start sits on the upper bound).
pub fn nelder_mead<F>(
    objective: F,
    x0: &[f64],
    bounds: &Bounds,
    config: &SimplexConfig,
) -> Result<OptimizeResult>
where
    F: Fn(&[f64]) -> f64,
{
    let dim = bounds.dim();
    if x0.len() != dim {
        return Err(MathError::InvalidInput(format!(
            "Start point has {} coordinates, bounds have {}",
            x0.len(),
            dim
        )));
    }

    let eval = |p: &[f64]| sanitize(objective(p));

    let mut start = x0.to_vec();
    bounds.clamp(&mut start);

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
    simplex.push(start.clone());
    for (d, &(lo, hi)) in bounds.limits().iter().enumerate() {
        let step = (hi - lo) * config.initial_step;
        let mut vertex = start.clone();
        vertex[d] = if vertex[d] + step <= hi {
            vertex[d] + step
        } else {
            vertex[d] - step
        };
        simplex.push(vertex);
    }
    let mut f_vals: Vec<f64> = simplex.iter().map(|v| eval(v.as_slice())).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        // Sort by objective value
        let mut order: Vec<usize> = (0..=dim).collect();
        order.sort_by(|&a, &b| f_vals[a].partial_cmp(&f_vals[b]).unwrap_or(Ordering::Equal));
        simplex = order.iter().map(|&i| simplex[i].clone()).collect();
        f_vals = order.iter().map(|&i| f_vals[i]).collect();

        let diameter = simplex
            .iter()
            .skip(1)
            .map(|v| distance(v, &simplex[0]))
            .fold(0.0_f64, f64::max);
        let f_spread = f_vals[dim] - f_vals[0];

        if diameter < config.diameter_tol || f_spread.abs() < config.fvalue_tol {
            converged = true;
            break;
        }

        iterations += 1;

        // Centroid of all but the worst vertex
        let mut centroid = vec![0.0; dim];
        for vertex in &simplex[..dim] {
            for (c, v) in centroid.iter_mut().zip(vertex) {
                *c += v / dim as f64;
            }
        }

        let worst = simplex[dim].clone();
        let along = |t: f64| -> Vec<f64> {
            let mut p: Vec<f64> = centroid
                .iter()
                .zip(&worst)
                .map(|(c, w)| c + t * (c - w))
                .collect();
            bounds.clamp(&mut p);
            p
        };

        // Reflection
        let reflected = along(1.0);
        let fr = eval(reflected.as_slice());

        if fr < f_vals[0] {
            // Expansion
            let expanded = along(2.0);
            let fe = eval(expanded.as_slice());
            if fe < fr {
                simplex[dim] = expanded;
                f_vals[dim] = fe;
            } else {
                simplex[dim] = reflected;
                f_vals[dim] = fr;
            }
        } else if fr < f_vals[dim - 1] {
            simplex[dim] = reflected;
            f_vals[dim] = fr;
        } else {
            // Outside contraction when the reflection improved on the worst
            // vertex, inside contraction otherwise
            let (contracted, bar) = if fr < f_vals[dim] {
                (along(0.5), fr)
            } else {
                (along(-0.5), f_vals[dim])
            };
            let fc = eval(contracted.as_slice());

            if fc < bar {
                simplex[dim] = contracted;
                f_vals[dim] = fc;
            } else {
                // Shrink toward best vertex
                let best = simplex[0].clone();
                for j in 1..=dim {
                    for (v, b) in simplex[j].iter_mut().zip(&best) {
                        *v = b + 0.5 * (*v - b);
                    }
                    f_vals[j] = eval(simplex[j].as_slice());
                }
            }
        }
    }

    let best = (0..=dim)
        .min_by(|&a, &b| f_vals[a].partial_cmp(&f_vals[b]).unwrap_or(Ordering::Equal))
        .unwrap_or(0);

    if !f_vals[best].is_finite() {
        return Err(MathError::CalculationError(
            "Objective is not finite anywhere on the simplex".to_string(),
        ));
    }

    Ok(OptimizeResult {
        x: simplex[best].clone(),
        fval: f_vals[best],
        iterations,
        converged,
    })
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
