//! Numerical inversion of a forward transform.
//!
//! Solves `forward(p) = target` for the pixel vector `p` by damped least
//! squares (Levenberg-Marquardt) with a forward-difference Jacobian. Each
//! point is independent; a point that does not converge comes back as `NaN`.

use nalgebra::{DMatrix, DVector};
use tracing::trace;

use crate::bounds::BoundingBox;

const MIN_DAMPING: f64 = 1e-12;
const MAX_DAMPING: f64 = 1e12;
const MAX_EXHAUSTIVE_SEED_AXES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InverseConfig {
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Relative step of the finite-difference Jacobian.
    pub jacobian_step: f64,
    /// Retry from further seeds when the first one fails.
    pub multi_start: bool,
}

impl Default for InverseConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            max_iterations: 100,
            jacobian_step: 1e-6,
            multi_start: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub point: Vec<f64>,
    pub converged: bool,
    pub iterations: usize,
}

impl Solution {
    fn failed(n: usize, iterations: usize) -> Self {
        Self {
            point: vec![f64::NAN; n],
            converged: false,
            iterations,
        }
    }
}

/// Starting points: the bounding-box centre, then (with `multi_start`) its
/// quarter points. Without a box the only seed is the origin.
pub fn seeds(bounds: Option<&BoundingBox>, n: usize, multi_start: bool) -> Vec<Vec<f64>> {
    let Some(bbox) = bounds else {
        return vec![vec![0.0; n]];
    };

    let mut seeds = vec![bbox.center()];
    if !multi_start {
        return seeds;
    }

    let quarters: Vec<[f64; 2]> = bbox
        .intervals()
        .iter()
        .map(|i| {
            let width = i.upper() - i.lower();
            [i.lower() + 0.25 * width, i.lower() + 0.75 * width]
        })
        .collect();

    if n <= MAX_EXHAUSTIVE_SEED_AXES {
        for combo in 0..(1usize << n) {
            seeds.push(
                quarters
                    .iter()
                    .enumerate()
                    .map(|(axis, q)| q[(combo >> axis) & 1])
                    .collect(),
            );
        }
    } else {
        seeds.push(quarters.iter().map(|q| q[0]).collect());
        seeds.push(quarters.iter().map(|q| q[1]).collect());
    }
    seeds
}

/// Finds `p` with `forward(p) ≈ target`, trying each seed in turn.
///
/// Iterates are clipped into `bounds` when given. A non-finite target, or a
/// forward model that returns non-finite values along the way, fails the
/// attempt rather than raising.
pub fn solve<F>(
    forward: F,
    target: &[f64],
    seeds: &[Vec<f64>],
    bounds: Option<&BoundingBox>,
    config: &InverseConfig,
) -> Solution
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let n = seeds.first().map_or(0, Vec::len);
    if n == 0 || target.iter().any(|t| !t.is_finite()) {
        return Solution::failed(n, 0);
    }

    let attempts = if config.multi_start { seeds.len() } else { 1 };
    let mut iterations = 0;
    for (attempt, seed) in seeds.iter().take(attempts).enumerate() {
        let (point, used) = levenberg_marquardt(&forward, target, seed, bounds, config);
        iterations += used;
        if let Some(point) = point {
            trace!(attempt, iterations, "inverse converged");
            return Solution {
                point,
                converged: true,
                iterations,
            };
        }
        trace!(attempt, ?seed, "inverse attempt failed, restarting");
    }
    Solution::failed(n, iterations)
}

fn levenberg_marquardt<F>(
    forward: &F,
    target: &[f64],
    seed: &[f64],
    bounds: Option<&BoundingBox>,
    config: &InverseConfig,
) -> (Option<Vec<f64>>, usize)
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let clip = |p: Vec<f64>| match bounds {
        Some(bbox) => bbox.clip(&p),
        None => p,
    };

    let mut p = clip(seed.to_vec());
    let Some(mut r) = residual(forward, &p, target) else {
        return (None, 0);
    };
    let mut cost = sum_sq(&r);
    let mut damping = 1e-3;

    for iteration in 0..=config.max_iterations {
        let Some(jac) = jacobian(forward, &p, &r, target, config.jacobian_step) else {
            return (None, iteration);
        };
        if within_tolerance(&jac, &r, &p, target, config.tolerance) {
            return (Some(p), iteration);
        }
        if iteration == config.max_iterations {
            break;
        }

        loop {
            let Some(delta) = damped_step(&jac, &r, damping) else {
                return (None, iteration);
            };
            let candidate = clip(p.iter().zip(delta.iter()).map(|(x, d)| x + d).collect());
            match residual(forward, &candidate, target) {
                Some(rc) if sum_sq(&rc) < cost => {
                    p = candidate;
                    r = rc;
                    cost = sum_sq(&r);
                    damping = (damping / 10.0).max(MIN_DAMPING);
                    break;
                }
                _ => {
                    damping *= 10.0;
                    if damping > MAX_DAMPING {
                        return (None, iteration);
                    }
                }
            }
        }
    }
    (None, config.max_iterations)
}

/// Each world residual must be no larger than what a pixel error of
/// `tolerance * (1 + max|p|)` on every axis would produce through the local
/// Jacobian, plus rounding of the target itself. Keeps the test independent
/// of the magnitude of the world units.
fn within_tolerance(
    jacobian: &DMatrix<f64>,
    r: &[f64],
    p: &[f64],
    target: &[f64],
    tolerance: f64,
) -> bool {
    let pixel_tolerance = tolerance * (1.0 + max_abs(p));
    r.iter().zip(target).enumerate().all(|(i, (res, t))| {
        let sensitivity: f64 = jacobian.row(i).iter().map(|d| d.abs()).sum();
        res.abs() <= pixel_tolerance * sensitivity + 4.0 * f64::EPSILON * t.abs()
    })
}

fn residual<F>(forward: &F, p: &[f64], target: &[f64]) -> Option<Vec<f64>>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let out = forward(p);
    if out.len() != target.len() || out.iter().any(|v| !v.is_finite()) {
        return None;
    }
    Some(out.iter().zip(target).map(|(o, t)| o - t).collect())
}

fn jacobian<F>(
    forward: &F,
    p: &[f64],
    r: &[f64],
    target: &[f64],
    step: f64,
) -> Option<DMatrix<f64>>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let mut jac = DMatrix::zeros(r.len(), p.len());
    let mut probe = p.to_vec();
    for j in 0..p.len() {
        let mut h = step * p[j].abs().max(1.0);
        probe[j] = p[j] + h;
        // at the edge of the model's domain, difference backwards
        let rj = match residual(forward, &probe, target) {
            Some(rj) => rj,
            None => {
                h = -h;
                probe[j] = p[j] + h;
                residual(forward, &probe, target)?
            }
        };
        probe[j] = p[j];
        for i in 0..r.len() {
            jac[(i, j)] = (rj[i] - r[i]) / h;
        }
    }
    Some(jac)
}

/// Solves `[J; sqrt(damping * D)] delta = [-r; 0]` in the least-squares
/// sense, `D` being the diagonal of `J^T J` (Marquardt scaling), so the
/// damping is relative to the Jacobian whatever the world units.
fn damped_step(jacobian: &DMatrix<f64>, r: &[f64], damping: f64) -> Option<DVector<f64>> {
    let (m, n) = jacobian.shape();
    let diagonal: Vec<f64> = (0..n)
        .map(|j| (damping * jacobian.column(j).norm_squared()).sqrt())
        .collect();
    let a = DMatrix::from_fn(m + n, n, |i, j| {
        if i < m {
            jacobian[(i, j)]
        } else if i - m == j {
            diagonal[j]
        } else {
            0.0
        }
    });
    let b = DVector::from_fn(m + n, |i, _| if i < m { -r[i] } else { 0.0 });
    let svd = a.svd(true, true);
    let cutoff = svd.singular_values.max() * f64::EPSILON * (m + n) as f64;
    svd.solve(&b, cutoff).ok()
}

fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(0.0_f64, |m, x| m.max(x.abs()))
}

fn sum_sq(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum()
}
