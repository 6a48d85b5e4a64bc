// ─────────────────────────────────────────────────────────────────────
// Flux Rope Core — Nonlinear Least Squares
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Levenberg-Marquardt minimisation of `½‖r(x)‖²`.
//!
//! The Jacobian of `r` is approximated by forward differences. Each step
//! solves the damped normal equations
//!   (JᵀJ + λ·diag(JᵀJ)) δ = −Jᵀr
//! and λ is decreased after an accepted step, increased after a rejected one.

use crate::linalg::{norm_inf, norm_l2, normal_equations, solve_dense};
use ndarray::{Array1, Array2};
use rope_types::config::SolverConfig;
use rope_types::error::{RopeError, RopeResult};
use tracing::{trace, warn};

const MIN_DIAGONAL: f64 = 1e-12;
const MIN_DAMPING: f64 = 1e-15;
const MAX_DAMPING: f64 = 1e15;
const DAMPING_FACTOR: f64 = 10.0;
const MAX_DAMPING_TRIALS: usize = 40;

/// Why the solve stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// ‖r‖ fell below `tolerance`.
    Residual,
    /// Relative cost reduction fell below `cost_tolerance`.
    CostReduction,
    /// Relative step length fell below `step_tolerance`.
    StepSize,
    /// ‖Jᵀr‖∞ fell below `gradient_tolerance`.
    Gradient,
    /// No damping level produced a decrease in cost.
    Stalled,
    MaxIterations,
}

impl Termination {
    pub fn is_success(self) -> bool {
        !matches!(self, Termination::Stalled | Termination::MaxIterations)
    }
}

#[derive(Debug, Clone)]
pub struct LeastSquaresResult {
    pub x: Array1<f64>,
    pub converged: bool,
    pub termination: Termination,
    pub iterations: usize,
    /// Final residual norm ‖r(x)‖.
    pub residual: f64,
    pub residual_history: Vec<f64>,
}

fn evaluate<F>(residual_fn: &F, x: &Array1<f64>) -> Array1<f64>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    match x.as_slice() {
        Some(slice) => Array1::from(residual_fn(slice)),
        None => Array1::from(residual_fn(&x.to_vec())),
    }
}

fn all_finite(v: &Array1<f64>) -> bool {
    v.iter().all(|x| x.is_finite())
}

/// Forward-difference Jacobian `J[i][j] = ∂r_i/∂x_j` around `x`, reusing `r0 = r(x)`.
pub fn fd_jacobian<F>(
    residual_fn: &F,
    x: &Array1<f64>,
    r0: &Array1<f64>,
    fd_step: f64,
) -> RopeResult<Array2<f64>>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let n = x.len();
    let m = r0.len();
    let mut jac = Array2::zeros((m, n));
    let mut xp = x.clone();

    for col in 0..n {
        let h = fd_step * x[col].abs().max(1.0);
        xp[col] = x[col] + h;
        let rp = evaluate(residual_fn, &xp);
        xp[col] = x[col];

        if rp.len() != m {
            return Err(RopeError::LinAlg(format!(
                "Residual length changed from {m} to {} during differencing",
                rp.len()
            )));
        }
        if !all_finite(&rp) {
            return Err(RopeError::SolverDiverged {
                iteration: 0,
                message: format!("Non-finite residual while differencing column {col}"),
            });
        }
        for row in 0..m {
            jac[[row, col]] = (rp[row] - r0[row]) / h;
        }
    }
    Ok(jac)
}

/// Minimise `½‖residual_fn(x)‖²` starting from `x0`.
///
/// Returns `Ok` with `converged = false` when the iteration budget runs out or
/// no improving step exists; the caller decides whether that is fatal.
/// Non-finite residuals at the starting point are an error.
pub fn levenberg_marquardt<F>(
    residual_fn: F,
    x0: &[f64],
    config: &SolverConfig,
) -> RopeResult<LeastSquaresResult>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    config.validate()?;
    if x0.is_empty() {
        return Err(RopeError::ConfigError(
            "Least-squares start vector must be non-empty".to_string(),
        ));
    }

    let mut x = Array1::from(x0.to_vec());
    let mut r = evaluate(&residual_fn, &x);
    if !all_finite(&r) {
        return Err(RopeError::SolverDiverged {
            iteration: 0,
            message: "Non-finite residual at initial guess".to_string(),
        });
    }

    let mut cost = 0.5 * r.dot(&r);
    let mut damping = config.initial_damping;
    let mut residual_history = Vec::with_capacity(config.max_iterations + 1);
    residual_history.push(norm_l2(&r));

    let mut termination = Termination::MaxIterations;
    let mut iterations = 0usize;

    for iter in 0..config.max_iterations {
        if norm_l2(&r) < config.tolerance {
            termination = Termination::Residual;
            break;
        }

        let jac = fd_jacobian(&residual_fn, &x, &r, config.fd_step).map_err(|e| match e {
            RopeError::SolverDiverged { message, .. } => RopeError::SolverDiverged {
                iteration: iter,
                message,
            },
            other => other,
        })?;
        let (jtj, gradient) = normal_equations(&jac, &r);
        if norm_inf(&gradient) < config.gradient_tolerance {
            termination = Termination::Gradient;
            break;
        }
        let rhs = gradient.mapv(|v| -v);

        let mut accepted = false;
        for _ in 0..MAX_DAMPING_TRIALS {
            let mut lhs = jtj.clone();
            for k in 0..lhs.nrows() {
                lhs[[k, k]] += damping * jtj[[k, k]].max(MIN_DIAGONAL);
            }

            let delta = match solve_dense(&lhs, &rhs) {
                Ok(d) => d,
                Err(_) => {
                    damping *= DAMPING_FACTOR;
                    continue;
                }
            };

            let x_trial = &x + &delta;
            let r_trial = evaluate(&residual_fn, &x_trial);
            let cost_trial = 0.5 * r_trial.dot(&r_trial);

            if all_finite(&r_trial) && cost_trial < cost {
                let reduction = cost - cost_trial;
                let step_norm = norm_l2(&delta);
                let x_norm = norm_l2(&x);
                let previous_cost = cost;

                x = x_trial;
                r = r_trial;
                cost = cost_trial;
                damping = (damping / DAMPING_FACTOR).max(MIN_DAMPING);
                residual_history.push(norm_l2(&r));
                accepted = true;

                if reduction < config.cost_tolerance * previous_cost {
                    termination = Termination::CostReduction;
                } else if step_norm < config.step_tolerance * (config.step_tolerance + x_norm) {
                    termination = Termination::StepSize;
                }
                break;
            }

            damping *= DAMPING_FACTOR;
            if damping > MAX_DAMPING {
                break;
            }
        }

        iterations = iter + 1;
        if !accepted {
            termination = Termination::Stalled;
            break;
        }
        if termination != Termination::MaxIterations {
            break;
        }
    }

    // The budget may run out on the very step that reached the tolerance.
    if termination == Termination::MaxIterations && norm_l2(&r) < config.tolerance {
        termination = Termination::Residual;
    }

    let residual = norm_l2(&r);
    let converged = termination.is_success();
    if converged {
        trace!(iterations, residual, ?termination, "Least-squares solve converged");
    } else {
        warn!(
            iterations,
            residual,
            ?termination,
            "Least-squares solve did not converge"
        );
    }

    Ok(LeastSquaresResult {
        x,
        converged,
        termination,
        iterations,
        residual,
        residual_history,
    })
}
