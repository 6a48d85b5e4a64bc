// ─────────────────────────────────────────────────────────────────────
// Flux Rope Core — Inverse Coordinate Transform
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Local cartesian → curvilinear transform, analytic or approximated.
//!
//! When a model cannot write `f = g⁻¹` in closed form, the inverse is found
//! by minimising `‖g(q, state) − x‖²` over `q` with Levenberg-Marquardt,
//! starting from the model's initial guess `f0(x, state)`.

use crate::capability::{Capabilities, ForwardMap, InitialGuess, InverseMap};
use rope_math::least_squares::levenberg_marquardt;
use rope_types::config::SolverConfig;
use rope_types::error::{RopeError, RopeResult};
use rope_types::state::Vector3;
use std::sync::Arc;

/// Strategy mapping local cartesian points to curvilinear coordinates.
pub trait InverseStrategy: Send + Sync {
    fn invert(&self, x: &Vector3, state: &[f64]) -> RopeResult<Vector3>;

    /// `true` when no numerical solve is involved.
    fn is_analytic(&self) -> bool;
}

/// Wraps a closed-form inverse `f`.
pub struct AnalyticInverse {
    f: Arc<dyn InverseMap>,
}

impl AnalyticInverse {
    pub fn new(f: Arc<dyn InverseMap>) -> Self {
        AnalyticInverse { f }
    }
}

impl InverseStrategy for AnalyticInverse {
    fn invert(&self, x: &Vector3, state: &[f64]) -> RopeResult<Vector3> {
        Ok(self.f.inverse(x, state))
    }

    fn is_analytic(&self) -> bool {
        true
    }
}

/// Numerical inverse: least-squares solve of `g(q, state) = x` seeded by `f0`.
pub struct ApproximatedInverse {
    g: Arc<dyn ForwardMap>,
    f0: Arc<dyn InitialGuess>,
    solver: SolverConfig,
}

impl ApproximatedInverse {
    pub fn new(g: Arc<dyn ForwardMap>, f0: Arc<dyn InitialGuess>, solver: SolverConfig) -> Self {
        ApproximatedInverse { g, f0, solver }
    }

    pub fn solver(&self) -> &SolverConfig {
        &self.solver
    }
}

impl InverseStrategy for ApproximatedInverse {
    fn invert(&self, x: &Vector3, state: &[f64]) -> RopeResult<Vector3> {
        let q0 = self.f0.guess(x, state);
        let residual = |q: &[f64]| -> Vec<f64> {
            let xq = self.g.forward(&[q[0], q[1], q[2]], state);
            vec![xq[0] - x[0], xq[1] - x[1], xq[2] - x[2]]
        };

        let result = levenberg_marquardt(residual, &q0, &self.solver)?;
        if !result.converged {
            return Err(RopeError::SolverDiverged {
                iteration: result.iterations,
                message: format!(
                    "Inverse transform of {x:?} did not converge ({:?}, residual {:.3e})",
                    result.termination, result.residual
                ),
            });
        }
        Ok([result.x[0], result.x[1], result.x[2]])
    }

    fn is_analytic(&self) -> bool {
        false
    }
}

/// Pick the inverse strategy for a capability set.
///
/// The analytic `f` takes precedence over `f0`; neither is a configuration error.
pub fn select_inverse(
    capabilities: &Capabilities,
    solver: &SolverConfig,
) -> RopeResult<Box<dyn InverseStrategy>> {
    match (&capabilities.f, &capabilities.f0) {
        (Some(f), _) => Ok(Box::new(AnalyticInverse::new(Arc::clone(f)))),
        (None, Some(f0)) => {
            solver.validate()?;
            Ok(Box::new(ApproximatedInverse::new(
                Arc::clone(&capabilities.g),
                Arc::clone(f0),
                *solver,
            )))
        }
        (None, None) => Err(RopeError::ConfigError(
            "inverse transform f or its approximation f0 must be given".to_string(),
        )),
    }
}
