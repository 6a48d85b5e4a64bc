// ─────────────────────────────────────────────────────────────────────
// Flux Rope Core — Model Capabilities
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Caller-supplied pieces of a concrete flux rope model.
//!
//! A concrete cross-section model provides:
//! - `g`: curvilinear → local cartesian transform ([`ForwardMap`])
//! - `jacobian` of `g` ([`JacobianMap`])
//! - `h`: magnetic field at curvilinear coordinates ([`FieldLaw`])
//! - `f`: analytic inverse of `g` ([`InverseMap`]), or
//! - `f0`: initial guess seeding a numerical inverse ([`InitialGuess`])
//!
//! Every capability receives the current state parameters. Plain functions
//! and closures with the matching signature implement the traits directly.

use rope_types::state::{Matrix3, Vector3};
use std::sync::Arc;

/// `g: q → x`, curvilinear to local cartesian (rope propagating along +X).
pub trait ForwardMap: Send + Sync {
    fn forward(&self, q: &Vector3, state: &[f64]) -> Vector3;
}

/// Jacobian of `g`, `J[i][j] = ∂x_i/∂q_j`.
pub trait JacobianMap: Send + Sync {
    fn jacobian(&self, q: &Vector3, state: &[f64]) -> Matrix3;
}

/// `h`: field vector at curvilinear coordinates, expressed in the local cartesian frame.
pub trait FieldLaw: Send + Sync {
    fn field(&self, q: &Vector3, state: &[f64]) -> Vector3;
}

/// `f: x → q`, exact inverse of `g`.
pub trait InverseMap: Send + Sync {
    fn inverse(&self, x: &Vector3, state: &[f64]) -> Vector3;
}

/// `f0: x → q₀`, starting point for the numerical inverse.
pub trait InitialGuess: Send + Sync {
    fn guess(&self, x: &Vector3, state: &[f64]) -> Vector3;
}

/// Decides whether curvilinear coordinates lie inside the rope.
pub trait CollisionPredicate: Send + Sync {
    fn contains(&self, q: &Vector3, state: &[f64]) -> bool;
}

impl<F> ForwardMap for F
where
    F: Fn(&Vector3, &[f64]) -> Vector3 + Send + Sync,
{
    fn forward(&self, q: &Vector3, state: &[f64]) -> Vector3 {
        self(q, state)
    }
}

impl<F> JacobianMap for F
where
    F: Fn(&Vector3, &[f64]) -> Matrix3 + Send + Sync,
{
    fn jacobian(&self, q: &Vector3, state: &[f64]) -> Matrix3 {
        self(q, state)
    }
}

impl<F> FieldLaw for F
where
    F: Fn(&Vector3, &[f64]) -> Vector3 + Send + Sync,
{
    fn field(&self, q: &Vector3, state: &[f64]) -> Vector3 {
        self(q, state)
    }
}

impl<F> InverseMap for F
where
    F: Fn(&Vector3, &[f64]) -> Vector3 + Send + Sync,
{
    fn inverse(&self, x: &Vector3, state: &[f64]) -> Vector3 {
        self(x, state)
    }
}

impl<F> InitialGuess for F
where
    F: Fn(&Vector3, &[f64]) -> Vector3 + Send + Sync,
{
    fn guess(&self, x: &Vector3, state: &[f64]) -> Vector3 {
        self(x, state)
    }
}

impl<F> CollisionPredicate for F
where
    F: Fn(&Vector3, &[f64]) -> bool + Send + Sync,
{
    fn contains(&self, q: &Vector3, state: &[f64]) -> bool {
        self(q, state)
    }
}

/// The full capability set of a concrete model.
///
/// Capabilities are shared (`Arc`) so one set can back several rope instances.
/// At least one of `f` / `f0` must be present when a rope is constructed; if
/// both are, the analytic `f` wins.
#[derive(Clone)]
pub struct Capabilities {
    pub g: Arc<dyn ForwardMap>,
    pub jacobian: Arc<dyn JacobianMap>,
    pub h: Arc<dyn FieldLaw>,
    pub f: Option<Arc<dyn InverseMap>>,
    pub f0: Option<Arc<dyn InitialGuess>>,
}

impl Capabilities {
    pub fn new<G, J, H>(g: G, jacobian: J, h: H) -> Self
    where
        G: ForwardMap + 'static,
        J: JacobianMap + 'static,
        H: FieldLaw + 'static,
    {
        Capabilities {
            g: Arc::new(g),
            jacobian: Arc::new(jacobian),
            h: Arc::new(h),
            f: None,
            f0: None,
        }
    }

    pub fn with_inverse<F: InverseMap + 'static>(mut self, f: F) -> Self {
        self.f = Some(Arc::new(f));
        self
    }

    pub fn with_initial_guess<F: InitialGuess + 'static>(mut self, f0: F) -> Self {
        self.f0 = Some(Arc::new(f0));
        self
    }
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("f", &self.f.is_some())
            .field("f0", &self.f0.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift(q: &Vector3, state: &[f64]) -> Vector3 {
        let s = state.first().copied().unwrap_or(0.0);
        [q[0] + s, q[1], q[2]]
    }

    fn unit_jacobian(_q: &Vector3, _state: &[f64]) -> Matrix3 {
        [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
    }

    #[test]
    fn test_functions_implement_capabilities() {
        let caps = Capabilities::new(shift, unit_jacobian, shift).with_inverse(shift);
        assert_eq!(caps.g.forward(&[1.0, 2.0, 3.0], &[0.5]), [1.5, 2.0, 3.0]);
        assert_eq!(caps.h.field(&[0.0, 0.0, 0.0], &[]), [0.0, 0.0, 0.0]);
        assert_eq!(caps.jacobian.jacobian(&[0.0; 3], &[])[2][2], 1.0);
        assert!(caps.f.is_some());
        assert!(caps.f0.is_none());
    }

    #[test]
    fn test_closures_implement_predicate() {
        let inside = |q: &Vector3, state: &[f64]| q[0] <= state[0];
        assert!(inside.contains(&[0.5, 0.0, 0.0], &[1.0]));
        assert!(!inside.contains(&[1.5, 0.0, 0.0], &[1.0]));
    }

    #[test]
    fn test_debug_reports_inverse_presence() {
        let caps = Capabilities::new(shift, unit_jacobian, shift).with_initial_guess(shift);
        let dbg = format!("{caps:?}");
        assert!(dbg.contains("f: false"));
        assert!(dbg.contains("f0: true"));
    }
}
