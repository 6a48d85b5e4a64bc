//! Circular-cylinder model shared by the unit tests, integration tests and benches.
//!
//! q = (r, φ, s): normalised radius, polar angle around the axis, axial position.
//! state = [radius, twist, b0]; missing entries fall back to 1.0.
//!
//! `Capabilities` is taken from the parent module so the file also compiles
//! when included by path from outside the crate.

use super::Capabilities;
use rope_types::state::{Matrix3, Vector3};

fn param(state: &[f64], idx: usize) -> f64 {
    state.get(idx).copied().unwrap_or(1.0)
}

pub fn cylinder_g(q: &Vector3, state: &[f64]) -> Vector3 {
    let radius = param(state, 0);
    let (sin, cos) = q[1].sin_cos();
    [q[2], radius * q[0] * cos, radius * q[0] * sin]
}

pub fn cylinder_f(x: &Vector3, state: &[f64]) -> Vector3 {
    let radius = param(state, 0);
    [x[1].hypot(x[2]) / radius, x[2].atan2(x[1]), x[0]]
}

pub fn cylinder_f0(x: &Vector3, state: &[f64]) -> Vector3 {
    let q = cylinder_f(x, state);
    [q[0] * 1.1 + 0.05, q[1] + 0.2, q[2] + 0.3]
}

pub fn cylinder_jacobian(q: &Vector3, state: &[f64]) -> Matrix3 {
    let radius = param(state, 0);
    let (sin, cos) = q[1].sin_cos();
    [
        [0.0, 0.0, 1.0],
        [radius * cos, -radius * q[0] * sin, 0.0],
        [radius * sin, radius * q[0] * cos, 0.0],
    ]
}

/// Uniform-twist field: axial component along +X, azimuthal around it.
pub fn cylinder_h(q: &Vector3, state: &[f64]) -> Vector3 {
    let rho = param(state, 0) * q[0];
    let twist = param(state, 1);
    let b0 = param(state, 2);
    let denom = 1.0 + twist * twist * rho * rho;
    let b_axial = b0 / denom;
    let b_phi = b0 * twist * rho / denom;
    let (sin, cos) = q[1].sin_cos();
    [b_axial, -b_phi * sin, b_phi * cos]
}

pub fn inside_unit_radius(q: &Vector3, _state: &[f64]) -> bool {
    q[0] <= 1.0
}

#[derive(Debug, Clone, Copy)]
pub enum InverseKind {
    Analytic,
    Approximated,
    Both,
    None,
}

pub fn cylinder_capabilities(kind: InverseKind) -> Capabilities {
    let caps = Capabilities::new(cylinder_g, cylinder_jacobian, cylinder_h);
    match kind {
        InverseKind::Analytic => caps.with_inverse(cylinder_f),
        InverseKind::Approximated => caps.with_initial_guess(cylinder_f0),
        InverseKind::Both => caps.with_inverse(cylinder_f).with_initial_guess(cylinder_f0),
        InverseKind::None => caps,
    }
}
