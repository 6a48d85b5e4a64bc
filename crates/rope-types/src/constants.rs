// ─────────────────────────────────────────────────────────────────────
// Flux Rope Core — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::state::Vector3;

/// Unit vector along the inertial X axis (propagation axis of an un-rotated rope).
pub const UNIT_X: Vector3 = [1.0, 0.0, 0.0];

/// Unit vector along the inertial Y axis.
pub const UNIT_Y: Vector3 = [0.0, 1.0, 0.0];

/// Unit vector along the inertial Z axis (solar north in J2000-like frames).
pub const UNIT_Z: Vector3 = [0.0, 0.0, 1.0];

/// Zero vector returned for field samples outside the rope.
pub const ZERO_VECTOR: Vector3 = [0.0, 0.0, 0.0];

/// Spatial dimension of every point handled by the transform engine.
pub const SPATIAL_DIM: usize = 3;

/// Default forward-difference step for numerical Jacobians (≈ sqrt(f64::EPSILON)).
pub const DEFAULT_FD_STEP: f64 = 1.49e-8;
