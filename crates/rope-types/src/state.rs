// ─────────────────────────────────────────────────────────────────────
// Flux Rope Core — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

/// Point or vector in three dimensions, `[x, y, z]`.
pub type Vector3 = [f64; 3];

/// 3x3 matrix stored row-major, `m[row][col]`.
pub type Matrix3 = [[f64; 3]; 3];

/// Propagation direction and roll of a flux rope, all angles in degrees.
///
/// The inertial frame is J2000-like: longitude increases towards solar east,
/// latitude lies within [-90°, +90°], and an inclination of 0° puts the rope
/// in the XY plane with its axial field pointing east.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    pub longitude: f64,
    pub latitude: f64,
    pub inclination: f64,
}

impl Orientation {
    pub fn new(longitude: f64, latitude: f64, inclination: f64) -> Self {
        Orientation {
            longitude,
            latitude,
            inclination,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite() && self.inclination.is_finite()
    }
}
