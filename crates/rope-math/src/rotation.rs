// ─────────────────────────────────────────────────────────────────────
// Flux Rope Core — Euler-Rodrigues Rotation Algebra
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Rotations expressed as Euler-Rodrigues coefficients `(a, b, c, d)`.
//!
//! For a rotation by θ about the unit axis `k`:
//!   a = cos(θ/2),  (b, c, d) = k · sin(θ/2)
//!
//! `a.compose(&b)` is the rotation "apply `a`, then `b`", i.e. the quaternion
//! product `b ⊗ a`. Unit norm is the caller's responsibility; non-unit
//! coefficients produce a scaled/sheared map.

use rope_types::state::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Euler-Rodrigues coefficients, scalar part `a` first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Default for ErCoefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ErCoefficients {
    pub const IDENTITY: ErCoefficients = ErCoefficients {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 0.0,
    };

    pub const fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        ErCoefficients { a, b, c, d }
    }

    /// Coefficients for a rotation of `angle_deg` degrees about `axis`.
    ///
    /// `axis` must be a unit vector. A zero angle gives [`Self::IDENTITY`].
    pub fn from_axis_angle(angle_deg: f64, axis: &Vector3) -> Self {
        let half = (angle_deg / 2.0).to_radians();
        let (sin, cos) = half.sin_cos();
        ErCoefficients {
            a: cos,
            b: axis[0] * sin,
            c: axis[1] * sin,
            d: axis[2] * sin,
        }
    }

    /// Composition: apply `self` first, then `other`.
    pub fn compose(&self, other: &ErCoefficients) -> ErCoefficients {
        let (a1, b1, c1, d1) = (self.a, self.b, self.c, self.d);
        let (a2, b2, c2, d2) = (other.a, other.b, other.c, other.d);
        ErCoefficients {
            a: a1 * a2 - b1 * b2 - c1 * c2 - d1 * d2,
            b: a1 * b2 + b1 * a2 - c1 * d2 + d1 * c2,
            c: a1 * c2 + c1 * a2 - d1 * b2 + b1 * d2,
            d: a1 * d2 + d1 * a2 - b1 * c2 + c1 * b2,
        }
    }

    /// Inverse rotation for unit coefficients: vector part negated.
    pub fn conjugate(&self) -> ErCoefficients {
        ErCoefficients {
            a: self.a,
            b: -self.b,
            c: -self.c,
            d: -self.d,
        }
    }

    pub fn norm(&self) -> f64 {
        (self.a * self.a + self.b * self.b + self.c * self.c + self.d * self.d).sqrt()
    }

    /// Closed-form Euler-Rodrigues rotation matrix.
    pub fn rotation_matrix(&self) -> Matrix3 {
        let (a, b, c, d) = (self.a, self.b, self.c, self.d);
        let (aa, bb, cc, dd) = (a * a, b * b, c * c, d * d);
        [
            [
                aa + bb - cc - dd,
                2.0 * (b * c - a * d),
                2.0 * (b * d + a * c),
            ],
            [
                2.0 * (b * c + a * d),
                aa + cc - bb - dd,
                2.0 * (c * d - a * b),
            ],
            [
                2.0 * (b * d - a * c),
                2.0 * (c * d + a * b),
                aa + dd - bb - cc,
            ],
        ]
    }

    /// Rotate `v` by these coefficients.
    pub fn rotate(&self, v: &Vector3) -> Vector3 {
        let m = self.rotation_matrix();
        [
            m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
            m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
            m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
        ]
    }

    pub fn approx_eq(&self, other: &ErCoefficients, tol: f64) -> bool {
        (self.a - other.a).abs() < tol
            && (self.b - other.b).abs() < tol
            && (self.c - other.c).abs() < tol
            && (self.d - other.d).abs() < tol
    }
}
