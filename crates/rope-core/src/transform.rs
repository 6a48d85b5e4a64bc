// ─────────────────────────────────────────────────────────────────────
// Flux Rope Core — Coordinate Transform Engine
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Inertial ↔ curvilinear coordinate transforms.
//!
//!   inertial --(rotate by inverse coefficients)--> local cartesian --f--> curvilinear
//!   curvilinear --g--> local cartesian --(rotate by forward coefficients)--> inertial
//!
//! Batches are `(n, 3)` arrays, one point per row, mapped row by row in
//! parallel. Rows never share mutable state.

use crate::capability::{Capabilities, FieldLaw, ForwardMap, JacobianMap};
use crate::inverse::{select_inverse, InverseStrategy};
use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;
use rope_math::rotation::ErCoefficients;
use rope_types::config::SolverConfig;
use rope_types::constants::SPATIAL_DIM;
use rope_types::error::{RopeError, RopeResult};
use rope_types::state::{Matrix3, Vector3};
use std::sync::Arc;

pub struct TransformEngine {
    g: Arc<dyn ForwardMap>,
    jacobian: Arc<dyn JacobianMap>,
    h: Arc<dyn FieldLaw>,
    inverse: Box<dyn InverseStrategy>,
    coeff_from: ErCoefficients,
    coeff_into: ErCoefficients,
    state: Vec<f64>,
}

/// Copy the rows of an `(n, 3)` array into points.
pub fn rows_to_points(points: ArrayView2<'_, f64>) -> RopeResult<Vec<Vector3>> {
    if points.ncols() != SPATIAL_DIM {
        return Err(RopeError::DimensionMismatch {
            expected: SPATIAL_DIM,
            got: points.ncols(),
        });
    }
    Ok(points
        .outer_iter()
        .map(|row| [row[0], row[1], row[2]])
        .collect())
}

/// Stack points into an `(n, 3)` array.
pub fn points_to_rows(points: &[Vector3]) -> Array2<f64> {
    Array2::from_shape_fn((points.len(), SPATIAL_DIM), |(i, j)| points[i][j])
}

impl TransformEngine {
    /// Build the engine with identity orientation and empty state.
    pub fn new(capabilities: Capabilities, solver: &SolverConfig) -> RopeResult<Self> {
        let inverse = select_inverse(&capabilities, solver)?;
        Ok(TransformEngine {
            g: capabilities.g,
            jacobian: capabilities.jacobian,
            h: capabilities.h,
            inverse,
            coeff_from: ErCoefficients::IDENTITY,
            coeff_into: ErCoefficients::IDENTITY,
            state: Vec::new(),
        })
    }

    /// Install new forward coefficients; the inverse is their conjugate.
    pub fn set_coefficients(&mut self, coeff_from: ErCoefficients) {
        self.coeff_from = coeff_from;
        self.coeff_into = coeff_from.conjugate();
    }

    /// Curvilinear-local → inertial rotation.
    pub fn coefficients_from(&self) -> ErCoefficients {
        self.coeff_from
    }

    /// Inertial → curvilinear-local rotation.
    pub fn coefficients_into(&self) -> ErCoefficients {
        self.coeff_into
    }

    pub fn state(&self) -> &[f64] {
        &self.state
    }

    pub fn set_state(&mut self, state: Vec<f64>) {
        self.state = state;
    }

    pub fn inverse_is_analytic(&self) -> bool {
        self.inverse.is_analytic()
    }

    /// Inertial point → curvilinear coordinates.
    pub fn transform_into(&self, x: &Vector3) -> RopeResult<Vector3> {
        let local = self.coeff_into.rotate(x);
        self.inverse.invert(&local, &self.state)
    }

    /// Curvilinear coordinates → inertial point.
    pub fn transform_from(&self, q: &Vector3) -> Vector3 {
        self.coeff_from.rotate(&self.g.forward(q, &self.state))
    }

    /// Row-wise [`Self::transform_into`]. The first failing row fails the batch.
    pub fn transform_into_batch(&self, xs: ArrayView2<'_, f64>) -> RopeResult<Array2<f64>> {
        let points = rows_to_points(xs)?;
        let mapped = points
            .par_iter()
            .map(|x| self.transform_into(x))
            .collect::<RopeResult<Vec<_>>>()?;
        Ok(points_to_rows(&mapped))
    }

    /// Row-wise [`Self::transform_from`].
    pub fn transform_from_batch(&self, qs: ArrayView2<'_, f64>) -> RopeResult<Array2<f64>> {
        let points = rows_to_points(qs)?;
        let mapped: Vec<Vector3> = points.par_iter().map(|q| self.transform_from(q)).collect();
        Ok(points_to_rows(&mapped))
    }

    /// Jacobian of `g` at `q` under the current state. Not used by the transforms.
    pub fn jacobian(&self, q: &Vector3) -> Matrix3 {
        self.jacobian.jacobian(q, &self.state)
    }

    /// `h(q, state)` rotated into the inertial frame.
    pub fn field_from(&self, q: &Vector3) -> Vector3 {
        self.coeff_from.rotate(&self.h.field(q, &self.state))
    }
}
