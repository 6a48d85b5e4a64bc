// ─────────────────────────────────────────────────────────────────────
// Flux Rope Core — Analytical Flux Rope Model
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Base model for analytical flux ropes.
//!
//! A rope propagates along the direction given by longitude and latitude in
//! a J2000-like inertial frame and is rolled about that direction by the
//! inclination. Its cross-section is an isosurface of a curvilinear system
//! supplied as [`Capabilities`]; the field inside comes from the model's `h`.
//!
//! Concrete models embed a [`FluxRope`] and implement [`FluxRopeModel`],
//! providing the time evolution of their state parameters.

use crate::capability::{Capabilities, CollisionPredicate};
use crate::transform::{points_to_rows, rows_to_points, TransformEngine};
use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2, ArrayView2};
use rayon::prelude::*;
use rope_math::rotation::ErCoefficients;
use rope_types::config::{RopeConfig, SolverConfig};
use rope_types::constants::{UNIT_X, UNIT_Y, UNIT_Z, ZERO_VECTOR};
use rope_types::error::RopeResult;
use rope_types::state::{Matrix3, Orientation, Vector3};
use tracing::debug;

/// Forward (curvilinear-local → inertial) coefficients for an orientation.
///
/// Rotate to the longitude about +Z, tilt to the latitude about the rotated
/// +Y, then roll by the inclination about the fully re-oriented +X. The
/// order is fixed.
pub fn orientation_coefficients(orientation: &Orientation) -> ErCoefficients {
    let c1 = ErCoefficients::from_axis_angle(orientation.longitude, &UNIT_Z);
    let c2 = ErCoefficients::from_axis_angle(-orientation.latitude, &c1.rotate(&UNIT_Y));
    let c12 = c1.compose(&c2);
    let c3 = ErCoefficients::from_axis_angle(orientation.inclination, &c12.rotate(&UNIT_X));
    c12.compose(&c3)
}

/// Orientation, propagation time and transform state shared by every model.
pub struct FluxRope {
    t0: DateTime<Utc>,
    tt: DateTime<Utc>,
    orientation: Orientation,
    engine: TransformEngine,
    propagated: bool,
}

impl FluxRope {
    /// Construct a rope at `time`. Fails if `capabilities` has neither `f` nor `f0`.
    ///
    /// Orientation coefficients are derived immediately; state parameters stay
    /// empty until the concrete model updates them.
    pub fn new(
        time: DateTime<Utc>,
        orientation: Orientation,
        capabilities: Capabilities,
        solver: SolverConfig,
    ) -> RopeResult<Self> {
        let engine = TransformEngine::new(capabilities, &solver)?;
        let mut rope = FluxRope {
            t0: time,
            tt: time,
            orientation,
            engine,
            propagated: false,
        };
        rope.update_er_coefficients();
        debug!(
            longitude = orientation.longitude,
            latitude = orientation.latitude,
            inclination = orientation.inclination,
            analytic_inverse = rope.engine.inverse_is_analytic(),
            "Flux rope constructed"
        );
        Ok(rope)
    }

    pub fn from_config(config: &RopeConfig, capabilities: Capabilities) -> RopeResult<Self> {
        config.validate()?;
        Self::new(config.time, config.orientation, capabilities, config.solver)
    }

    /// Re-derive both rotation coefficient vectors from the current orientation.
    pub fn update_er_coefficients(&mut self) {
        let coeff_from = orientation_coefficients(&self.orientation);
        self.engine.set_coefficients(coeff_from);
        debug!(
            a = coeff_from.a,
            b = coeff_from.b,
            c = coeff_from.c,
            d = coeff_from.d,
            "Updated Euler-Rodrigues coefficients"
        );
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        self.update_er_coefficients();
    }

    pub fn er_coefficients_from(&self) -> ErCoefficients {
        self.engine.coefficients_from()
    }

    pub fn er_coefficients_into(&self) -> ErCoefficients {
        self.engine.coefficients_into()
    }

    /// Initial time.
    pub fn t0(&self) -> DateTime<Utc> {
        self.t0
    }

    /// Current propagation time.
    pub fn time(&self) -> DateTime<Utc> {
        self.tt
    }

    pub fn set_time(&mut self, time: DateTime<Utc>) {
        self.tt = time;
    }

    /// Seconds from `t0` to the current propagation time.
    pub fn elapsed_seconds(&self) -> f64 {
        let dt = self.tt - self.t0;
        match dt.num_nanoseconds() {
            Some(ns) => ns as f64 * 1e-9,
            // Beyond ±292 years nanoseconds overflow i64.
            None => dt.num_milliseconds() as f64 * 1e-3,
        }
    }

    pub fn state(&self) -> &[f64] {
        self.engine.state()
    }

    /// Replace the state parameters. Called from a model's `update_state_parameters`.
    pub fn set_state(&mut self, state: Vec<f64>) {
        debug!(time = %self.tt, ?state, "Updated state parameters");
        self.engine.set_state(state);
        self.propagated = true;
    }

    /// `true` once state parameters have been set, even to an empty list.
    pub fn is_propagated(&self) -> bool {
        self.propagated
    }

    pub fn engine(&self) -> &TransformEngine {
        &self.engine
    }

    pub fn transform_into(&self, x: &Vector3) -> RopeResult<Vector3> {
        self.engine.transform_into(x)
    }

    pub fn transform_from(&self, q: &Vector3) -> Vector3 {
        self.engine.transform_from(q)
    }

    pub fn transform_into_batch(&self, xs: ArrayView2<'_, f64>) -> RopeResult<Array2<f64>> {
        self.engine.transform_into_batch(xs)
    }

    pub fn transform_from_batch(&self, qs: ArrayView2<'_, f64>) -> RopeResult<Array2<f64>> {
        self.engine.transform_from_batch(qs)
    }

    pub fn jacobian(&self, q: &Vector3) -> Matrix3 {
        self.engine.jacobian(q)
    }

    /// Magnetic field at inertial point `v`, in inertial coordinates.
    ///
    /// With a collision predicate, points outside the rope give the zero vector
    /// and `false` without evaluating `h`. Without one every point counts as
    /// inside and the flag is always `true`.
    pub fn magnetic_field(
        &self,
        v: &Vector3,
        collision: Option<&dyn CollisionPredicate>,
    ) -> RopeResult<(Vector3, bool)> {
        let q = self.engine.transform_into(v)?;
        match collision {
            Some(predicate) if !predicate.contains(&q, self.engine.state()) => {
                Ok((ZERO_VECTOR, false))
            }
            _ => Ok((self.engine.field_from(&q), true)),
        }
    }

    /// Row-wise [`Self::magnetic_field`] over an `(n, 3)` array.
    pub fn magnetic_field_batch(
        &self,
        vs: ArrayView2<'_, f64>,
        collision: Option<&dyn CollisionPredicate>,
    ) -> RopeResult<(Array2<f64>, Array1<bool>)> {
        let points = rows_to_points(vs)?;
        let samples = points
            .par_iter()
            .map(|v| self.magnetic_field(v, collision))
            .collect::<RopeResult<Vec<_>>>()?;
        let fields: Vec<Vector3> = samples.iter().map(|(b, _)| *b).collect();
        let flags: Array1<bool> = samples.iter().map(|(_, inside)| *inside).collect();
        Ok((points_to_rows(&fields), flags))
    }
}

impl std::fmt::Debug for FluxRope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FluxRope")
            .field("t0", &self.t0)
            .field("tt", &self.tt)
            .field("orientation", &self.orientation)
            .field("er_coeff_from", &self.engine.coefficients_from())
            .field("state", &self.engine.state())
            .field("propagated", &self.propagated)
            .finish_non_exhaustive()
    }
}

/// A concrete flux rope model.
///
/// Implementors own a [`FluxRope`] and define how it evolves in time. After
/// `propagate` returns `Ok`, `update_state_parameters` must have run so that
/// later transforms and field samples see the new state.
pub trait FluxRopeModel {
    fn rope(&self) -> &FluxRope;

    fn rope_mut(&mut self) -> &mut FluxRope;

    /// Advance the rope to `time`.
    fn propagate(&mut self, time: DateTime<Utc>) -> RopeResult<()>;

    /// Recompute the state parameters for the current time and orientation.
    fn update_state_parameters(&mut self) -> RopeResult<()>;

    fn magnetic_field(
        &self,
        v: &Vector3,
        collision: Option<&dyn CollisionPredicate>,
    ) -> RopeResult<(Vector3, bool)> {
        self.rope().magnetic_field(v, collision)
    }

    fn magnetic_field_batch(
        &self,
        vs: ArrayView2<'_, f64>,
        collision: Option<&dyn CollisionPredicate>,
    ) -> RopeResult<(Array2<f64>, Array1<bool>)> {
        self.rope().magnetic_field_batch(vs, collision)
    }

    fn transform_into(&self, x: &Vector3) -> RopeResult<Vector3> {
        self.rope().transform_into(x)
    }

    fn transform_from(&self, q: &Vector3) -> Vector3 {
        self.rope().transform_from(q)
    }

    fn transform_into_batch(&self, xs: ArrayView2<'_, f64>) -> RopeResult<Array2<f64>> {
        self.rope().transform_into_batch(xs)
    }

    fn transform_from_batch(&self, qs: ArrayView2<'_, f64>) -> RopeResult<Array2<f64>> {
        self.rope().transform_from_batch(qs)
    }
}
