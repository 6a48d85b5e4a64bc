//! Expanding circular-cylinder rope shared by the integration tests and benches.
//!
//! The cross-section itself is the crate's unit-test cylinder; this module adds
//! a concrete model whose radius grows linearly with time since launch.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use rope_core::{Capabilities, FluxRope, FluxRopeModel};
use rope_types::config::SolverConfig;
use rope_types::error::{RopeError, RopeResult};
use rope_types::state::Orientation;

#[path = "../../src/testing.rs"]
mod cylinder;

pub use cylinder::*;

/// Cylinder whose radius grows linearly with time since launch.
#[derive(Debug)]
pub struct ExpandingCylinder {
    rope: FluxRope,
    initial_radius: f64,
    expansion_rate: f64,
    twist: f64,
    b0: f64,
}

impl ExpandingCylinder {
    pub fn new(
        time: DateTime<Utc>,
        orientation: Orientation,
        capabilities: Capabilities,
        initial_radius: f64,
        expansion_rate: f64,
    ) -> RopeResult<Self> {
        let rope = FluxRope::new(time, orientation, capabilities, SolverConfig::default())?;
        Ok(ExpandingCylinder {
            rope,
            initial_radius,
            expansion_rate,
            twist: 1.0,
            b0: 10.0,
        })
    }

    pub fn radius(&self) -> f64 {
        self.rope.state().first().copied().unwrap_or(self.initial_radius)
    }
}

impl FluxRopeModel for ExpandingCylinder {
    fn rope(&self) -> &FluxRope {
        &self.rope
    }

    fn rope_mut(&mut self) -> &mut FluxRope {
        &mut self.rope
    }

    fn propagate(&mut self, time: DateTime<Utc>) -> RopeResult<()> {
        if time < self.rope.t0() {
            return Err(RopeError::ConfigError(format!(
                "cannot propagate to {time}, before launch at {}",
                self.rope.t0()
            )));
        }
        self.rope.set_time(time);
        self.update_state_parameters()
    }

    fn update_state_parameters(&mut self) -> RopeResult<()> {
        let radius = self.initial_radius + self.expansion_rate * self.rope.elapsed_seconds();
        // Conserve axial flux: b0 · radius² stays constant.
        let b0 = self.b0 * (self.initial_radius / radius).powi(2);
        self.rope.set_state(vec![radius, self.twist, b0]);
        Ok(())
    }
}
