// ─────────────────────────────────────────────────────────────────────
// Flux Rope Core — Property-Based Tests (proptest) for rope-types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for rope-types using proptest.
//!
//! Covers: configuration serialization roundtrip, solver validation bounds.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rope_types::config::{RopeConfig, SolverConfig};
use rope_types::state::Orientation;

proptest! {
    /// Any finite orientation survives a JSON roundtrip bit-for-bit.
    #[test]
    fn config_json_roundtrip(
        lon in -360.0f64..360.0,
        lat in -90.0f64..90.0,
        inc in -180.0f64..180.0,
        secs in 0i64..2_000_000_000,
    ) {
        let time = Utc.timestamp_opt(secs, 0).unwrap();
        let cfg = RopeConfig::new(time, Orientation::new(lon, lat, inc));
        let json = serde_json::to_string(&cfg).unwrap();
        let back: RopeConfig = serde_json::from_str(&json).unwrap();

        prop_assert_eq!(back.time, cfg.time);
        prop_assert_eq!(back.orientation, cfg.orientation);
        prop_assert_eq!(back.solver, cfg.solver);
        prop_assert!(back.validate().is_ok());
    }

    /// Strictly positive settings always validate.
    #[test]
    fn positive_solver_settings_validate(
        iters in 1usize..10_000,
        tol in 1e-16f64..1.0,
        step in 1e-12f64..1e-3,
        damping in 1e-9f64..1e3,
    ) {
        let cfg = SolverConfig {
            max_iterations: iters,
            tolerance: tol,
            cost_tolerance: tol,
            step_tolerance: tol,
            gradient_tolerance: tol,
            fd_step: step,
            initial_damping: damping,
        };
        prop_assert!(cfg.validate().is_ok());
    }

    /// A single non-positive tolerance is always rejected.
    #[test]
    fn negative_tolerance_rejected(tol in -1.0f64..=0.0) {
        let cfg = SolverConfig { gradient_tolerance: tol, ..SolverConfig::default() };
        prop_assert!(cfg.validate().is_err());
    }
}

/// Angles whose shortest decimal form needs all 17 digits keep their last bit.
#[test]
fn config_json_keeps_last_bit_of_angles() {
    let time = Utc.timestamp_opt(0, 0).unwrap();
    let orientation = Orientation::new(133.34506592442023, -0.1 - 0.2, 1.0 / 3.0);
    let cfg = RopeConfig::new(time, orientation);
    let back: RopeConfig = serde_json::from_str(&serde_json::to_string(&cfg).unwrap()).unwrap();
    assert_eq!(back.orientation.longitude.to_bits(), orientation.longitude.to_bits());
    assert_eq!(back.orientation.latitude.to_bits(), orientation.latitude.to_bits());
    assert_eq!(back.orientation.inclination.to_bits(), orientation.inclination.to_bits());
}
