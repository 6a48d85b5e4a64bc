// ─────────────────────────────────────────────────────────────────────
// Flux Rope Core — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::constants::DEFAULT_FD_STEP;
use crate::error::{RopeError, RopeResult};
use crate::state::Orientation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level flux rope configuration.
/// Capabilities (g, jacobian, h, f / f0) are code, not data, and are
/// supplied separately at model construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RopeConfig {
    /// Initial (launch) time of the rope.
    pub time: DateTime<Utc>,
    pub orientation: Orientation,
    /// Settings for the numerical inverse transform.
    /// When absent, [`SolverConfig::default`] is used.
    #[serde(default)]
    pub solver: SolverConfig,
}

/// Levenberg-Marquardt settings used when the inverse transform is approximated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Absolute residual norm below which the solve stops.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Relative cost reduction below which the solve stops.
    #[serde(default = "default_tolerance")]
    pub cost_tolerance: f64,
    /// Relative step length below which the solve stops.
    #[serde(default = "default_tolerance")]
    pub step_tolerance: f64,
    /// Gradient infinity norm below which the solve stops.
    #[serde(default = "default_tolerance")]
    pub gradient_tolerance: f64,
    /// Relative forward-difference step for the numerical Jacobian.
    #[serde(default = "default_fd_step")]
    pub fd_step: f64,
    /// Initial Levenberg-Marquardt damping λ.
    #[serde(default = "default_initial_damping")]
    pub initial_damping: f64,
}

fn default_max_iterations() -> usize {
    100
}
fn default_tolerance() -> f64 {
    1e-12
}
fn default_fd_step() -> f64 {
    DEFAULT_FD_STEP
}
fn default_initial_damping() -> f64 {
    1e-3
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            cost_tolerance: default_tolerance(),
            step_tolerance: default_tolerance(),
            gradient_tolerance: default_tolerance(),
            fd_step: default_fd_step(),
            initial_damping: default_initial_damping(),
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> RopeResult<()> {
        if self.max_iterations == 0 {
            return Err(RopeError::ConfigError(
                "solver.max_iterations must be >= 1".to_string(),
            ));
        }
        let positive = [
            ("tolerance", self.tolerance),
            ("cost_tolerance", self.cost_tolerance),
            ("step_tolerance", self.step_tolerance),
            ("gradient_tolerance", self.gradient_tolerance),
            ("fd_step", self.fd_step),
            ("initial_damping", self.initial_damping),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(RopeError::ConfigError(format!(
                    "solver.{name} must be finite and > 0"
                )));
            }
        }
        Ok(())
    }
}

impl RopeConfig {
    pub fn new(time: DateTime<Utc>, orientation: Orientation) -> Self {
        RopeConfig {
            time,
            orientation,
            solver: SolverConfig::default(),
        }
    }

    /// Load from JSON file and validate.
    pub fn from_file(path: &str) -> RopeResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RopeResult<()> {
        if !self.orientation.is_finite() {
            return Err(RopeError::ConfigError(format!(
                "orientation angles must be finite, got {:?}",
                self.orientation
            )));
        }
        self.solver.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config_path(name: &str) -> String {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("configs")
            .join(name)
            .to_string_lossy()
            .to_string()
    }

    #[test]
    fn test_load_default_config() {
        let cfg = RopeConfig::from_file(&config_path("default_rope.json")).unwrap();
        assert_eq!(cfg.orientation, Orientation::default());
        assert_eq!(cfg.solver, SolverConfig::default());
        assert_eq!(cfg.time.to_rfc3339(), "2020-04-15T06:00:00+00:00");
    }

    #[test]
    fn test_load_inclined_config_partial_solver() {
        let cfg = RopeConfig::from_file(&config_path("inclined_rope.json")).unwrap();
        assert!((cfg.orientation.longitude - 155.0).abs() < 1e-12);
        assert!((cfg.orientation.latitude + 12.5).abs() < 1e-12);
        assert!((cfg.orientation.inclination - 72.0).abs() < 1e-12);
        assert_eq!(cfg.solver.max_iterations, 200);
        assert!((cfg.solver.tolerance - 1e-10).abs() < 1e-20);
        assert!((cfg.solver.fd_step - 1e-7).abs() < 1e-20);
        // Missing fields fall back to defaults.
        assert!((cfg.solver.initial_damping - 1e-3).abs() < 1e-15);
        assert!((cfg.solver.step_tolerance - 1e-12).abs() < 1e-24);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = RopeConfig::from_file(&config_path("does_not_exist.json")).unwrap_err();
        assert!(matches!(err, RopeError::Io(_)));
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let err = serde_json::from_str::<RopeConfig>("{\"time\": 3}")
            .map_err(RopeError::from)
            .unwrap_err();
        assert!(matches!(err, RopeError::Json(_)));
    }

    #[test]
    fn test_rejects_zero_iterations() {
        let solver = SolverConfig {
            max_iterations: 0,
            ..SolverConfig::default()
        };
        assert!(matches!(solver.validate(), Err(RopeError::ConfigError(_))));
    }

    #[test]
    fn test_rejects_non_positive_tolerances() {
        let bad = [
            SolverConfig {
                tolerance: 0.0,
                ..SolverConfig::default()
            },
            SolverConfig {
                fd_step: -1e-8,
                ..SolverConfig::default()
            },
            SolverConfig {
                initial_damping: f64::NAN,
                ..SolverConfig::default()
            },
        ];
        for cfg in &bad {
            assert!(cfg.validate().is_err(), "accepted {cfg:?}");
        }
    }

    #[test]
    fn test_rejects_non_finite_orientation() {
        let cfg = RopeConfig::new(Utc::now(), Orientation::new(f64::NAN, 0.0, 0.0));
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("orientation"));
    }

    #[test]
    fn test_roundtrip_serialization() {
        let cfg = RopeConfig::from_file(&config_path("inclined_rope.json")).unwrap();
        let json = serde_json::to_string_pretty(&cfg).unwrap();
        let cfg2: RopeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg.time, cfg2.time);
        assert_eq!(cfg.orientation, cfg2.orientation);
        assert_eq!(cfg.solver, cfg2.solver);
    }
}
