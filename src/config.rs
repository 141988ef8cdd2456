//! TOML-based grid configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Error;

/// Top-level grid configuration parsed from TOML.
///
/// Defaults match the `three_area` preset. Load from TOML with
/// [`GridConfig::from_toml_file`] or use a built-in preset via
/// [`GridConfig::from_preset`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    /// Simulation timing and global parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Per-area generator, turbine-governor, and AGC parameters.
    pub areas: Vec<AreaConfig>,
    /// Tie-line coupling matrix, row-major; an omitted matrix means an
    /// uncoupled grid (all zeros).
    #[serde(default)]
    pub tie_lines: Vec<Vec<f64>>,
}

/// Simulation timing and global parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Fixed sample interval in seconds.
    pub time_step_sec: f64,
    /// Simulated horizon in seconds.
    pub sim_time_sec: f64,
    /// Nominal grid frequency in Hz.
    pub f0_hz: f64,
    /// System base power in MW.
    pub base_mw: f64,
    /// ACE setpoint for every area controller.
    pub setpoint: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step_sec: 0.01,
            sim_time_sec: 300.0,
            f0_hz: 60.0,
            base_mw: 250.0,
            setpoint: 0.0,
        }
    }
}

/// One area's physical and controller parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AreaConfig {
    /// Load damping coefficient.
    pub d: f64,
    /// Aggregate inertia constant.
    pub h: f64,
    /// Turbine time constants, one per governor-turbine unit.
    pub tt: Vec<f64>,
    /// Governor time constants.
    pub tg: Vec<f64>,
    /// Droop coefficients.
    pub r: Vec<f64>,
    /// AGC participation factors (zero-padded entries allowed).
    pub alpha: Vec<f64>,
    /// PID gains `[kp, ki, kd]` for the area's AGC controller.
    pub gains: [f64; 3],
}

impl GridConfig {
    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a formatted message when the file cannot be read or the
    /// TOML does not match the schema.
    pub fn from_toml_file(path: &Path) -> Result<Self, String> {
        let raw = fs::read_to_string(path)
            .map_err(|err| format!("failed to read config `{}`: {err}", path.display()))?;
        toml::from_str(&raw)
            .map_err(|err| format!("invalid config `{}`: {err}", path.display()))
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["three_area", "single_area"];

    /// Loads a built-in preset by name.
    ///
    /// # Errors
    ///
    /// Returns a formatted message for unknown preset names.
    pub fn from_preset(name: &str) -> Result<Self, String> {
        match name {
            "three_area" => Ok(Self::three_area()),
            "single_area" => Ok(Self::single_area()),
            _ => Err(format!(
                "unknown preset `{name}` (expected one of {})",
                Self::PRESETS.join(", ")
            )),
        }
    }

    /// Three coupled areas with 3, 6, and 1 governor-turbine units.
    pub fn three_area() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            areas: vec![
                AreaConfig {
                    d: 0.015,
                    h: 5.031,
                    tt: vec![0.4, 0.36, 0.42],
                    tg: vec![0.08, 0.06, 0.07],
                    r: vec![3.0, 3.0, 3.3],
                    alpha: vec![0.4, 0.6, 0.0],
                    gains: [4.5, 1.1, 2.8],
                },
                AreaConfig {
                    d: 0.014,
                    h: 6.051,
                    tt: vec![0.44, 0.32, 0.4, 0.3, 0.4, 0.41],
                    tg: vec![0.06, 0.06, 0.08, 0.07, 0.07, 0.08],
                    r: vec![2.7273, 2.6667, 2.5, 2.8235, 3.0, 2.9412],
                    alpha: vec![0.55, 0.45, 0.0, 0.0, 0.0, 0.0],
                    gains: [4.0, 1.1, 2.5],
                },
                AreaConfig {
                    d: 0.015,
                    h: 3.741,
                    tt: vec![0.48],
                    tg: vec![0.06],
                    r: vec![2.3465],
                    alpha: vec![1.0],
                    gains: [3.8, 1.2, 2.4],
                },
            ],
            tie_lines: vec![
                vec![0.0, 0.2, 0.25],
                vec![0.2, 0.0, 0.12],
                vec![0.25, 0.12, 0.0],
            ],
        }
    }

    /// One isolated area with a single governor-turbine unit.
    pub fn single_area() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            areas: vec![AreaConfig {
                d: 0.015,
                h: 5.031,
                tt: vec![0.4],
                tg: vec![0.08],
                r: vec![3.0],
                alpha: vec![1.0],
                gains: [4.5, 1.1, 2.8],
            }],
            tie_lines: vec![vec![0.0]],
        }
    }

    /// The tie-line matrix with an omitted (empty) matrix expanded to all
    /// zeros.
    pub fn resolved_tie_lines(&self) -> Vec<Vec<f64>> {
        if self.tie_lines.is_empty() {
            let n = self.areas.len();
            vec![vec![0.0; n]; n]
        } else {
            self.tie_lines.clone()
        }
    }

    /// Validates the configuration and returns every violation found.
    ///
    /// Model construction re-checks the hard physical constraints and
    /// fails eagerly; this pass exists to report all problems at once at
    /// the CLI boundary.
    pub fn validate(&self) -> Vec<Error> {
        let mut errors = Vec::new();
        let sim = &self.simulation;

        if sim.time_step_sec <= 0.0 {
            errors.push(Error::config("simulation.time_step_sec", "must be > 0"));
        }
        if sim.sim_time_sec <= 0.0 {
            errors.push(Error::config("simulation.sim_time_sec", "must be > 0"));
        } else if sim.time_step_sec > 0.0 && sim.sim_time_sec / sim.time_step_sec < 2.0 {
            errors.push(Error::config(
                "simulation.sim_time_sec",
                "horizon must span at least two steps",
            ));
        }
        if sim.f0_hz <= 0.0 {
            errors.push(Error::config("simulation.f0_hz", "must be > 0"));
        }

        if self.areas.is_empty() {
            errors.push(Error::config("areas", "at least one area is required"));
        }
        for (i, area) in self.areas.iter().enumerate() {
            let m = area.tt.len();
            if m == 0 {
                errors.push(Error::config(
                    format!("areas[{i}].tt"),
                    "area needs at least one governor-turbine unit",
                ));
            }
            if area.tg.len() != m || area.r.len() != m || area.alpha.len() != m {
                errors.push(Error::config(
                    format!("areas[{i}]"),
                    "tt, tg, r, and alpha must share one length",
                ));
            }
            if area.h <= 0.0 {
                errors.push(Error::config(format!("areas[{i}].h"), "must be > 0"));
            }
            for (name, values) in [("tt", &area.tt), ("tg", &area.tg), ("r", &area.r)] {
                if values.iter().any(|&v| v <= 0.0) {
                    errors.push(Error::config(
                        format!("areas[{i}].{name}"),
                        "every entry must be > 0",
                    ));
                }
            }
            let alpha_sum: f64 = area.alpha.iter().sum();
            if m > 1 && (alpha_sum - 1.0).abs() > 1e-6 {
                errors.push(Error::config(
                    format!("areas[{i}].alpha"),
                    format!("must sum to 1 (got {alpha_sum})"),
                ));
            }
        }

        if !self.tie_lines.is_empty() {
            let n = self.areas.len();
            if self.tie_lines.len() != n || self.tie_lines.iter().any(|row| row.len() != n) {
                errors.push(Error::config(
                    "tie_lines",
                    format!("matrix must be {n}x{n} to match the area count"),
                ));
            } else {
                for i in 0..n {
                    if self.tie_lines[i][i] != 0.0 {
                        errors.push(Error::config(
                            "tie_lines",
                            format!("diagonal entry [{i}][{i}] must be zero"),
                        ));
                    }
                    for j in 0..i {
                        if (self.tie_lines[i][j] - self.tie_lines[j][i]).abs() > 1e-9 {
                            errors.push(Error::config(
                                "tie_lines",
                                format!("entries [{i}][{j}] and [{j}][{i}] must be symmetric"),
                            ));
                        }
                    }
                }
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate_cleanly() {
        for name in GridConfig::PRESETS {
            let cfg = GridConfig::from_preset(name).unwrap();
            let errors = cfg.validate();
            assert!(errors.is_empty(), "preset `{name}` failed: {errors:?}");
        }
    }

    #[test]
    fn unknown_preset_is_rejected() {
        assert!(GridConfig::from_preset("mystery").is_err());
    }

    #[test]
    fn toml_round_trip_minimal_config() {
        let raw = r#"
            [simulation]
            time_step_sec = 0.02
            sim_time_sec = 60.0

            [[areas]]
            d = 0.015
            h = 5.031
            tt = [0.4]
            tg = [0.08]
            r = [3.0]
            alpha = [1.0]
            gains = [4.5, 1.1, 2.8]
        "#;
        let cfg: GridConfig = toml::from_str(raw).unwrap();
        assert_eq!(cfg.simulation.time_step_sec, 0.02);
        // omitted globals fall back to defaults
        assert_eq!(cfg.simulation.f0_hz, 60.0);
        assert_eq!(cfg.areas.len(), 1);
        assert!(cfg.tie_lines.is_empty());
        assert_eq!(cfg.resolved_tie_lines(), vec![vec![0.0]]);
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let raw = r#"
            [[areas]]
            d = 0.015
            h = 5.031
            tt = [0.4]
            tg = [0.08]
            r = [3.0]
            alpha = [1.0]
            gains = [4.5, 1.1, 2.8]
            frequency = 60.0
        "#;
        assert!(toml::from_str::<GridConfig>(raw).is_err());
    }

    #[test]
    fn validation_flags_alpha_sum() {
        let mut cfg = GridConfig::three_area();
        cfg.areas[0].alpha = vec![0.4, 0.4, 0.0];
        let errors = cfg.validate();
        assert!(errors
            .iter()
            .any(|e| matches!(e, Error::Config { field, .. } if field == "areas[0].alpha")));
    }

    #[test]
    fn validation_flags_asymmetric_tie_matrix() {
        let mut cfg = GridConfig::three_area();
        cfg.tie_lines[0][1] = 0.3;
        let errors = cfg.validate();
        assert!(!errors.is_empty());
    }

    #[test]
    fn validation_flags_non_positive_time_constants() {
        let mut cfg = GridConfig::single_area();
        cfg.areas[0].tg[0] = 0.0;
        cfg.simulation.time_step_sec = -1.0;
        let errors = cfg.validate();
        assert!(errors.len() >= 2);
    }
}
