//! Load-altering-attack scenario files.
//!
//! A scenario file is a JSON array of named scenarios. Each scenario lists,
//! per area, the attack start times and strengths; an attack lasts until
//! the next one starts, and the final attack lasts until the end of the
//! horizon. Resolution turns these into the contiguous window lists the
//! disturbance schedule expects, inserting an implicit zero-strength
//! leading window when an area's first attack starts after `t = 0`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Error;
use crate::sim::disturbance::AttackWindow;
use crate::sim::types::SimConfig;

/// Attack sequence for one area: parallel `starts`/`strengths` arrays in
/// seconds and per-unit load.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AreaAttacks {
    /// Attack start times in seconds, strictly increasing.
    pub starts: Vec<f64>,
    /// Load value each attack holds, in per-unit; same length as `starts`.
    pub strengths: Vec<f64>,
}

/// One named attack scenario covering every area of the grid.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Unique scenario name used for selection.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// One attack sequence per area, in area order.
    pub areas_attacks: Vec<AreaAttacks>,
}

impl Scenario {
    /// The built-in default: a 0.05 pu step load increase on area 0 at
    /// 30 s, held to the end of the horizon; other areas undisturbed.
    pub fn step_5pct(num_areas: usize) -> Self {
        let mut areas_attacks = vec![
            AreaAttacks {
                starts: vec![0.0],
                strengths: vec![0.0],
            };
            num_areas
        ];
        areas_attacks[0] = AreaAttacks {
            starts: vec![0.0, 30.0],
            strengths: vec![0.0, 0.05],
        };
        Self {
            name: "step_5pct".to_string(),
            description: "5% step load increase on area 1 at 30s".to_string(),
            areas_attacks,
        }
    }

    /// Resolves the scenario into per-area window lists covering
    /// `[0, total_steps)`.
    ///
    /// Each attack's end is the next attack's start; the last end is the
    /// horizon. Times convert to step indices by rounding to the nearest
    /// step.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schedule`] when an area's arrays differ in length,
    /// starts are not strictly increasing, a start is negative or past the
    /// horizon, or the area count does not match `num_areas`.
    pub fn resolve(
        &self,
        config: &SimConfig,
        num_areas: usize,
    ) -> Result<Vec<Vec<AttackWindow>>, Error> {
        if self.areas_attacks.len() != num_areas {
            return Err(Error::config(
                "scenario.areas_attacks",
                format!(
                    "scenario `{}` describes {} areas, grid has {num_areas}",
                    self.name,
                    self.areas_attacks.len()
                ),
            ));
        }

        let total_steps = config.total_steps();
        let mut windows_per_area = Vec::with_capacity(num_areas);

        for (area, attacks) in self.areas_attacks.iter().enumerate() {
            if attacks.starts.len() != attacks.strengths.len() {
                return Err(Error::schedule(
                    area,
                    format!(
                        "starts and strengths differ in length ({} vs {})",
                        attacks.starts.len(),
                        attacks.strengths.len()
                    ),
                ));
            }

            let mut windows = Vec::with_capacity(attacks.starts.len() + 1);
            let mut cursor = 0usize;
            for (k, (&start_sec, &strength)) in
                attacks.starts.iter().zip(&attacks.strengths).enumerate()
            {
                if start_sec < 0.0 {
                    return Err(Error::schedule(
                        area,
                        format!("attack {k} starts at {start_sec}s, before the horizon"),
                    ));
                }
                let start_index = config.index_of_sec(start_sec);
                if start_index >= total_steps {
                    return Err(Error::schedule(
                        area,
                        format!(
                            "attack {k} starts at {start_sec}s, past the {}s horizon",
                            config.sim_time_sec
                        ),
                    ));
                }
                if k > 0 && start_index <= cursor {
                    return Err(Error::schedule(
                        area,
                        format!("attack {k} start is out of order ({start_sec}s)"),
                    ));
                }
                // the quiet stretch before the first listed attack
                if k == 0 && start_index > 0 {
                    windows.push(AttackWindow::new(0, start_index, 0.0));
                }
                // the end is the next attack's start; patched below for
                // every window but the last
                windows.push(AttackWindow::new(start_index, total_steps, strength));
                cursor = start_index;
            }

            if windows.is_empty() {
                windows.push(AttackWindow::new(0, total_steps, 0.0));
            }
            for k in 0..windows.len().saturating_sub(1) {
                windows[k].end_index = windows[k + 1].start_index;
            }

            windows_per_area.push(windows);
        }

        Ok(windows_per_area)
    }
}

/// A parsed scenario file.
#[derive(Debug, Clone)]
pub struct ScenarioSet {
    scenarios: Vec<Scenario>,
}

impl ScenarioSet {
    /// Loads a scenario set from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns a formatted message when the file cannot be read or the
    /// JSON does not match the schema.
    pub fn from_json_file(path: &Path) -> Result<Self, String> {
        let raw = fs::read_to_string(path)
            .map_err(|err| format!("failed to read scenario file `{}`: {err}", path.display()))?;
        let scenarios: Vec<Scenario> = serde_json::from_str(&raw)
            .map_err(|err| format!("invalid scenario file `{}`: {err}", path.display()))?;
        Ok(Self { scenarios })
    }

    /// All scenario names in file order.
    pub fn names(&self) -> Vec<&str> {
        self.scenarios.iter().map(|s| s.name.as_str()).collect()
    }

    /// Looks up a scenario by name.
    pub fn get(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }
}
