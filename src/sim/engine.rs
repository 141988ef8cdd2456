//! Coupled multi-area simulation engine.
//!
//! The engine owns every area's discrete model and AGC controller plus the
//! tie-line coupling matrix, and drives the fixed-step recurrence over the
//! full horizon. Areas are coupled all-to-all through tie-line flows, so
//! each step reads a fully-settled snapshot of the previous step's state
//! for every area before any state is advanced.

use nalgebra::DVector;

use crate::error::Error;
use crate::model::discrete::DiscreteAreaModel;
use crate::model::layout::StateLayout;
use crate::sim::controller::PidController;
use crate::sim::disturbance::DisturbanceSchedule;
use crate::sim::types::SimConfig;

/// Simulation engine owning per-area models, controllers, and the tie-line
/// matrix.
#[derive(Debug)]
pub struct Engine {
    config: SimConfig,
    tie_lines: Vec<Vec<f64>>,
    areas: Vec<DiscreteAreaModel>,
    controllers: Vec<PidController>,
    schedule: DisturbanceSchedule,
}

/// Complete time series of one simulation run, exclusively owned by that
/// run.
///
/// Indexing follows the recurrence: `x[i][t]` is area `i`'s state vector at
/// step `t`, while the shared channels `w`, `u`, `y` are indexed
/// `[t][area]`. The tie-line flow `w[t][i][1]` and the ACE `y[t][i]` are
/// written one step behind the state update, so their last sample lives at
/// `t = total_steps - 2`.
pub struct SimulationResult {
    /// Timing configuration the run was produced with.
    pub config: SimConfig,
    /// Per-area state trajectories; dimensions differ across areas.
    pub x: Vec<Vec<DVector<f64>>>,
    /// Disturbance input per step and area: `[load, tie_line_flow]`.
    pub w: Vec<Vec<[f64; 2]>>,
    /// AGC controller output per step and area.
    pub u: Vec<Vec<f64>>,
    /// Area control error per step and area.
    pub y: Vec<Vec<f64>>,
}

impl Engine {
    /// Creates an engine from discretized area models, one controller per
    /// area, the tie-line matrix, and a materialized disturbance schedule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the per-area collections disagree in
    /// length, the tie-line matrix is not square of matching size, is
    /// asymmetric, or carries a non-zero diagonal, or the schedule horizon
    /// does not match the configured step count.
    pub fn new(
        config: SimConfig,
        areas: Vec<DiscreteAreaModel>,
        controllers: Vec<PidController>,
        tie_lines: Vec<Vec<f64>>,
        schedule: DisturbanceSchedule,
    ) -> Result<Self, Error> {
        let n = areas.len();
        if n == 0 {
            return Err(Error::config("areas", "at least one area is required"));
        }
        if controllers.len() != n {
            return Err(Error::config(
                "controllers",
                format!("expected one controller per area ({n}), got {}", controllers.len()),
            ));
        }
        if tie_lines.len() != n || tie_lines.iter().any(|row| row.len() != n) {
            return Err(Error::config(
                "tie_lines",
                format!("coupling matrix must be {n}x{n}"),
            ));
        }
        for i in 0..n {
            if tie_lines[i][i] != 0.0 {
                return Err(Error::config(
                    "tie_lines",
                    format!("diagonal entry [{i}][{i}] must be zero"),
                ));
            }
            for j in 0..i {
                if (tie_lines[i][j] - tie_lines[j][i]).abs() > 1e-9 {
                    return Err(Error::config(
                        "tie_lines",
                        format!("matrix must be symmetric (entries [{i}][{j}] and [{j}][{i}] differ)"),
                    ));
                }
            }
        }
        if schedule.num_areas() != n {
            return Err(Error::config(
                "schedule",
                format!("expected load series for {n} areas, got {}", schedule.num_areas()),
            ));
        }
        if schedule.total_steps() != config.total_steps() {
            return Err(Error::config(
                "schedule",
                format!(
                    "load series span {} steps, horizon is {}",
                    schedule.total_steps(),
                    config.total_steps()
                ),
            ));
        }

        Ok(Self {
            config,
            tie_lines,
            areas,
            controllers,
            schedule,
        })
    }

    /// Runs the full horizon and returns the complete time series.
    ///
    /// Consumes the engine: controllers carry error history, so one engine
    /// drives exactly one run. The recurrence for `t = 1..T-1` is, per
    /// area `i`:
    ///
    /// ```text
    /// w[t-1][i][1] = Σ_j Tij[i][j] * x[j][t-1][freq]
    /// x[i][t]      = Ad x[i][t-1] + B1d w[t-1][i] + B2d u[t-1][i]
    /// y[t-1][i]    = Cd · x[i][t-1]
    /// u[t][i]      = pid_i(y[t-1][i], u[t-1][i])
    /// ```
    ///
    /// The ACE deliberately lags the state update (it reads the pre-update
    /// state) and the controller output for step `t` is computed from it;
    /// reordering shifts every downstream series by one step.
    pub fn run(mut self) -> SimulationResult {
        let total = self.config.total_steps();
        let n = self.areas.len();

        // cold start: x[i][0] is the zero vector
        let mut x: Vec<Vec<DVector<f64>>> = self
            .areas
            .iter()
            .map(|area| {
                let mut series = Vec::with_capacity(total);
                series.push(DVector::zeros(area.layout.dim()));
                series
            })
            .collect();

        // the load channel is pre-seeded from the schedule and never
        // mutated by the loop; only the tie-line channel is written per step
        let mut w = vec![vec![[0.0_f64; 2]; n]; total];
        for i in 0..n {
            let load = self.schedule.area_load(i);
            for (t, row) in w.iter_mut().enumerate() {
                row[i][0] = load[t];
            }
        }

        let mut u = vec![vec![0.0_f64; n]; total];
        let mut y = vec![vec![0.0_f64; n]; total];

        for t in 1..total {
            // settled snapshot of every area's previous frequency deviation
            let prev_freq: Vec<f64> = (0..n).map(|j| x[j][t - 1][StateLayout::FREQ]).collect();

            for i in 0..n {
                let flow: f64 = self.tie_lines[i]
                    .iter()
                    .zip(&prev_freq)
                    .map(|(tij, df)| tij * df)
                    .sum();
                w[t - 1][i][1] = flow;

                let area = &self.areas[i];
                let input = DVector::from_column_slice(&w[t - 1][i]);
                let mut next = &area.ad * &x[i][t - 1];
                next += &area.b1d * input;
                next += area.b2d.column(0) * u[t - 1][i];
                x[i].push(next);

                y[t - 1][i] = area.cd.dot(&x[i][t - 1]);
                u[t][i] = self.controllers[i].update(y[t - 1][i], u[t - 1][i]);
            }
        }

        SimulationResult {
            config: self.config,
            x,
            w,
            u,
            y,
        }
    }
}

impl SimulationResult {
    /// Number of areas in the run.
    pub fn num_areas(&self) -> usize {
        self.x.len()
    }

    /// Number of steps in every series.
    pub fn total_steps(&self) -> usize {
        self.w.len()
    }

    /// Per-unit frequency deviation series of one area.
    pub fn freq_deviation(&self, area: usize) -> Vec<f64> {
        self.x[area]
            .iter()
            .map(|state| state[StateLayout::FREQ])
            .collect()
    }

    /// Absolute frequency series of one area in Hz.
    pub fn freq_hz(&self, area: usize) -> Vec<f64> {
        self.x[area]
            .iter()
            .map(|state| self.config.freq_hz(state[StateLayout::FREQ]))
            .collect()
    }

    /// Tie-line flow series of one area.
    pub fn tie_flow(&self, area: usize) -> Vec<f64> {
        self.w.iter().map(|row| row[area][1]).collect()
    }

    /// ACE series of one area.
    pub fn ace(&self, area: usize) -> Vec<f64> {
        self.y.iter().map(|row| row[area]).collect()
    }

    /// AGC controller output series of one area.
    pub fn agc_output(&self, area: usize) -> Vec<f64> {
        self.u.iter().map(|row| row[area]).collect()
    }

    /// Rate of change of frequency in Hz/s, the first difference of the
    /// Hz series; one sample shorter than the other series.
    pub fn rocof_hz_per_sec(&self, area: usize) -> Vec<f64> {
        let hz = self.freq_hz(area);
        hz.windows(2)
            .map(|pair| (pair[1] - pair[0]) / self.config.time_step_sec)
            .collect()
    }
}
