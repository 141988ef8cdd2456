//! Post-hoc frequency KPI computation from simulation results.

use std::fmt;

use super::engine::SimulationResult;

/// Frequency-response indicators for one area.
#[derive(Debug, Clone)]
pub struct AreaKpi {
    /// Zero-based area index.
    pub area: usize,
    /// Lowest frequency reached (Hz).
    pub nadir_hz: f64,
    /// Highest frequency reached (Hz).
    pub zenith_hz: f64,
    /// Largest rate of change of frequency by magnitude (Hz/s).
    pub peak_rocof_hz_per_sec: f64,
    /// Largest area control error by magnitude.
    pub max_abs_ace: f64,
    /// Frequency at the end of the horizon (Hz).
    pub final_freq_hz: f64,
    /// Last computed ACE sample.
    pub final_ace: f64,
}

/// Aggregate report over all areas, computed post-hoc from a complete run
/// so step data and reported metrics cannot disagree.
#[derive(Debug, Clone)]
pub struct KpiReport {
    /// One entry per area, in area order.
    pub areas: Vec<AreaKpi>,
    /// Nominal frequency the run used (Hz).
    pub f0_hz: f64,
}

impl KpiReport {
    /// Computes all indicators from the complete time series.
    pub fn from_result(result: &SimulationResult) -> Self {
        let total = result.total_steps();
        let mut areas = Vec::with_capacity(result.num_areas());

        for i in 0..result.num_areas() {
            let hz = result.freq_hz(i);
            let ace = result.ace(i);
            let rocof = result.rocof_hz_per_sec(i);

            let mut nadir = f64::INFINITY;
            let mut zenith = f64::NEG_INFINITY;
            for &v in &hz {
                nadir = nadir.min(v);
                zenith = zenith.max(v);
            }
            let peak_rocof = rocof.iter().fold(0.0_f64, |acc, &v| acc.max(v.abs()));
            let max_abs_ace = ace.iter().fold(0.0_f64, |acc, &v| acc.max(v.abs()));

            areas.push(AreaKpi {
                area: i,
                nadir_hz: nadir,
                zenith_hz: zenith,
                peak_rocof_hz_per_sec: peak_rocof,
                max_abs_ace,
                final_freq_hz: hz[total - 1],
                // the ACE lags the state update by one step
                final_ace: ace[total.saturating_sub(2)],
            });
        }

        Self {
            areas,
            f0_hz: result.config.f0_hz,
        }
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Frequency Report (f0 = {} Hz) ---", self.f0_hz)?;
        for kpi in &self.areas {
            writeln!(
                f,
                "Area {}: nadir {:.4} Hz  zenith {:.4} Hz  peak RoCoF {:.4} Hz/s  \
                 max |ACE| {:.5}  final {:.4} Hz (ACE {:.6})",
                kpi.area + 1,
                kpi.nadir_hz,
                kpi.zenith_hz,
                kpi.peak_rocof_hz_per_sec,
                kpi.max_abs_ace,
                kpi.final_freq_hz,
                kpi.final_ace,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::area::AreaModel;
    use crate::model::discrete::DiscreteAreaModel;
    use crate::sim::controller::{PidController, PidGains};
    use crate::sim::disturbance::{AttackWindow, DisturbanceSchedule};
    use crate::sim::engine::Engine;
    use crate::sim::types::SimConfig;

    fn run_with_step_load() -> SimulationResult {
        let config = SimConfig::new(0.01, 2.0, 60.0, 250.0);
        let steps = config.total_steps();
        let model =
            AreaModel::new(0.015, 5.031, &[0.4], &[0.08], &[3.0], &[1.0], &[0.0]).unwrap();
        let discrete = DiscreteAreaModel::from_continuous(&model, 0.01).unwrap();
        let pid = PidController::new(PidGains::new(4.5, 1.1, 2.8), 0.0, 0.01);
        let windows = vec![vec![
            AttackWindow::new(0, 50, 0.0),
            AttackWindow::new(50, steps, 0.05),
        ]];
        let schedule = DisturbanceSchedule::materialize(&windows, steps).unwrap();
        Engine::new(config, vec![discrete], vec![pid], vec![vec![0.0]], schedule)
            .unwrap()
            .run()
    }

    #[test]
    fn nadir_dips_below_nominal_under_load_increase() {
        let report = KpiReport::from_result(&run_with_step_load());
        let kpi = &report.areas[0];
        assert!(kpi.nadir_hz < 60.0);
        assert!(kpi.nadir_hz > 55.0, "nadir {} is implausibly deep", kpi.nadir_hz);
        assert!(kpi.peak_rocof_hz_per_sec > 0.0);
        assert!(kpi.max_abs_ace > 0.0);
    }

    #[test]
    fn display_lists_every_area() {
        let report = KpiReport::from_result(&run_with_step_load());
        let text = format!("{report}");
        assert!(text.contains("Area 1:"));
        assert!(text.contains("nadir"));
    }
}
