//! Core simulation types: timing configuration and unit conversions.

/// Centralized simulation configuration.
///
/// The engine, the disturbance schedule, and the scenario resolver all
/// reference this struct for timing, eliminating duplicated step
/// arithmetic.
///
/// # Examples
///
/// ```
/// use lfc_sim::sim::types::SimConfig;
///
/// let cfg = SimConfig::new(0.01, 300.0, 60.0, 250.0);
/// assert_eq!(cfg.total_steps(), 30_000);
/// assert_eq!(cfg.index_of_sec(30.0), 3_000);
/// ```
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Fixed sample interval in seconds.
    pub time_step_sec: f64,
    /// Simulated horizon in seconds.
    pub sim_time_sec: f64,
    /// Nominal grid frequency in Hz, used only for unit conversion.
    pub f0_hz: f64,
    /// System base power in MW, used only for display.
    pub base_mw: f64,
    /// ACE setpoint handed to every area controller.
    pub setpoint: f64,
}

impl SimConfig {
    /// Creates a new simulation configuration with a zero ACE setpoint.
    ///
    /// # Panics
    ///
    /// Panics if `time_step_sec` or `sim_time_sec` is not positive, or if
    /// the horizon is shorter than two steps.
    pub fn new(time_step_sec: f64, sim_time_sec: f64, f0_hz: f64, base_mw: f64) -> Self {
        assert!(time_step_sec > 0.0, "time_step_sec must be > 0");
        assert!(sim_time_sec > 0.0, "sim_time_sec must be > 0");
        let cfg = Self {
            time_step_sec,
            sim_time_sec,
            f0_hz,
            base_mw,
            setpoint: 0.0,
        };
        assert!(cfg.total_steps() >= 2, "horizon must span at least two steps");
        cfg
    }

    /// Total number of simulation steps over the horizon.
    pub fn total_steps(&self) -> usize {
        (self.sim_time_sec / self.time_step_sec).round() as usize
    }

    /// Converts a time in seconds to its nearest step index.
    pub fn index_of_sec(&self, sec: f64) -> usize {
        (sec / self.time_step_sec).round() as usize
    }

    /// Converts a per-unit frequency deviation to an absolute frequency in
    /// Hz.
    pub fn freq_hz(&self, delta_f_pu: f64) -> f64 {
        self.f0_hz + delta_f_pu * self.f0_hz
    }
}
