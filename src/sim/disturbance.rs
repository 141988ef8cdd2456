//! Piecewise-constant load disturbances (load-altering attacks).
//!
//! A disturbance is described per area as an ordered sequence of attack
//! windows. Materialization turns the windows into a dense per-area load
//! series that the engine copies into the load channel of its input vector
//! before the run starts.

use crate::error::Error;

/// One piecewise-constant attack window over `[start_index, end_index)`.
///
/// The strength is the load value in per-unit of base load relative to the
/// initial operating point. It *replaces* the load over the window's span;
/// windows are never additive or cumulative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackWindow {
    /// First step index the window applies to (inclusive).
    pub start_index: usize,
    /// First step index past the window (exclusive).
    pub end_index: usize,
    /// Load value held over the window, in per-unit.
    pub strength: f64,
}

impl AttackWindow {
    /// Creates a window spanning `[start_index, end_index)`.
    pub fn new(start_index: usize, end_index: usize, strength: f64) -> Self {
        Self {
            start_index,
            end_index,
            strength,
        }
    }

    /// Returns `true` when `step` falls within the window.
    pub fn is_active(&self, step: usize) -> bool {
        step >= self.start_index && step < self.end_index
    }
}

/// Dense per-area load series over the full horizon.
#[derive(Debug, Clone)]
pub struct DisturbanceSchedule {
    loads: Vec<Vec<f64>>,
    total_steps: usize,
}

impl DisturbanceSchedule {
    /// Materializes per-area window lists into dense load series.
    ///
    /// Every area's windows must be in time order, non-overlapping, and
    /// cover `[0, total_steps)` without gaps; the scenario resolver
    /// guarantees this for well-formed scenario files, so a violation here
    /// is a caller error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schedule`] naming the offending area when a window
    /// is empty or reversed, the first window does not start at 0, windows
    /// overlap or leave a gap, or the last window does not reach the
    /// horizon.
    pub fn materialize(
        windows_per_area: &[Vec<AttackWindow>],
        total_steps: usize,
    ) -> Result<Self, Error> {
        let mut loads = Vec::with_capacity(windows_per_area.len());

        for (area, windows) in windows_per_area.iter().enumerate() {
            if windows.is_empty() {
                return Err(Error::schedule(area, "window list is empty"));
            }
            if windows[0].start_index != 0 {
                return Err(Error::schedule(
                    area,
                    format!(
                        "first window starts at index {}, must cover the horizon from 0",
                        windows[0].start_index
                    ),
                ));
            }

            let mut series = vec![0.0; total_steps];
            let mut cursor = 0usize;
            for (k, window) in windows.iter().enumerate() {
                if window.end_index <= window.start_index {
                    return Err(Error::schedule(
                        area,
                        format!(
                            "window {k} is empty or reversed ([{}, {}))",
                            window.start_index, window.end_index
                        ),
                    ));
                }
                if window.start_index != cursor {
                    let kind = if window.start_index < cursor { "overlaps" } else { "leaves a gap" };
                    return Err(Error::schedule(
                        area,
                        format!("window {k} {kind} (starts at {}, expected {cursor})", window.start_index),
                    ));
                }
                if window.end_index > total_steps {
                    return Err(Error::schedule(
                        area,
                        format!(
                            "window {k} ends at {} past the horizon ({total_steps})",
                            window.end_index
                        ),
                    ));
                }
                series[window.start_index..window.end_index].fill(window.strength);
                cursor = window.end_index;
            }
            if cursor != total_steps {
                return Err(Error::schedule(
                    area,
                    format!("windows end at {cursor}, must cover the horizon ({total_steps})"),
                ));
            }

            loads.push(series);
        }

        Ok(Self { loads, total_steps })
    }

    /// Number of areas the schedule covers.
    pub fn num_areas(&self) -> usize {
        self.loads.len()
    }

    /// Number of steps each series spans.
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// The dense load series for one area.
    pub fn area_load(&self, area: usize) -> &[f64] {
        &self.loads[area]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_activity_bounds() {
        let w = AttackWindow::new(5, 8, 0.05);
        assert!(!w.is_active(4));
        assert!(w.is_active(5));
        assert!(w.is_active(7));
        assert!(!w.is_active(8));
    }

    #[test]
    fn strengths_replace_not_accumulate() {
        let windows = vec![vec![
            AttackWindow::new(0, 30, 0.0),
            AttackWindow::new(30, 100, 0.05),
        ]];
        let schedule = DisturbanceSchedule::materialize(&windows, 100).unwrap();
        let load = schedule.area_load(0);
        assert!(load[..30].iter().all(|&v| v == 0.0));
        assert!(load[30..].iter().all(|&v| v == 0.05));
    }

    #[test]
    fn later_window_overrides_earlier_value_entirely() {
        let windows = vec![vec![
            AttackWindow::new(0, 10, 0.10),
            AttackWindow::new(10, 20, 0.03),
        ]];
        let schedule = DisturbanceSchedule::materialize(&windows, 20).unwrap();
        // the second strength stands alone, independent of the first
        assert_eq!(schedule.area_load(0)[15], 0.03);
    }

    #[test]
    fn per_area_series_are_independent() {
        let windows = vec![
            vec![AttackWindow::new(0, 10, 0.05)],
            vec![AttackWindow::new(0, 10, 0.0)],
        ];
        let schedule = DisturbanceSchedule::materialize(&windows, 10).unwrap();
        assert_eq!(schedule.num_areas(), 2);
        assert_eq!(schedule.area_load(0)[3], 0.05);
        assert_eq!(schedule.area_load(1)[3], 0.0);
    }

    #[test]
    fn rejects_overlapping_windows() {
        let windows = vec![vec![
            AttackWindow::new(0, 12, 0.0),
            AttackWindow::new(10, 20, 0.05),
        ]];
        let err = DisturbanceSchedule::materialize(&windows, 20).unwrap_err();
        assert!(matches!(err, Error::Schedule { area: 0, .. }));
    }

    #[test]
    fn rejects_gapped_windows() {
        let windows = vec![vec![
            AttackWindow::new(0, 8, 0.0),
            AttackWindow::new(10, 20, 0.05),
        ]];
        assert!(DisturbanceSchedule::materialize(&windows, 20).is_err());
    }

    #[test]
    fn rejects_non_covering_windows() {
        let windows = vec![vec![AttackWindow::new(0, 15, 0.0)]];
        assert!(DisturbanceSchedule::materialize(&windows, 20).is_err());
        let late_start = vec![vec![AttackWindow::new(5, 20, 0.0)]];
        assert!(DisturbanceSchedule::materialize(&late_start, 20).is_err());
    }

    #[test]
    fn rejects_reversed_window() {
        let windows = vec![vec![AttackWindow::new(0, 0, 0.0)]];
        assert!(DisturbanceSchedule::materialize(&windows, 20).is_err());
    }
}
