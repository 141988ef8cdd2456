//! Shared helpers for integration tests.

use lfc_sim::config::GridConfig;
use lfc_sim::model::area::AreaModel;
use lfc_sim::model::discrete::DiscreteAreaModel;
use lfc_sim::scenario::Scenario;
use lfc_sim::sim::controller::{PidController, PidGains};
use lfc_sim::sim::disturbance::DisturbanceSchedule;
use lfc_sim::sim::engine::{Engine, SimulationResult};
use lfc_sim::sim::types::SimConfig;

/// Builds an engine from a grid configuration and a scenario, then runs
/// the full horizon.
pub fn run(grid: &GridConfig, scenario: &Scenario) -> SimulationResult {
    let sim = &grid.simulation;
    let mut config = SimConfig::new(sim.time_step_sec, sim.sim_time_sec, sim.f0_hz, sim.base_mw);
    config.setpoint = sim.setpoint;

    let tie_lines = grid.resolved_tie_lines();
    let mut discrete_models = Vec::with_capacity(grid.areas.len());
    let mut controllers = Vec::with_capacity(grid.areas.len());

    for (i, area) in grid.areas.iter().enumerate() {
        let model = AreaModel::new(
            area.d,
            area.h,
            &area.tt,
            &area.tg,
            &area.r,
            &area.alpha,
            &tie_lines[i],
        )
        .expect("preset areas are valid");
        discrete_models.push(
            DiscreteAreaModel::from_continuous(&model, config.time_step_sec)
                .expect("preset models discretize"),
        );
        controllers.push(PidController::new(
            PidGains::from(area.gains),
            config.setpoint,
            config.time_step_sec,
        ));
    }

    let windows = scenario
        .resolve(&config, grid.areas.len())
        .expect("scenario resolves");
    let schedule = DisturbanceSchedule::materialize(&windows, config.total_steps())
        .expect("schedule materializes");

    Engine::new(config, discrete_models, controllers, tie_lines, schedule)
        .expect("engine builds")
        .run()
}

/// A scenario with no attacks anywhere: every area holds zero load change.
pub fn quiet_scenario(num_areas: usize) -> Scenario {
    let mut scenario = Scenario::step_5pct(num_areas);
    scenario.name = "quiet".to_string();
    scenario.description = "no attacks".to_string();
    for attacks in &mut scenario.areas_attacks {
        attacks.starts = vec![0.0];
        attacks.strengths = vec![0.0];
    }
    scenario
}
