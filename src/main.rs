//! LFC simulator entry point — CLI wiring and config-driven engine
//! construction.

use std::path::Path;
use std::process;

use lfc_sim::config::GridConfig;
use lfc_sim::error::Error;
use lfc_sim::io::export::export_csv;
use lfc_sim::model::area::AreaModel;
use lfc_sim::model::discrete::DiscreteAreaModel;
use lfc_sim::scenario::{Scenario, ScenarioSet};
use lfc_sim::sim::controller::{PidController, PidGains};
use lfc_sim::sim::disturbance::DisturbanceSchedule;
use lfc_sim::sim::engine::{Engine, SimulationResult};
use lfc_sim::sim::kpi::KpiReport;
use lfc_sim::sim::types::SimConfig;

/// Parsed CLI arguments.
struct CliArgs {
    config_path: Option<String>,
    preset: Option<String>,
    scenario_path: Option<String>,
    attack: Option<String>,
    telemetry_out: Option<String>,
    print_continuous_matrices: bool,
    print_discrete_matrices: bool,
}

fn print_help() {
    eprintln!("lfc-sim — Multi-area load-frequency-control simulator");
    eprintln!();
    eprintln!("Usage: lfc-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>              Load grid configuration from TOML file");
    eprintln!("  --preset <name>              Use a built-in grid preset (three_area, single_area)");
    eprintln!("  --scenario <path>            Load attack scenarios from JSON file");
    eprintln!("  --attack <name>              Select a scenario by name (requires --scenario)");
    eprintln!("  --telemetry-out <path>       Export the full time series to CSV");
    eprintln!("  --print-continuous-matrices  Print each area's continuous matrices");
    eprintln!("  --print-discrete-matrices    Print each area's discrete matrices");
    eprintln!("  --help                       Show this help message");
    eprintln!();
    eprintln!("Without --config or --preset, the three_area preset is used.");
    eprintln!("Without --scenario, a 5% step load increase on area 1 at 30s is applied.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        preset: None,
        scenario_path: None,
        attack: None,
        telemetry_out: None,
        print_continuous_matrices: false,
        print_discrete_matrices: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --config requires a path argument");
                    process::exit(1);
                }
                cli.config_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--attack" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --attack requires a name argument");
                    process::exit(1);
                }
                cli.attack = Some(args[i].clone());
            }
            "--telemetry-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --telemetry-out requires a path argument");
                    process::exit(1);
                }
                cli.telemetry_out = Some(args[i].clone());
            }
            "--print-continuous-matrices" => {
                cli.print_continuous_matrices = true;
            }
            "--print-discrete-matrices" => {
                cli.print_discrete_matrices = true;
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Builds the engine from a validated configuration and a resolved
/// scenario, printing matrices along the way when requested.
fn build_and_run(
    grid: &GridConfig,
    scenario: &Scenario,
    cli: &CliArgs,
) -> Result<SimulationResult, Error> {
    let sim = &grid.simulation;
    let mut config = SimConfig::new(
        sim.time_step_sec,
        sim.sim_time_sec,
        sim.f0_hz,
        sim.base_mw,
    );
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
        )?;
        let discrete = DiscreteAreaModel::from_continuous(&model, config.time_step_sec)?;

        if cli.print_continuous_matrices {
            println!("CONTINUOUS FORM MATRICES, area {}:\n{model}\n", i + 1);
        }
        if cli.print_discrete_matrices {
            println!("DISCRETE FORM MATRICES, area {}:\n{discrete}\n", i + 1);
        }

        controllers.push(PidController::new(
            PidGains::from(area.gains),
            config.setpoint,
            config.time_step_sec,
        ));
        discrete_models.push(discrete);
    }

    let windows = scenario.resolve(&config, grid.areas.len())?;
    let schedule = DisturbanceSchedule::materialize(&windows, config.total_steps())?;

    let engine = Engine::new(config, discrete_models, controllers, tie_lines, schedule)?;
    Ok(engine.run())
}

fn main() {
    let cli = parse_args();

    // Load config: --config takes priority, then --preset, then the default
    let grid = if let Some(ref path) = cli.config_path {
        match GridConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match GridConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        GridConfig::three_area()
    };

    let errors = grid.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // Scenario selection: --scenario file (with optional --attack name),
    // otherwise the built-in step scenario
    let scenario = if let Some(ref path) = cli.scenario_path {
        let set = match ScenarioSet::from_json_file(Path::new(path)) {
            Ok(set) => set,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        };
        let name = cli.attack.clone().unwrap_or_else(|| {
            set.names().first().map(|s| s.to_string()).unwrap_or_default()
        });
        match set.get(&name) {
            Some(s) => s.clone(),
            None => {
                eprintln!(
                    "error: scenario `{name}` not found (available: {})",
                    set.names().join(", ")
                );
                process::exit(1);
            }
        }
    } else {
        Scenario::step_5pct(grid.areas.len())
    };

    let result = match build_and_run(&grid, &scenario, &cli) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    // Report
    let report = KpiReport::from_result(&result);
    println!("{report}");
    println!("Final frequencies for each area:");
    for i in 0..result.num_areas() {
        let hz = result.freq_hz(i);
        println!("Area {}: {:.4} Hz", i + 1, hz[hz.len() - 1]);
    }

    // Export CSV if requested
    if let Some(ref path) = cli.telemetry_out {
        if let Err(e) = export_csv(&result, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Telemetry written to {path}");
    }
}
