//! End-to-end test of the isolated single-area scenario: a 5% step load
//! increase at 30 s, AGC driving the area control error back to zero.

mod common;

use lfc_sim::config::GridConfig;
use lfc_sim::scenario::Scenario;

#[test]
fn full_run_produces_correct_step_count() {
    let grid = GridConfig::single_area();
    let result = common::run(&grid, &Scenario::step_5pct(1));
    assert_eq!(result.total_steps(), 30_000);
    assert_eq!(result.x[0].len(), 30_000);
}

#[test]
fn frequency_departs_only_after_the_attack_starts() {
    let grid = GridConfig::single_area();
    let result = common::run(&grid, &Scenario::step_5pct(1));
    let dev = result.freq_deviation(0);

    // quiescent up to and including the attack start index
    assert!(dev[..=3_000].iter().all(|&v| v == 0.0));
    // a load increase pulls frequency below nominal shortly after
    assert!(dev[3_050] < 0.0);
}

#[test]
fn transient_is_damped_and_ace_returns_to_zero() {
    let grid = GridConfig::single_area();
    let result = common::run(&grid, &Scenario::step_5pct(1));

    let dev = result.freq_deviation(0);
    let ace = result.ace(0);
    let total = result.total_steps();

    let peak_dev = dev.iter().fold(0.0_f64, |acc, &v| acc.max(v.abs()));
    let peak_ace = ace.iter().fold(0.0_f64, |acc, &v| acc.max(v.abs()));
    assert!(peak_dev > 1e-4, "the attack leaves no visible transient");
    assert!(peak_ace > 1e-4);

    // steady state well before the horizon: the last computed ACE sample
    // sits at total - 2
    let final_dev = dev[total - 1].abs();
    let final_ace = ace[total - 2].abs();
    assert!(final_dev < 1e-3, "frequency deviation {final_dev} did not settle");
    assert!(final_ace < 1e-3, "ACE {final_ace} did not settle");
    assert!(final_ace < peak_ace / 10.0);
}

#[test]
fn frequency_stays_in_a_plausible_band() {
    let grid = GridConfig::single_area();
    let result = common::run(&grid, &Scenario::step_5pct(1));
    for &hz in &result.freq_hz(0) {
        assert!(hz > 55.0 && hz < 65.0, "frequency {hz} Hz is non-physical");
    }
}

#[test]
fn isolated_area_has_no_tie_flow() {
    let grid = GridConfig::single_area();
    let result = common::run(&grid, &Scenario::step_5pct(1));
    assert!(result.tie_flow(0).iter().all(|&v| v == 0.0));
}

#[test]
fn quiet_scenario_never_moves() {
    let grid = GridConfig::single_area();
    let result = common::run(&grid, &common::quiet_scenario(1));
    assert!(result.freq_deviation(0).iter().all(|&v| v == 0.0));
    assert!(result.ace(0).iter().all(|&v| v == 0.0));
    assert!(result.agc_output(0).iter().all(|&v| v == 0.0));
}
