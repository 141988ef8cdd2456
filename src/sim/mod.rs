/// Incremental (velocity-form) PID controller for AGC.
pub mod controller;
/// Attack windows and piecewise-constant load series.
pub mod disturbance;
pub mod engine;
pub mod kpi;
pub mod types;
