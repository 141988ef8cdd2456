/// CSV export of simulation time series.
pub mod export;
