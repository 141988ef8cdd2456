/// Continuous state-space builder for one area.
pub mod area;
/// Zero-order-hold discretization.
pub mod discrete;
/// State-vector index bookkeeping.
pub mod layout;
