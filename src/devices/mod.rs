//! Device models used by the dispatch engine.

/// Stationary battery storage model.
pub mod battery;

pub use battery::Battery;
