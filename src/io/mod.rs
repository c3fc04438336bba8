//! Input parsing and schedule export.

/// CSV export of schedules.
pub mod export;
/// Price list and PV forecast readers.
pub mod input;
