//! Day-ahead battery dispatch for a fixed-load miner with PV and spot prices.

pub mod cli;
pub mod config;
pub mod devices;
pub mod error;
pub mod io;
/// Slot classification, discharge planning and the dispatch engine.
pub mod sim;
