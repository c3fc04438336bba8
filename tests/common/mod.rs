//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use miner_dispatch::config::DispatchConfig;

/// Reference configuration (30 kWh battery, 20 kW miner, thresholds 55).
pub fn reference_config() -> DispatchConfig {
    DispatchConfig::reference()
}

/// Default PV threshold of the reference installation.
pub const PV_THRESHOLD: f64 = 55.0;

/// 24 hourly prices all equal to `price`.
pub fn flat_prices(price: f64) -> Vec<f64> {
    vec![price; 24]
}

/// Zero prices except `price` at `hour`.
pub fn prices_with(hour: usize, price: f64) -> Vec<f64> {
    let mut hourly = flat_prices(0.0);
    hourly[hour] = price;
    hourly
}

/// A varied but deterministic day of prices with an expensive evening peak.
pub fn varied_prices() -> Vec<f64> {
    (0..24)
        .map(|h| match h {
            18..=21 => 90.0 + h as f64,
            _ => ((h * 37) % 60) as f64,
        })
        .collect()
}

/// 96 zero PV values.
pub fn zero_pv() -> Vec<f64> {
    vec![0.0; 96]
}

/// Clear-sky PV bell from 06:00 to 20:00 peaking at `peak_kw` around 13:00.
pub fn bell_pv(peak_kw: f64) -> Vec<f64> {
    (0..96)
        .map(|slot| {
            let hour = slot as f64 / 4.0;
            if (6.0..20.0).contains(&hour) {
                let x = (hour - 6.0) / 14.0 * std::f64::consts::PI;
                peak_kw * x.sin()
            } else {
                0.0
            }
        })
        .collect()
}
