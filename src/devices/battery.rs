use crate::config::BatteryConfig;
use crate::sim::slots::SLOT_HOURS;

/// A battery whose state of charge is tracked in kWh over quarter-hour slots.
///
/// Efficiency is applied on both sides: stored energy grows by
/// `power * eta * dt` when charging and shrinks by `power / eta * dt` when
/// discharging. Charge and discharge amounts are bounded by the power limit
/// and by the SoC headroom measured in kWh, so a single slot never overshoots
/// `capacity_kwh` or undershoots `soc_min_kwh`.
#[derive(Debug, Clone)]
pub struct Battery {
    /// Battery capacity in kilowatt-hours.
    pub capacity_kwh: f64,

    /// Lowest allowed state of charge in kilowatt-hours.
    pub soc_min_kwh: f64,

    /// Current state of charge in kilowatt-hours.
    pub soc_kwh: f64,

    /// Charge and discharge power limit in kilowatts.
    pub power_limit_kw: f64,

    /// Charge and discharge efficiency (0..1.0).
    pub eta: f64,
}

impl Battery {
    /// Creates a full battery from its configuration.
    pub fn full(config: &BatteryConfig) -> Self {
        Self {
            capacity_kwh: config.capacity_kwh,
            soc_min_kwh: config.soc_min_kwh,
            soc_kwh: config.capacity_kwh,
            power_limit_kw: config.power_limit_kw,
            eta: config.efficiency,
        }
    }

    /// Room left below capacity (kWh).
    pub fn headroom_kwh(&self) -> f64 {
        self.capacity_kwh - self.soc_kwh
    }

    /// Energy above the floor (kWh).
    pub fn available_kwh(&self) -> f64 {
        self.soc_kwh - self.soc_min_kwh
    }

    pub fn is_full(&self) -> bool {
        self.soc_kwh >= self.capacity_kwh
    }

    pub fn is_above_floor(&self) -> bool {
        self.soc_kwh > self.soc_min_kwh
    }

    /// Charges with up to `offered_kw` for one slot and returns the power taken.
    ///
    /// The taken power is capped by the power limit and by the headroom in kWh.
    pub fn charge(&mut self, offered_kw: f64) -> f64 {
        let taken_kw = offered_kw
            .min(self.power_limit_kw)
            .min(self.headroom_kwh())
            .max(0.0);
        self.soc_kwh += taken_kw * self.eta * SLOT_HOURS;
        taken_kw
    }

    /// Discharges up to `requested_kw` for one slot and returns the power delivered.
    ///
    /// The delivered power is capped by the power limit and by the energy above
    /// the floor in kWh.
    pub fn discharge(&mut self, requested_kw: f64) -> f64 {
        let delivered_kw = requested_kw
            .min(self.power_limit_kw)
            .min(self.available_kwh())
            .max(0.0);
        self.soc_kwh -= delivered_kw / self.eta * SLOT_HOURS;
        delivered_kw
    }

    /// Clamps the state of charge to capacity.
    pub fn cap(&mut self) {
        self.soc_kwh = self.soc_kwh.min(self.capacity_kwh);
    }
}
