//! Schedule records produced by a dispatch run.

use std::fmt;

use chrono::NaiveTime;

use super::plan::PlanBasis;

/// Complete record of one quarter-hour slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRow {
    /// Slot index.
    pub slot: usize,
    /// Slot start time.
    pub time: NaiveTime,
    /// Quarter-hour spot price (currency/MWh).
    pub price: f64,
    /// PV production forecast (kW).
    pub pv_kw: f64,
    /// Power delivered to the miner (kW).
    pub miner_kw: f64,
    /// Grid power put into the battery (kW).
    pub grid_charge_kw: f64,
    /// PV power put into the battery (kW).
    pub pv_charge_kw: f64,
    /// Battery discharge power (kW).
    pub discharge_kw: f64,
    /// Grid draw for charging and for the miner (kW).
    pub grid_used_kw: f64,
    /// State of charge at the start of the slot (kWh).
    pub soc_kwh: f64,
}

impl fmt::Display for ScheduleRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | price={:>7.2} pv={:>6.2} kW | miner={:>6.2} kW  grid={:>6.2} kW | \
             charge(grid={:.2}, pv={:.2})  discharge={:.2} | SoC={:>6.2} kWh",
            self.time.format("%H:%M"),
            self.price,
            self.pv_kw,
            self.miner_kw,
            self.grid_used_kw,
            self.grid_charge_kw,
            self.pv_charge_kw,
            self.discharge_kw,
            self.soc_kwh,
        )
    }
}

/// The full day schedule, one row per slot in chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    /// How the night discharge slots were chosen.
    pub basis: PlanBasis,
    pub rows: Vec<ScheduleRow>,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_row_display_does_not_panic() {
        let r = ScheduleRow {
            slot: 37,
            time: NaiveTime::from_hms_opt(9, 15, 0).unwrap(),
            price: 42.0,
            pv_kw: 12.5,
            miner_kw: 20.0,
            grid_charge_kw: 5.0,
            pv_charge_kw: 0.0,
            discharge_kw: 0.0,
            grid_used_kw: 5.0,
            soc_kwh: 24.3,
        };
        let s = format!("{r}");
        assert!(s.starts_with("09:15 |"));
        assert!(s.contains("SoC= 24.30 kWh"));
    }
}
