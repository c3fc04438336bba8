//! Post-hoc day totals computed from a schedule.

use std::fmt;

use super::slots::SLOT_HOURS;
use super::types::ScheduleRow;

/// Aggregate figures derived from a complete day schedule.
///
/// Computed post-hoc from the rows so that the report always agrees with the
/// exported table, including its accounting quirks.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    /// Energy drawn from the grid (kWh).
    pub grid_energy_kwh: f64,
    /// Cost of the grid energy at the slot prices (currency).
    pub grid_cost: f64,
    /// Energy sent from the grid into the battery (kWh).
    pub grid_charge_kwh: f64,
    /// Energy sent from PV into the battery (kWh).
    pub pv_charge_kwh: f64,
    /// Energy delivered by the battery (kWh).
    pub discharge_kwh: f64,
    /// Energy delivered to the miner (kWh).
    pub miner_energy_kwh: f64,
    /// Lowest start-of-slot state of charge (kWh).
    pub min_soc_kwh: f64,
    /// State of charge at the start of the last slot (kWh).
    pub last_soc_kwh: f64,
}

impl DaySummary {
    /// Computes the totals of `rows`.
    ///
    /// Prices are per MWh and flows are in kW, so a slot costs
    /// `grid_used_kw * 0.25 h * price / 1000`.
    pub fn from_rows(rows: &[ScheduleRow]) -> Self {
        let mut summary = Self {
            grid_energy_kwh: 0.0,
            grid_cost: 0.0,
            grid_charge_kwh: 0.0,
            pv_charge_kwh: 0.0,
            discharge_kwh: 0.0,
            miner_energy_kwh: 0.0,
            min_soc_kwh: 0.0,
            last_soc_kwh: 0.0,
        };
        let Some(last) = rows.last() else {
            return summary;
        };

        summary.min_soc_kwh = f64::INFINITY;
        for r in rows {
            let grid_kwh = r.grid_used_kw * SLOT_HOURS;
            summary.grid_energy_kwh += grid_kwh;
            summary.grid_cost += grid_kwh * r.price / 1000.0;
            summary.grid_charge_kwh += r.grid_charge_kw * SLOT_HOURS;
            summary.pv_charge_kwh += r.pv_charge_kw * SLOT_HOURS;
            summary.discharge_kwh += r.discharge_kw * SLOT_HOURS;
            summary.miner_energy_kwh += r.miner_kw * SLOT_HOURS;
            summary.min_soc_kwh = summary.min_soc_kwh.min(r.soc_kwh);
        }
        summary.last_soc_kwh = last.soc_kwh;
        summary
    }
}

impl fmt::Display for DaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Day Summary ---")?;
        writeln!(f, "Grid energy:        {:.2} kWh", self.grid_energy_kwh)?;
        writeln!(f, "Grid cost:          {:.2}", self.grid_cost)?;
        writeln!(
            f,
            "Battery charged:    {:.2} kWh grid, {:.2} kWh PV",
            self.grid_charge_kwh, self.pv_charge_kwh
        )?;
        writeln!(f, "Battery discharged: {:.2} kWh", self.discharge_kwh)?;
        writeln!(f, "Miner energy:       {:.2} kWh", self.miner_energy_kwh)?;
        write!(
            f,
            "SoC:                min {:.2} kWh, last {:.2} kWh",
            self.min_soc_kwh, self.last_soc_kwh
        )
    }
}
