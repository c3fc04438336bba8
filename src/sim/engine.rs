//! Dispatch engine that walks the day slot by slot.

use tracing::debug;

use crate::config::{ChargePriority, DispatchConfig};
use crate::devices::Battery;
use crate::error::{Series, SimError};

use super::clock::{Slot, SlotClock};
use super::plan::DischargePlan;
use super::slots::{HOURS_PER_DAY, SLOTS_PER_DAY, SlotClassification};
use super::types::{Schedule, ScheduleRow};

/// Charging and discharging decisions taken in one slot.
#[derive(Debug, Default, Clone, Copy)]
struct SlotFlows {
    grid_charge_kw: f64,
    pv_charge_kw: f64,
    discharge_kw: f64,
    miner_kw: f64,
    grid_used_kw: f64,
}

/// Simulation engine owning the battery and the precomputed day plan.
///
/// Every run owns its state, so independent runs (for example the same day
/// under several configurations) can execute in parallel.
pub struct Engine<'a> {
    config: &'a DispatchConfig,
    pv_forecast: &'a [f64],
    slots: SlotClassification,
    plan: DischargePlan,
    battery: Battery,
    /// Daytime slots whose grid-charge opportunity has not been used yet.
    grid_pending: Vec<bool>,
    clock: SlotClock,
}

impl<'a> Engine<'a> {
    /// Validates the inputs and prepares classification and discharge plan.
    ///
    /// # Arguments
    ///
    /// * `config` - Battery, miner and threshold configuration
    /// * `hourly_prices` - 24 hourly spot prices
    /// * `pv_forecast` - 96 quarter-hour PV forecasts (kW)
    /// * `pv_threshold` - Daytime price above which PV charging is allowed
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidInputShape` for wrong-length series and
    /// `SimError::MalformedValue` for NaN or infinite entries.
    pub fn new(
        config: &'a DispatchConfig,
        hourly_prices: &[f64],
        pv_forecast: &'a [f64],
        pv_threshold: f64,
    ) -> Result<Self, SimError> {
        SimError::check_shape(Series::HourlyPrices, hourly_prices, HOURS_PER_DAY)?;
        SimError::check_shape(Series::PvForecast, pv_forecast, SLOTS_PER_DAY)?;
        SimError::check_finite(Series::HourlyPrices, hourly_prices)?;
        SimError::check_finite(Series::PvForecast, pv_forecast)?;

        let battery = Battery::full(&config.battery);
        let slots = SlotClassification::new(hourly_prices, pv_threshold, config);
        let plan = DischargePlan::new(
            &slots,
            battery.soc_kwh,
            battery.soc_min_kwh,
            config.planning.fallback_slots,
        );
        let grid_pending = (0..SLOTS_PER_DAY).map(|s| slots.is_daytime(s)).collect();

        Ok(Self {
            config,
            pv_forecast,
            slots,
            plan,
            battery,
            grid_pending,
            clock: SlotClock::new(),
        })
    }

    /// Executes the next slot of the day and returns its schedule row.
    ///
    /// Returns `None` once all slots have been executed.
    pub fn step(&mut self) -> Option<ScheduleRow> {
        let slot = self.clock.tick()?;
        Some(self.execute(slot))
    }

    /// Applies the charge, discharge and cap rules to `slot`.
    fn execute(&mut self, slot: Slot) -> ScheduleRow {
        let t = slot.index;
        let soc_at_start = self.battery.soc_kwh;
        let pv_kw = self.pv_forecast[t];
        let daytime = self.slots.is_daytime(t);

        let mut flows = SlotFlows::default();

        // 1. Charging
        if daytime && !self.battery.is_full() {
            self.charge(t, pv_kw, &mut flows);
        }

        // 2. Discharge or miner supply
        let target_kw = self.config.miner.target_kw;
        match self
            .plan
            .planned_kw(t)
            .filter(|_| self.battery.is_above_floor())
        {
            Some(planned_kw) => {
                flows.discharge_kw = self.battery.discharge(planned_kw);
                flows.miner_kw = flows.discharge_kw;
            }
            None if !daytime => {
                flows.miner_kw = target_kw;
                flows.grid_used_kw += target_kw;
            }
            None => {
                flows.miner_kw = target_kw;
                if self.config.charging.count_daytime_miner_grid {
                    flows.grid_used_kw += target_kw;
                }
            }
        }

        // 3. Cap before the next slot reads it
        self.battery.cap();

        debug!(
            slot = t,
            soc_at_start,
            soc_at_end = self.battery.soc_kwh,
            grid_used_kw = flows.grid_used_kw,
            "stepped"
        );

        ScheduleRow {
            slot: t,
            time: slot.start,
            price: self.slots.prices[t],
            pv_kw,
            miner_kw: flows.miner_kw,
            grid_charge_kw: flows.grid_charge_kw,
            pv_charge_kw: flows.pv_charge_kw,
            discharge_kw: flows.discharge_kw,
            grid_used_kw: flows.grid_used_kw,
            soc_kwh: soc_at_start,
        }
    }

    /// Applies at most one charging action in a daytime slot with headroom.
    fn charge(&mut self, t: usize, pv_kw: f64, flows: &mut SlotFlows) {
        let surplus_kw = pv_kw - self.config.miner.target_kw;
        let pv_ok = self.slots.is_pv_eligible(t) && surplus_kw > 0.0;

        match self.config.charging.priority {
            ChargePriority::GridFirst => {
                if self.take_grid_slot(t) {
                    self.charge_from_grid(flows);
                } else if pv_ok {
                    flows.pv_charge_kw = self.battery.charge(surplus_kw);
                }
            }
            ChargePriority::PvFirst => {
                if pv_ok {
                    flows.pv_charge_kw = self.battery.charge(surplus_kw);
                } else if self.take_grid_slot(t) {
                    self.charge_from_grid(flows);
                }
            }
        }
    }

    fn charge_from_grid(&mut self, flows: &mut SlotFlows) {
        flows.grid_charge_kw = self.battery.charge(self.battery.power_limit_kw);
        flows.grid_used_kw += flows.grid_charge_kw;
    }

    /// Consumes the grid-charge opportunity of slot `t`.
    fn take_grid_slot(&mut self, t: usize) -> bool {
        std::mem::replace(&mut self.grid_pending[t], false)
    }

    /// Executes all slots of the day and returns the schedule.
    pub fn run(mut self) -> Schedule {
        let mut rows = Vec::with_capacity(SLOTS_PER_DAY);
        while let Some(row) = self.step() {
            rows.push(row);
        }
        debug!(
            basis = ?self.plan.basis(),
            final_soc_kwh = self.battery.soc_kwh,
            "simulated day"
        );
        Schedule {
            basis: self.plan.basis(),
            rows,
        }
    }

    /// Returns the discharge plan computed for this day.
    pub fn plan(&self) -> &DischargePlan {
        &self.plan
    }

    /// Returns a reference to the battery.
    pub fn battery(&self) -> &Battery {
        &self.battery
    }
}

/// Simulates one day and returns its 96-slot schedule.
///
/// # Errors
///
/// Fails before any simulation work if either series has the wrong length or
/// holds a non-finite value.
///
/// # Examples
///
/// ```
/// use miner_dispatch::config::DispatchConfig;
/// use miner_dispatch::sim::engine::simulate;
///
/// let config = DispatchConfig::reference();
/// let schedule = simulate(&config, &[0.0; 24], &[0.0; 96], 55.0).unwrap();
/// assert_eq!(schedule.len(), 96);
/// assert_eq!(schedule.rows[0].soc_kwh, 30.0);
/// ```
pub fn simulate(
    config: &DispatchConfig,
    hourly_prices: &[f64],
    pv_forecast: &[f64],
    pv_threshold: f64,
) -> Result<Schedule, SimError> {
    Ok(Engine::new(config, hourly_prices, pv_forecast, pv_threshold)?.run())
}
