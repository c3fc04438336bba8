//! Quarter-hour slot expansion and day/night classification.

use std::ops::Range;

use tracing::debug;

use crate::config::DispatchConfig;

/// Hours in a simulated day.
pub const HOURS_PER_DAY: usize = 24;
/// Quarter-hour slots per hour.
pub const SLOTS_PER_HOUR: usize = 4;
/// Quarter-hour slots per simulated day.
pub const SLOTS_PER_DAY: usize = HOURS_PER_DAY * SLOTS_PER_HOUR;
/// Duration of one slot in hours.
pub const SLOT_HOURS: f64 = 1.0 / SLOTS_PER_HOUR as f64;

/// Hour of day a slot belongs to.
pub fn hour_of(slot: usize) -> usize {
    slot / SLOTS_PER_HOUR
}

/// Repeats every hourly price once per quarter-hour slot.
///
/// # Examples
///
/// ```
/// use miner_dispatch::sim::slots::expand_hourly;
///
/// let quarter = expand_hourly(&[1.0, 2.0]);
/// assert_eq!(quarter, vec![1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0]);
/// ```
pub fn expand_hourly(hourly: &[f64]) -> Vec<f64> {
    hourly
        .iter()
        .flat_map(|&price| std::iter::repeat_n(price, SLOTS_PER_HOUR))
        .collect()
}

/// Quarter-hour prices of one day together with the derived slot sets.
///
/// Night indices are kept in the order the night unfolds (evening first,
/// then the early morning), which is also the tie-break order used when the
/// discharge planner ranks night slots by price.
#[derive(Debug, Clone)]
pub struct SlotClassification {
    /// One price per slot.
    pub prices: Vec<f64>,
    /// Daytime slot range.
    pub daytime: Range<usize>,
    /// Night slots in evening-then-morning order.
    pub night: Vec<usize>,
    /// Daytime slots priced above the PV threshold.
    pub pv_eligible: Vec<bool>,
    /// Night slots priced above the night threshold, in `night` order.
    pub expensive_night: Vec<usize>,
}

impl SlotClassification {
    /// Expands `hourly` prices and classifies every slot.
    ///
    /// The caller is responsible for passing exactly [`HOURS_PER_DAY`] prices.
    pub fn new(hourly: &[f64], pv_threshold: f64, config: &DispatchConfig) -> Self {
        let prices = expand_hourly(hourly);
        let plan = &config.planning;
        let daytime = plan.day_start_hour * SLOTS_PER_HOUR..plan.day_end_hour * SLOTS_PER_HOUR;

        let night: Vec<usize> = (daytime.end..SLOTS_PER_DAY)
            .chain(0..daytime.start)
            .collect();

        let pv_eligible = (0..prices.len())
            .map(|slot| daytime.contains(&slot) && prices[slot] > pv_threshold)
            .collect();

        let expensive_night: Vec<usize> = night
            .iter()
            .copied()
            .filter(|&slot| prices[slot] > config.prices.night_threshold)
            .collect();

        debug!(
            night = night.len(),
            expensive_night = expensive_night.len(),
            "classified slots"
        );

        Self {
            prices,
            daytime,
            night,
            pv_eligible,
            expensive_night,
        }
    }

    /// Whether `slot` falls inside the daytime window.
    pub fn is_daytime(&self, slot: usize) -> bool {
        self.daytime.contains(&slot)
    }

    /// Whether PV surplus may charge the battery in `slot`.
    pub fn is_pv_eligible(&self, slot: usize) -> bool {
        self.pv_eligible.get(slot).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hourly_with(hour: usize, price: f64) -> Vec<f64> {
        let mut hourly = vec![0.0; HOURS_PER_DAY];
        hourly[hour] = price;
        hourly
    }

    #[test]
    fn expansion_repeats_each_hour_four_times() {
        let hourly: Vec<f64> = (0..HOURS_PER_DAY).map(|h| h as f64 * 1.5).collect();
        let quarter = expand_hourly(&hourly);
        assert_eq!(quarter.len(), SLOTS_PER_DAY);
        for (k, &price) in hourly.iter().enumerate() {
            assert!(quarter[4 * k..4 * k + 4].iter().all(|&p| p == price));
        }
        for i in 0..SLOTS_PER_DAY {
            assert_eq!(quarter[i], quarter[i - i % 4]);
        }
    }

    #[test]
    fn reference_day_and_night_split() {
        let slots = SlotClassification::new(&[0.0; 24], 55.0, &DispatchConfig::reference());
        assert_eq!(slots.daytime, 32..80);
        assert_eq!(slots.night.len(), 48);
        assert_eq!(slots.night[0], 80);
        assert_eq!(slots.night[15], 95);
        assert_eq!(slots.night[16], 0);
        assert_eq!(slots.night[47], 31);
        assert!(slots.night.iter().all(|&s| !slots.is_daytime(s)));
    }

    #[test]
    fn expensive_night_slots_follow_hour() {
        let slots = SlotClassification::new(&hourly_with(2, 80.0), 55.0, &DispatchConfig::reference());
        assert_eq!(slots.expensive_night, vec![8, 9, 10, 11]);
    }

    #[test]
    fn threshold_is_strict() {
        let slots = SlotClassification::new(&hourly_with(22, 55.0), 55.0, &DispatchConfig::reference());
        assert!(slots.expensive_night.is_empty());
    }

    #[test]
    fn pv_eligibility_is_daytime_only() {
        let mut hourly = vec![60.0; 24];
        hourly[12] = 10.0;
        let slots = SlotClassification::new(&hourly, 55.0, &DispatchConfig::reference());
        assert!(slots.is_pv_eligible(32));
        assert!(!slots.is_pv_eligible(48));
        assert!(!slots.is_pv_eligible(4));
        assert!(!slots.is_pv_eligible(90));
        assert_eq!(slots.pv_eligible.iter().filter(|&&e| e).count(), 44);
    }

    #[test]
    fn hour_of_slot() {
        assert_eq!(hour_of(0), 0);
        assert_eq!(hour_of(31), 7);
        assert_eq!(hour_of(32), 8);
        assert_eq!(hour_of(95), 23);
    }
}
