//! Night-time discharge planning.

use tracing::debug;

use super::slots::{SLOTS_PER_DAY, SlotClassification};

/// How the discharge slots were chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanBasis {
    /// Every night slot priced above the night threshold.
    ExpensiveNight,
    /// No night slot was expensive: the highest-priced night slots instead.
    TopPriced,
}

/// Energy earmarked for the miner in selected night slots.
///
/// The plan is fixed before the step loop starts and is only read afterwards.
#[derive(Debug, Clone)]
pub struct DischargePlan {
    basis: PlanBasis,
    per_slot: Vec<Option<f64>>,
    slots: Vec<usize>,
}

impl DischargePlan {
    /// Splits `initial_soc_kwh - soc_min_kwh` equally over the discharge slots.
    ///
    /// The discharge slots are the expensive night slots when there are any,
    /// otherwise the `fallback_slots` most expensive night slots. Equal prices
    /// keep their night order.
    pub fn new(
        slots: &SlotClassification,
        initial_soc_kwh: f64,
        soc_min_kwh: f64,
        fallback_slots: usize,
    ) -> Self {
        let (basis, chosen) = if slots.expensive_night.is_empty() {
            let mut ranked = slots.night.clone();
            ranked.sort_by(|&a, &b| slots.prices[b].total_cmp(&slots.prices[a]));
            ranked.truncate(fallback_slots);
            (PlanBasis::TopPriced, ranked)
        } else {
            (PlanBasis::ExpensiveNight, slots.expensive_night.clone())
        };

        let mut per_slot = vec![None; SLOTS_PER_DAY];
        if !chosen.is_empty() {
            let draw_kw = (initial_soc_kwh - soc_min_kwh) / chosen.len() as f64;
            for &slot in &chosen {
                per_slot[slot] = Some(draw_kw);
            }
            debug!(?basis, slots = chosen.len(), draw_kw, "planned discharge");
        }

        Self {
            basis,
            per_slot,
            slots: chosen,
        }
    }

    pub fn basis(&self) -> PlanBasis {
        self.basis
    }

    /// Planned discharge for `slot`, if any.
    pub fn planned_kw(&self, slot: usize) -> Option<f64> {
        self.per_slot.get(slot).copied().flatten()
    }

    /// Discharge slots in selection order.
    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    /// Sum of all planned discharge amounts.
    pub fn total(&self) -> f64 {
        self.per_slot.iter().flatten().sum()
    }
}
