use chrono::NaiveTime;

use super::slots::{SLOTS_PER_DAY, SLOTS_PER_HOUR, hour_of};

/// One quarter-hour slot of the simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Slot index in `0..96`.
    pub index: usize,
    /// Wall-clock time at which the slot starts.
    pub start: NaiveTime,
}

impl Slot {
    pub fn new(index: usize) -> Self {
        let hour = hour_of(index);
        let minute = (index % SLOTS_PER_HOUR) * 15;
        Self {
            index,
            start: NaiveTime::from_hms_opt(hour as u32, minute as u32, 0)
                .unwrap_or(NaiveTime::MIN),
        }
    }
}

/// A simulation clock that walks the quarter-hour slots of one day.
///
/// # Examples
///
/// ```
/// use miner_dispatch::sim::clock::SlotClock;
///
/// let mut clock = SlotClock::new();
/// let first = clock.tick().unwrap();
/// assert_eq!(first.index, 0);
/// assert_eq!(first.start.to_string(), "00:00:00");
/// assert_eq!(clock.count(), 95);
/// ```
#[derive(Debug, Default)]
pub struct SlotClock {
    /// Index of the next slot to hand out.
    current: usize,
}

impl SlotClock {
    pub fn new() -> Self {
        Self { current: 0 }
    }

    /// Advances the clock by one slot.
    ///
    /// # Returns
    ///
    /// * `Some(slot)` - The slot starting now
    /// * `None` - If the day is over
    pub fn tick(&mut self) -> Option<Slot> {
        if self.current < SLOTS_PER_DAY {
            let slot = Slot::new(self.current);
            self.current += 1;
            Some(slot)
        } else {
            None
        }
    }
}

impl Iterator for SlotClock {
    type Item = Slot;

    fn next(&mut self) -> Option<Slot> {
        self.tick()
    }
}
