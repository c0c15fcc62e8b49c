//! Time slot model.
//!
//! A time slot is a (day, period) cell in the weekly timetable grid.
//! Identity is value equality on the pair. Slots at the edge of the
//! week or the edge of a day carry an undesirability cost that feeds
//! the `BadTimeslots` soft criterion.
//!
//! # Reference
//! Bonutti et al. (2012), "Benchmarking curriculum-based course
//! timetabling: formulations, data formats, instances"

use serde::{Deserialize, Serialize};
use std::fmt;

/// A (day, period) cell in the timetable grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Day of the week (0-based).
    pub day: u8,
    /// Period within the day (0-based).
    pub period: u8,
}

impl TimeSlot {
    /// Creates a time slot at the given day and period.
    pub fn new(day: u8, period: u8) -> Self {
        Self { day, period }
    }

    /// Undesirability cost of this slot.
    ///
    /// One unit for an edge-of-week day (first or seventh), one unit
    /// for an edge-of-day period (first, or sixth and later).
    pub fn cost(&self) -> u32 {
        let day_penalty = u32::from(self.day == 0 || self.day == 6);
        let period_penalty = u32::from(self.period == 0 || self.period >= 5);
        day_penalty + period_penalty
    }

    /// Whether two slots are consecutive: same day, periods differing by one.
    pub fn is_consecutive(&self, other: &TimeSlot) -> bool {
        self.day == other.day && self.period.abs_diff(other.period) == 1
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.day, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_identity_by_value() {
        assert_eq!(TimeSlot::new(1, 2), TimeSlot::new(1, 2));
        assert_ne!(TimeSlot::new(1, 2), TimeSlot::new(2, 1));
    }

    #[test]
    fn test_slot_cost() {
        assert_eq!(TimeSlot::new(2, 3).cost(), 0); // mid-week, mid-day
        assert_eq!(TimeSlot::new(0, 3).cost(), 1); // first day
        assert_eq!(TimeSlot::new(6, 3).cost(), 1); // last day
        assert_eq!(TimeSlot::new(2, 0).cost(), 1); // first period
        assert_eq!(TimeSlot::new(2, 5).cost(), 1); // late period
        assert_eq!(TimeSlot::new(0, 0).cost(), 2); // both edges
    }

    #[test]
    fn test_consecutive_same_day_only() {
        let a = TimeSlot::new(1, 2);
        assert!(a.is_consecutive(&TimeSlot::new(1, 3)));
        assert!(a.is_consecutive(&TimeSlot::new(1, 1)));
        assert!(!a.is_consecutive(&TimeSlot::new(1, 4)));
        assert!(!a.is_consecutive(&TimeSlot::new(2, 3))); // different day
        assert!(!a.is_consecutive(&a)); // not consecutive with itself
    }

    #[test]
    fn test_slot_display() {
        assert_eq!(TimeSlot::new(3, 4).to_string(), "3_4");
    }
}
