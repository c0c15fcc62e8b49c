//! Course model.
//!
//! A course owns a required number of weekly lecture occurrences, a
//! minimum-working-days target, and the sets of time slots and rooms
//! it must avoid. The per-day view of the unavailable slots is kept
//! coherent by the mutators, so readers never see a stale index.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::TimeSlot;

/// A course to be timetabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier.
    pub id: String,
    /// Id of the owning lecturer.
    pub lecturer: String,
    /// Required number of weekly lecture occurrences.
    pub lectures: u32,
    /// Minimum number of distinct days the lectures should spread over.
    pub minimum_working_days: u32,
    /// Enrolled student count.
    pub students: u32,
    /// Rooms this course must not be placed in.
    pub unsuitable_rooms: HashSet<String>,
    /// Ids of the curricula this course belongs to.
    pub curricula: HashSet<String>,
    unavailable_slots: HashSet<TimeSlot>,
    unavailable_periods: HashMap<u8, HashSet<u8>>,
}

impl Course {
    /// Creates a course with the given scheduling data.
    pub fn new(
        id: impl Into<String>,
        lecturer: impl Into<String>,
        lectures: u32,
        minimum_working_days: u32,
        students: u32,
    ) -> Self {
        Self {
            id: id.into(),
            lecturer: lecturer.into(),
            lectures,
            minimum_working_days,
            students,
            unsuitable_rooms: HashSet::new(),
            curricula: HashSet::new(),
            unavailable_slots: HashSet::new(),
            unavailable_periods: HashMap::new(),
        }
    }

    /// Marks a time slot unavailable.
    pub fn with_unavailable(mut self, slot: TimeSlot) -> Self {
        self.add_unavailable(slot);
        self
    }

    /// Marks a room unsuitable.
    pub fn with_unsuitable_room(mut self, room: impl Into<String>) -> Self {
        self.unsuitable_rooms.insert(room.into());
        self
    }

    /// Adds a curriculum membership.
    pub fn with_curriculum(mut self, curriculum: impl Into<String>) -> Self {
        self.curricula.insert(curriculum.into());
        self
    }

    /// Marks a time slot unavailable, updating the per-day index.
    ///
    /// Returns `false` if the slot was already marked.
    pub fn add_unavailable(&mut self, slot: TimeSlot) -> bool {
        let added = self.unavailable_slots.insert(slot);
        if added {
            self.unavailable_periods
                .entry(slot.day)
                .or_default()
                .insert(slot.period);
        }
        added
    }

    /// Clears an unavailability mark, updating the per-day index.
    ///
    /// Returns `false` if the slot was not marked.
    pub fn remove_unavailable(&mut self, slot: TimeSlot) -> bool {
        let removed = self.unavailable_slots.remove(&slot);
        if removed {
            if let Some(periods) = self.unavailable_periods.get_mut(&slot.day) {
                periods.remove(&slot.period);
                if periods.is_empty() {
                    self.unavailable_periods.remove(&slot.day);
                }
            }
        }
        removed
    }

    /// The unavailable time slots.
    pub fn unavailable_slots(&self) -> &HashSet<TimeSlot> {
        &self.unavailable_slots
    }

    /// Unavailable periods grouped by day.
    pub fn unavailable_periods(&self) -> &HashMap<u8, HashSet<u8>> {
        &self.unavailable_periods
    }

    /// Whether the course cannot be scheduled at `slot`.
    pub fn is_unavailable(&self, slot: &TimeSlot) -> bool {
        self.unavailable_slots.contains(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_builder() {
        let c = Course::new("c0001", "t01", 3, 2, 80)
            .with_unavailable(TimeSlot::new(0, 0))
            .with_unsuitable_room("R1")
            .with_curriculum("q1");

        assert_eq!(c.id, "c0001");
        assert_eq!(c.lecturer, "t01");
        assert_eq!(c.lectures, 3);
        assert_eq!(c.minimum_working_days, 2);
        assert_eq!(c.students, 80);
        assert!(c.is_unavailable(&TimeSlot::new(0, 0)));
        assert!(c.unsuitable_rooms.contains("R1"));
        assert!(c.curricula.contains("q1"));
    }

    #[test]
    fn test_unavailable_index_stays_coherent() {
        let mut c = Course::new("c1", "t1", 1, 1, 10);
        assert!(c.add_unavailable(TimeSlot::new(1, 2)));
        assert!(c.add_unavailable(TimeSlot::new(1, 3)));
        assert!(!c.add_unavailable(TimeSlot::new(1, 3))); // already marked

        let periods = &c.unavailable_periods()[&1];
        assert_eq!(periods.len(), 2);

        assert!(c.remove_unavailable(TimeSlot::new(1, 2)));
        assert_eq!(c.unavailable_periods()[&1].len(), 1);

        // removing the last period on a day drops the day entry
        assert!(c.remove_unavailable(TimeSlot::new(1, 3)));
        assert!(c.unavailable_periods().is_empty());
        assert!(!c.remove_unavailable(TimeSlot::new(1, 3)));
    }
}
