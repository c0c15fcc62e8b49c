//! Assignment model.
//!
//! An assignment places one lecture occurrence of a course at a time
//! slot, optionally in a room. Identity is value equality on the full
//! triple; a candidate solution is a *set* of assignments, so repeated
//! identical triples collapse.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::TimeSlot;

/// One lecture occurrence: (course, slot, room?).
///
/// The room is absent for stage-I candidates where only the time-slot
/// pattern is being planned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    /// Id of the assigned course.
    pub course: String,
    /// The time slot.
    pub slot: TimeSlot,
    /// Id of the room, if rooms are planned.
    pub room: Option<String>,
}

impl Assignment {
    /// Creates a full assignment with a room.
    pub fn new(course: impl Into<String>, slot: TimeSlot, room: impl Into<String>) -> Self {
        Self {
            course: course.into(),
            slot,
            room: Some(room.into()),
        }
    }

    /// Creates a room-less (stage-I) assignment.
    pub fn stage_one(course: impl Into<String>, slot: TimeSlot) -> Self {
        Self {
            course: course.into(),
            slot,
            room: None,
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.room {
            Some(room) => write!(f, "{} {} {}", self.course, self.slot, room),
            None => write!(f, "{} {}", self.course, self.slot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identity_is_the_triple() {
        let a = Assignment::new("c1", TimeSlot::new(0, 1), "R1");
        let b = Assignment::new("c1", TimeSlot::new(0, 1), "R1");
        let c = Assignment::new("c1", TimeSlot::new(0, 1), "R2");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, Assignment::stage_one("c1", TimeSlot::new(0, 1)));
    }

    #[test]
    fn test_duplicates_collapse_in_a_set() {
        let set: HashSet<_> = [
            Assignment::new("c1", TimeSlot::new(0, 1), "R1"),
            Assignment::new("c1", TimeSlot::new(0, 1), "R1"),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_display() {
        let a = Assignment::new("c1", TimeSlot::new(2, 3), "R1");
        assert_eq!(a.to_string(), "c1 2_3 R1");
        let s = Assignment::stage_one("c1", TimeSlot::new(2, 3));
        assert_eq!(s.to_string(), "c1 2_3");
    }
}
