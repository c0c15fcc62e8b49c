//! Room model.
//!
//! Rooms host lectures. Seat capacity doubles as the monetary cost
//! proxy used by the room-budget objective and the combination
//! generator.

use serde::{Deserialize, Serialize};

/// A lecture room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Seat capacity.
    pub capacity: u32,
    /// Building the room belongs to, if known.
    pub building: Option<String>,
}

impl Room {
    /// Creates a room with the given id and capacity.
    pub fn new(id: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            capacity,
            building: None,
        }
    }

    /// Sets the building.
    pub fn with_building(mut self, building: impl Into<String>) -> Self {
        self.building = Some(building.into());
        self
    }

    /// Monetary cost proxy: the seat capacity.
    #[inline]
    pub fn cost(&self) -> u64 {
        u64::from(self.capacity)
    }
}

/// All rooms at one distinct capacity value.
///
/// Brackets drive the stage-I structural pre-check: courses that need
/// more than a bracket's capacity can only go to rooms above it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomBracket {
    /// The capacity value shared by the member rooms.
    pub capacity: u32,
    /// Ids of the rooms at this capacity.
    pub rooms: Vec<String>,
}

impl RoomBracket {
    /// Builds the bracket for `capacity` from a room list.
    pub fn new(rooms: &[Room], capacity: u32) -> Self {
        Self {
            capacity,
            rooms: rooms
                .iter()
                .filter(|r| r.capacity == capacity)
                .map(|r| r.id.clone())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_cost_is_capacity() {
        let r = Room::new("R1", 120).with_building("B");
        assert_eq!(r.cost(), 120);
        assert_eq!(r.building.as_deref(), Some("B"));
    }

    #[test]
    fn test_bracket_collects_matching_rooms() {
        let rooms = vec![Room::new("A", 30), Room::new("B", 50), Room::new("C", 30)];
        let bracket = RoomBracket::new(&rooms, 30);
        assert_eq!(bracket.capacity, 30);
        assert_eq!(bracket.rooms, vec!["A".to_string(), "C".to_string()]);
    }
}
