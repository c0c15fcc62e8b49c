//! Problem instance: the immutable registry snapshot.
//!
//! An instance bundles the course, room, curriculum, and lecturer
//! registries with the weekly grid shape. It is built once per
//! problem and treated as read-only by the scorer, the combination
//! generator, and the explorer; any data preparation (extra slots,
//! room substitutions) happens before construction.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::{Course, Curriculum, Lecturer, Room, RoomBracket, TimeSlot};

/// A read-only snapshot of one timetabling problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    /// Instance name (for reports).
    pub name: String,
    /// Number of days in the week.
    pub days: u8,
    /// Number of periods per day.
    pub periods_per_day: u8,
    /// Minimum curriculum occurrences per day before a load penalty.
    pub min_daily_load: u32,
    /// Maximum curriculum occurrences per day before a load penalty.
    pub max_daily_load: u32,
    courses: Vec<Course>,
    rooms: Vec<Room>,
    curricula: Vec<Curriculum>,
    lecturers: Vec<Lecturer>,
    time_slots: Vec<TimeSlot>,
    brackets: Vec<RoomBracket>,
    course_index: HashMap<String, usize>,
    room_index: HashMap<String, usize>,
}

impl Instance {
    /// Builds an instance over a `days` × `periods_per_day` grid.
    ///
    /// The time-slot grid and the capacity brackets are derived here,
    /// once. The daily load window defaults to unbounded.
    pub fn new(
        courses: Vec<Course>,
        lecturers: Vec<Lecturer>,
        rooms: Vec<Room>,
        curricula: Vec<Curriculum>,
        days: u8,
        periods_per_day: u8,
    ) -> Self {
        let time_slots = (0..days)
            .flat_map(|d| (0..periods_per_day).map(move |p| TimeSlot::new(d, p)))
            .collect();
        let brackets = derive_brackets(&rooms);
        let course_index = courses
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();
        let room_index = rooms
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();

        Self {
            name: String::new(),
            days,
            periods_per_day,
            min_daily_load: 0,
            max_daily_load: u32::MAX,
            courses,
            rooms,
            curricula,
            lecturers,
            time_slots,
            brackets,
            course_index,
            room_index,
        }
    }

    /// Sets the instance name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the curriculum daily-load window.
    pub fn with_daily_load_window(mut self, min: u32, max: u32) -> Self {
        self.min_daily_load = min;
        self.max_daily_load = max;
        self
    }

    /// All courses.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// All rooms.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// All curricula.
    pub fn curricula(&self) -> &[Curriculum] {
        &self.curricula
    }

    /// All lecturers.
    pub fn lecturers(&self) -> &[Lecturer] {
        &self.lecturers
    }

    /// The full time-slot grid.
    pub fn time_slots(&self) -> &[TimeSlot] {
        &self.time_slots
    }

    /// The derived capacity brackets, ascending by capacity.
    pub fn capacity_brackets(&self) -> &[RoomBracket] {
        &self.brackets
    }

    /// Looks up a course by id.
    pub fn course(&self, id: &str) -> Option<&Course> {
        self.course_index.get(id).map(|&i| &self.courses[i])
    }

    /// Looks up a room by id.
    pub fn room(&self, id: &str) -> Option<&Room> {
        self.room_index.get(id).map(|&i| &self.rooms[i])
    }

    /// Whether the slot lies inside the grid.
    pub fn contains_slot(&self, slot: &TimeSlot) -> bool {
        slot.day < self.days && slot.period < self.periods_per_day
    }

    /// The slots of one day.
    pub fn slots_on_day(&self, day: u8) -> impl Iterator<Item = &TimeSlot> {
        self.time_slots.iter().filter(move |s| s.day == day)
    }

    /// The member courses of a curriculum that exist in the registry.
    pub fn curriculum_courses<'a>(&'a self, curriculum: &'a Curriculum) -> Vec<&'a Course> {
        curriculum
            .courses
            .iter()
            .filter_map(|id| self.course(id))
            .collect()
    }

    /// Aggregate unavailable slots across a curriculum's courses.
    pub fn curriculum_unavailable_slots(&self, curriculum: &Curriculum) -> HashSet<TimeSlot> {
        self.curriculum_courses(curriculum)
            .iter()
            .flat_map(|c| c.unavailable_slots().iter().copied())
            .collect()
    }

    /// Aggregate unavailable periods per day across a curriculum's courses.
    pub fn curriculum_unavailable_periods(
        &self,
        curriculum: &Curriculum,
    ) -> HashMap<u8, HashSet<u8>> {
        let mut merged: HashMap<u8, HashSet<u8>> = HashMap::new();
        for course in self.curriculum_courses(curriculum) {
            for (&day, periods) in course.unavailable_periods() {
                merged.entry(day).or_default().extend(periods.iter().copied());
            }
        }
        merged
    }

    /// Total weekly lecture occurrences required by a curriculum.
    pub fn curriculum_lectures(&self, curriculum: &Curriculum) -> u32 {
        self.curriculum_courses(curriculum)
            .iter()
            .map(|c| c.lectures)
            .sum()
    }

    /// Estimated student body of a curriculum: the smallest member course.
    pub fn curriculum_estimated_students(&self, curriculum: &Curriculum) -> Option<u32> {
        self.curriculum_courses(curriculum)
            .iter()
            .map(|c| c.students)
            .min()
    }
}

fn derive_brackets(rooms: &[Room]) -> Vec<RoomBracket> {
    let mut capacities: Vec<u32> = rooms.iter().map(|r| r.capacity).collect();
    capacities.sort_unstable();
    capacities.dedup();
    capacities
        .into_iter()
        .map(|capacity| RoomBracket::new(rooms, capacity))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_instance() -> Instance {
        let courses = vec![
            Course::new("c1", "t1", 2, 2, 30)
                .with_curriculum("q1")
                .with_unavailable(TimeSlot::new(0, 0)),
            Course::new("c2", "t1", 1, 1, 50)
                .with_curriculum("q1")
                .with_unavailable(TimeSlot::new(1, 1)),
            Course::new("c3", "t2", 1, 1, 20),
        ];
        let lecturers = vec![
            Lecturer::new("t1").with_course("c1").with_course("c2"),
            Lecturer::new("t2").with_course("c3"),
        ];
        let rooms = vec![Room::new("R1", 30), Room::new("R2", 50), Room::new("R3", 30)];
        let curricula = vec![Curriculum::new("q1").with_course("c1").with_course("c2")];
        Instance::new(courses, lecturers, rooms, curricula, 5, 4)
    }

    #[test]
    fn test_grid_derivation() {
        let inst = sample_instance();
        assert_eq!(inst.time_slots().len(), 20);
        assert_eq!(inst.slots_on_day(2).count(), 4);
        assert!(inst.contains_slot(&TimeSlot::new(4, 3)));
        assert!(!inst.contains_slot(&TimeSlot::new(5, 0)));
        assert!(!inst.contains_slot(&TimeSlot::new(0, 4)));
    }

    #[test]
    fn test_lookups() {
        let inst = sample_instance();
        assert_eq!(inst.course("c2").unwrap().students, 50);
        assert!(inst.course("cx").is_none());
        assert_eq!(inst.room("R2").unwrap().capacity, 50);
        assert!(inst.room("Rx").is_none());
    }

    #[test]
    fn test_capacity_brackets() {
        let inst = sample_instance();
        let brackets = inst.capacity_brackets();
        assert_eq!(brackets.len(), 2);
        assert_eq!(brackets[0].capacity, 30);
        assert_eq!(brackets[0].rooms.len(), 2);
        assert_eq!(brackets[1].capacity, 50);
        assert_eq!(brackets[1].rooms.len(), 1);
    }

    #[test]
    fn test_curriculum_aggregates() {
        let inst = sample_instance();
        let q1 = &inst.curricula()[0];
        assert_eq!(inst.curriculum_lectures(q1), 3);
        assert_eq!(inst.curriculum_estimated_students(q1), Some(30));

        let slots = inst.curriculum_unavailable_slots(q1);
        assert!(slots.contains(&TimeSlot::new(0, 0)));
        assert!(slots.contains(&TimeSlot::new(1, 1)));
        assert_eq!(slots.len(), 2);

        let periods = inst.curriculum_unavailable_periods(q1);
        assert!(periods[&0].contains(&0));
        assert!(periods[&1].contains(&1));
    }

    #[test]
    fn test_daily_load_window_defaults_unbounded() {
        let inst = sample_instance();
        assert_eq!(inst.min_daily_load, 0);
        assert_eq!(inst.max_daily_load, u32::MAX);
        let bounded = sample_instance().with_daily_load_window(1, 3);
        assert_eq!((bounded.min_daily_load, bounded.max_daily_load), (1, 3));
    }

    #[test]
    fn test_serde_round_trip() {
        let inst = sample_instance().with_name("toy");
        let json = serde_json::to_string(&inst).unwrap();
        let back: Instance = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "toy");
        assert_eq!(back.courses().len(), 3);
        assert_eq!(back.capacity_brackets().len(), 2);
    }
}
