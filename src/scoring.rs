//! Solution scoring: feasibility verdict and weighted objective.
//!
//! Turns a raw assignment set into a structured report: hard-rule
//! violations (clashes, overscheduling, unavailability), the seven
//! soft criterion costs, and — for feasible candidates — the weighted
//! UD2 objective. Ordinary infeasibility is a normal return value;
//! only a structurally hopeless candidate (stage-I room shortage) is
//! an error.
//!
//! # Hard rules
//!
//! - A course may not exceed its required lecture count
//! - A course may not occupy an unavailable slot (when availability is hard)
//! - A course occupies at most one room per slot
//! - A room hosts at most one course per slot
//! - A lecturer teaches at most one course per slot
//! - Curriculum members never share a slot

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use thiserror::Error;

use crate::models::{
    Assignment, Criterion, FormulationError, Instance, ProblemFormulation, TimeSlot,
};

/// Fatal scoring errors, distinct from ordinary infeasibility.
#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
    /// Stage-I pre-check: more assignments in a slot than rooms exist.
    #[error("slot {slot} holds {courses} lectures but only {rooms} rooms exist")]
    TooFewRooms {
        /// The overloaded slot.
        slot: TimeSlot,
        /// Lectures assigned at the slot.
        courses: usize,
        /// Rooms in the instance.
        rooms: usize,
    },
    /// Stage-I pre-check: a capacity bracket cannot host its demand.
    ///
    /// No room overlay can fix this, regardless of search effort.
    #[error(
        "slot {slot}: {courses} courses need more than {capacity} seats but only {rooms} larger rooms exist"
    )]
    StructuralInfeasibility {
        /// The overloaded slot.
        slot: TimeSlot,
        /// The capacity bracket that cannot be served.
        capacity: u32,
        /// Courses at the slot needing more than `capacity` seats.
        courses: usize,
        /// Rooms with capacity strictly above `capacity`.
        rooms: usize,
    },
    /// An assignment references a course missing from the snapshot.
    #[error("assignment references unknown course '{0}'")]
    UnknownCourse(String),
    /// An assignment references a room missing from the snapshot.
    #[error("assignment references unknown room '{0}'")]
    UnknownRoom(String),
    /// An assignment slot lies outside the weekly grid.
    #[error("assignment uses slot {0} outside the weekly grid")]
    SlotOutsideGrid(TimeSlot),
    /// The formulation carries non-finite weights.
    #[error(transparent)]
    Formulation(#[from] FormulationError),
}

/// Categories of hard-rule violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    /// A course scheduled beyond its required lecture count.
    ExcessLectures,
    /// A course placed in a slot it marked unavailable.
    UnavailableSlot,
    /// A course in more than one room in the same slot.
    MultipleRoomsInSlot,
    /// A room hosting more than one course in the same slot.
    RoomDoubleBooked,
    /// A lecturer teaching more than one course in the same slot.
    LecturerClash,
    /// Two curriculum members sharing a slot.
    CurriculumClash,
}

impl ViolationKind {
    /// The rule statement shown once per category in reports.
    pub fn headline(self) -> &'static str {
        match self {
            ViolationKind::ExcessLectures => {
                "Each course is only allowed its required number of lectures"
            }
            ViolationKind::UnavailableSlot => {
                "Courses may not be scheduled in slots marked unavailable"
            }
            ViolationKind::MultipleRoomsInSlot => {
                "Each course may use a single room per time slot"
            }
            ViolationKind::RoomDoubleBooked => {
                "Each room accommodates a single course per time slot"
            }
            ViolationKind::LecturerClash => {
                "Each lecturer teaches a single course per time slot"
            }
            ViolationKind::CurriculumClash => {
                "Only one course of a curriculum may occupy a time slot"
            }
        }
    }
}

/// One hard-rule violation found in a candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Rule category.
    pub kind: ViolationKind,
    /// Offending entity (course, room, lecturer, or curriculum id).
    pub entity: String,
    /// The slot where the rule broke, when slot-specific.
    pub slot: Option<TimeSlot>,
    /// Violation magnitude (e.g. excess occurrence count).
    pub magnitude: u32,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    fn new(
        kind: ViolationKind,
        entity: impl Into<String>,
        slot: Option<TimeSlot>,
        magnitude: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            entity: entity.into(),
            slot,
            magnitude,
            message: message.into(),
        }
    }
}

/// Raw (unweighted) accumulations per soft criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionCosts {
    /// Seat overflow summed over (room, slot) groups.
    pub room_capacity: u32,
    /// Working-day shortfall summed over courses.
    pub minimum_working_days: u32,
    /// Isolated curriculum occurrences.
    pub curriculum_compactness: u32,
    /// Distinct rooms beyond the first, summed over courses.
    pub room_stability: u32,
    /// Slot undesirability cost summed over occurrences.
    pub bad_timeslots: u32,
    /// Occurrences placed in unsuitable rooms.
    pub room_unsuitability: u32,
    /// Daily-load window violations summed over (curriculum, day).
    pub student_min_max_load: u32,
}

impl CriterionCosts {
    /// The raw accumulation for one criterion.
    pub fn get(&self, criterion: Criterion) -> u32 {
        match criterion {
            Criterion::RoomCapacity => self.room_capacity,
            Criterion::MinimumWorkingDays => self.minimum_working_days,
            Criterion::CurriculumCompactness => self.curriculum_compactness,
            Criterion::RoomStability => self.room_stability,
            Criterion::BadTimeslots => self.bad_timeslots,
            Criterion::RoomUnsuitability => self.room_unsuitability,
            Criterion::StudentMinMaxLoad => self.student_min_max_load,
        }
    }
}

/// Scoring switches.
#[derive(Debug, Clone, Copy)]
pub struct ScoreOptions {
    /// Run the stage-I room pre-check on room-less candidates.
    pub stage_one_room_check: bool,
}

impl Default for ScoreOptions {
    fn default() -> Self {
        Self {
            stage_one_room_check: true,
        }
    }
}

/// The structured result of scoring one candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Whether no hard rule is violated.
    pub feasible: bool,
    /// All hard-rule violations found.
    pub violations: Vec<Violation>,
    /// Lecture occurrences required but not scheduled.
    pub unscheduled_lectures: u32,
    /// Raw per-criterion accumulations.
    pub costs: CriterionCosts,
    /// The weighted objective; `None` for infeasible candidates.
    pub objective: Option<f64>,
    /// Rooms with at least one occurrence.
    pub rooms_used: u32,
    /// Total cost of the used rooms.
    pub room_cost: u64,
    /// Bad-timeslot penalty accumulated per course.
    pub penalty_by_course: HashMap<String, u32>,
}

impl ScoreReport {
    /// Total hard-violation magnitude.
    pub fn violation_total(&self) -> u32 {
        self.violations.iter().map(|v| v.magnitude).sum()
    }

    /// Human-readable summary: violation categories for infeasible
    /// candidates, the criterion/objective table otherwise.
    pub fn summary(&self, formulation: &ProblemFormulation) -> String {
        let mut out = String::new();
        if !self.feasible {
            let _ = writeln!(
                out,
                "The solution is infeasible. The number of violations is {}",
                self.violation_total()
            );
            for kind in [
                ViolationKind::ExcessLectures,
                ViolationKind::UnavailableSlot,
                ViolationKind::MultipleRoomsInSlot,
                ViolationKind::RoomDoubleBooked,
                ViolationKind::LecturerClash,
                ViolationKind::CurriculumClash,
            ] {
                let members: Vec<&Violation> =
                    self.violations.iter().filter(|v| v.kind == kind).collect();
                if members.is_empty() {
                    continue;
                }
                let _ = writeln!(out, "{}", kind.headline());
                for v in members {
                    let _ = writeln!(out, "  {}", v.message);
                }
            }
            return out;
        }

        let _ = writeln!(out, "UNSCHEDULED           | {}", self.unscheduled_lectures);
        for criterion in Criterion::ALL {
            let raw = self.costs.get(criterion);
            let weighted = f64::from(raw) * formulation.weight(criterion);
            let _ = writeln!(out, "{:<21} | {raw} | {weighted}", criterion.display_name());
        }
        let _ = writeln!(
            out,
            "OBJECTIVE             | {}",
            self.objective.unwrap_or(0.0)
        );
        out
    }
}

/// Scores a candidate assignment set against an instance.
///
/// Returns the report for both feasible and infeasible candidates;
/// errs only on malformed input or a stage-I structural shortage.
pub fn score(
    instance: &Instance,
    formulation: &ProblemFormulation,
    assignments: &[Assignment],
    options: &ScoreOptions,
) -> Result<ScoreReport, ScoreError> {
    formulation.validate()?;

    // Identity is the full triple; repeated triples collapse.
    let assignments: Vec<&Assignment> = {
        let mut seen = HashSet::new();
        assignments.iter().filter(|a| seen.insert(*a)).collect()
    };

    for a in &assignments {
        if instance.course(&a.course).is_none() {
            return Err(ScoreError::UnknownCourse(a.course.clone()));
        }
        if !instance.contains_slot(&a.slot) {
            return Err(ScoreError::SlotOutsideGrid(a.slot));
        }
        if let Some(room) = &a.room {
            if instance.room(room).is_none() {
                return Err(ScoreError::UnknownRoom(room.clone()));
            }
        }
    }

    let rooms_present = assignments.iter().any(|a| a.room.is_some());
    if !rooms_present && options.stage_one_room_check {
        check_stage_one(instance, &assignments)?;
    }

    let mut violations = Vec::new();
    let mut costs = CriterionCosts::default();
    let mut unscheduled = 0u32;
    let mut rooms_used = 0u32;
    let mut room_cost = 0u64;
    let mut penalty_by_course: HashMap<String, u32> =
        instance.courses().iter().map(|c| (c.id.clone(), 0)).collect();

    let mut by_course: HashMap<&str, Vec<&Assignment>> = HashMap::new();
    for &a in &assignments {
        by_course.entry(a.course.as_str()).or_default().push(a);
    }
    let mut by_curriculum: HashMap<&str, Vec<&Assignment>> = HashMap::new();

    for course in instance.courses() {
        let Some(mine) = by_course.get(course.id.as_str()) else {
            unscheduled += course.lectures;
            costs.minimum_working_days += course.minimum_working_days;
            continue;
        };

        let count = mine.len() as u32;
        if count > course.lectures {
            let excess = count - course.lectures;
            violations.push(Violation::new(
                ViolationKind::ExcessLectures,
                &course.id,
                None,
                excess,
                format!(
                    "Course {} is scheduled for {count} lectures but requires only {}",
                    course.id, course.lectures
                ),
            ));
        } else {
            unscheduled += course.lectures - count;
        }

        for curriculum in &course.curricula {
            by_curriculum
                .entry(curriculum.as_str())
                .or_default()
                .extend(mine.iter().copied());
        }

        let mut by_slot: HashMap<TimeSlot, Vec<&Assignment>> = HashMap::new();
        for &a in mine {
            by_slot.entry(a.slot).or_default().push(a);
        }

        for (slot, group) in &by_slot {
            let occurrences = group.len() as u32;
            let slot_penalty = slot.cost() * occurrences;
            costs.bad_timeslots += slot_penalty;
            *penalty_by_course.entry(course.id.clone()).or_default() += slot_penalty;

            if course.is_unavailable(slot) {
                if formulation.availability_hard {
                    violations.push(Violation::new(
                        ViolationKind::UnavailableSlot,
                        &course.id,
                        Some(*slot),
                        1,
                        format!("Course {} is scheduled at unavailable slot {slot}", course.id),
                    ));
                } else {
                    // Soft availability: charge each occurrence as a bad slot.
                    costs.bad_timeslots += occurrences;
                }
            }

            if occurrences > 1 {
                violations.push(Violation::new(
                    ViolationKind::MultipleRoomsInSlot,
                    &course.id,
                    Some(*slot),
                    occurrences - 1,
                    format!(
                        "Course {} occupies {occurrences} rooms at slot {slot}",
                        course.id
                    ),
                ));
            }
        }

        let work_days: HashSet<u8> = by_slot.keys().map(|s| s.day).collect();
        let work_days = work_days.len() as u32;
        if work_days < course.minimum_working_days {
            costs.minimum_working_days += course.minimum_working_days - work_days;
        }

        if rooms_present {
            let distinct_rooms: HashSet<&str> =
                mine.iter().filter_map(|a| a.room.as_deref()).collect();
            costs.room_stability += (distinct_rooms.len() as u32).saturating_sub(1);
        }
    }

    if rooms_present {
        let mut by_room: HashMap<&str, Vec<&Assignment>> = HashMap::new();
        for &a in &assignments {
            if let Some(room) = a.room.as_deref() {
                by_room.entry(room).or_default().push(a);
            }
        }

        for (room_id, group) in &by_room {
            let room = instance
                .room(room_id)
                .ok_or_else(|| ScoreError::UnknownRoom((*room_id).to_string()))?;

            let mut by_slot: HashMap<TimeSlot, Vec<&Assignment>> = HashMap::new();
            for &a in group {
                by_slot.entry(a.slot).or_default().push(a);
            }

            for (slot, slot_group) in &by_slot {
                let courses: HashSet<&str> =
                    slot_group.iter().map(|a| a.course.as_str()).collect();
                if courses.len() > 1 {
                    violations.push(Violation::new(
                        ViolationKind::RoomDoubleBooked,
                        *room_id,
                        Some(*slot),
                        slot_group.len() as u32 - 1,
                        format!("Room {room_id} hosts {} courses at slot {slot}", courses.len()),
                    ));
                }
                let students: u32 = slot_group
                    .iter()
                    .filter_map(|a| instance.course(&a.course))
                    .map(|c| c.students)
                    .sum();
                costs.room_capacity += students.saturating_sub(room.capacity);
            }

            rooms_used += 1;
            room_cost += room.cost();
            costs.room_unsuitability += group
                .iter()
                .filter_map(|a| instance.course(&a.course))
                .filter(|c| c.unsuitable_rooms.contains(*room_id))
                .count() as u32;
        }
    }

    let mut by_lecturer: HashMap<&str, Vec<&Assignment>> = HashMap::new();
    for &a in &assignments {
        if let Some(course) = instance.course(&a.course) {
            by_lecturer
                .entry(course.lecturer.as_str())
                .or_default()
                .push(a);
        }
    }
    for (lecturer, group) in &by_lecturer {
        let mut by_slot: HashMap<TimeSlot, Vec<&Assignment>> = HashMap::new();
        for &a in group {
            by_slot.entry(a.slot).or_default().push(a);
        }
        for (slot, slot_group) in &by_slot {
            let courses: HashSet<&str> = slot_group.iter().map(|a| a.course.as_str()).collect();
            if courses.len() > 1 {
                violations.push(Violation::new(
                    ViolationKind::LecturerClash,
                    *lecturer,
                    Some(*slot),
                    slot_group.len() as u32 - 1,
                    format!(
                        "Lecturer {lecturer} teaches {} courses at slot {slot}",
                        courses.len()
                    ),
                ));
            }
        }
    }

    for curriculum in instance.curricula() {
        let group = by_curriculum
            .get(curriculum.id.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let mut by_slot: HashMap<TimeSlot, Vec<&Assignment>> = HashMap::new();
        for &a in group {
            by_slot.entry(a.slot).or_default().push(a);
        }
        for (slot, slot_group) in &by_slot {
            let courses: HashSet<&str> = slot_group.iter().map(|a| a.course.as_str()).collect();
            if courses.len() > 1 {
                violations.push(Violation::new(
                    ViolationKind::CurriculumClash,
                    &curriculum.id,
                    Some(*slot),
                    slot_group.len() as u32 - 1,
                    format!(
                        "Curriculum {} has {} courses at slot {slot}",
                        curriculum.id,
                        courses.len()
                    ),
                ));
            }
        }

        // Compactness: a slot with no consecutive sibling is isolated.
        let occupied: Vec<TimeSlot> = by_slot.keys().copied().collect();
        costs.curriculum_compactness += occupied
            .iter()
            .filter(|slot| !occupied.iter().any(|other| other.is_consecutive(slot)))
            .count() as u32;

        let mut by_day: HashMap<u8, u32> = HashMap::new();
        for a in group {
            *by_day.entry(a.slot.day).or_default() += 1;
        }
        for load in by_day.values() {
            let over = if instance.max_daily_load == u32::MAX {
                0
            } else {
                load.saturating_sub(instance.max_daily_load)
            };
            let under = instance.min_daily_load.saturating_sub(*load);
            costs.student_min_max_load += over + under;
        }
    }

    let feasible = violations.iter().map(|v| v.magnitude).sum::<u32>() == 0;
    let objective = feasible.then(|| {
        Criterion::ALL
            .iter()
            .map(|&c| f64::from(costs.get(c)) * formulation.weight(c))
            .sum()
    });

    Ok(ScoreReport {
        feasible,
        violations,
        unscheduled_lectures: unscheduled,
        costs,
        objective,
        rooms_used,
        room_cost,
        penalty_by_course,
    })
}

/// Stage-I pre-check on room-less candidates.
///
/// For every slot and every capacity bracket, the courses needing
/// more seats than the bracket offers must not outnumber the rooms
/// strictly above it; otherwise no room overlay can exist.
fn check_stage_one(instance: &Instance, assignments: &[&Assignment]) -> Result<(), ScoreError> {
    for slot in instance.time_slots() {
        let at_slot: Vec<&&Assignment> =
            assignments.iter().filter(|a| a.slot == *slot).collect();
        if at_slot.len() > instance.rooms().len() {
            return Err(ScoreError::TooFewRooms {
                slot: *slot,
                courses: at_slot.len(),
                rooms: instance.rooms().len(),
            });
        }
        for bracket in instance.capacity_brackets() {
            let rooms_above = instance
                .rooms()
                .iter()
                .filter(|r| r.capacity > bracket.capacity)
                .count();
            let courses_above = at_slot
                .iter()
                .filter_map(|a| instance.course(&a.course))
                .filter(|c| c.students > bracket.capacity)
                .count();
            if courses_above > rooms_above {
                return Err(ScoreError::StructuralInfeasibility {
                    slot: *slot,
                    capacity: bracket.capacity,
                    courses: courses_above,
                    rooms: rooms_above,
                });
            }
        }
    }
    Ok(())
}
