//! Structural-integrity checks for instances and assignment sets.
//!
//! Validates registry coherence before any scoring or exploration
//! runs. Detects:
//! - Duplicate entity IDs
//! - Dangling references (lecturer, curriculum member, unsuitable room)
//! - Unavailability marks outside the weekly grid
//! - Courses with no lectures to place
//! - Assignments referencing entities missing from the snapshot

use crate::models::{Assignment, Instance};
use std::collections::HashSet;

/// Validation result: all detected issues, or nothing.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A course references a lecturer that doesn't exist.
    UnknownLecturer,
    /// A curriculum or assignment references a course that doesn't exist.
    UnknownCourse,
    /// A reference points to a room that doesn't exist.
    UnknownRoom,
    /// A slot reference lies outside the weekly grid.
    SlotOutsideGrid,
    /// A course requires zero lectures.
    NoLectures,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the registries of a problem instance.
///
/// Checks:
/// 1. No duplicate course, room, curriculum, or lecturer IDs
/// 2. Every course references an existing lecturer
/// 3. Every course requires at least one lecture
/// 4. Unavailability marks lie inside the grid
/// 5. Unsuitable-room references point to existing rooms
/// 6. Curriculum members point to existing courses
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_instance(instance: &Instance) -> ValidationResult {
    let mut errors = Vec::new();

    let mut room_ids = HashSet::new();
    for r in instance.rooms() {
        if !room_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate room ID: {}", r.id),
            ));
        }
    }

    let mut lecturer_ids = HashSet::new();
    for l in instance.lecturers() {
        if !lecturer_ids.insert(l.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate lecturer ID: {}", l.id),
            ));
        }
    }

    let mut course_ids = HashSet::new();
    for course in instance.courses() {
        if !course_ids.insert(course.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate course ID: {}", course.id),
            ));
        }

        if course.lectures == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NoLectures,
                format!("Course '{}' requires no lectures", course.id),
            ));
        }

        if !lecturer_ids.contains(course.lecturer.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownLecturer,
                format!(
                    "Course '{}' references unknown lecturer '{}'",
                    course.id, course.lecturer
                ),
            ));
        }

        for slot in course.unavailable_slots() {
            if !instance.contains_slot(slot) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SlotOutsideGrid,
                    format!(
                        "Course '{}' marks slot {slot} outside the {}x{} grid",
                        course.id, instance.days, instance.periods_per_day
                    ),
                ));
            }
        }

        for room in &course.unsuitable_rooms {
            if !room_ids.contains(room.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownRoom,
                    format!(
                        "Course '{}' marks unknown room '{room}' unsuitable",
                        course.id
                    ),
                ));
            }
        }
    }

    let mut curriculum_ids = HashSet::new();
    for curriculum in instance.curricula() {
        if !curriculum_ids.insert(curriculum.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate curriculum ID: {}", curriculum.id),
            ));
        }
        for course in &curriculum.courses {
            if !course_ids.contains(course.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownCourse,
                    format!(
                        "Curriculum '{}' references unknown course '{course}'",
                        curriculum.id
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates that every assignment references entities in the snapshot.
///
/// Mirrors the invariant the scorer relies on: unknown courses, rooms,
/// or out-of-grid slots are data errors, not scoring violations.
pub fn validate_assignments(instance: &Instance, assignments: &[Assignment]) -> ValidationResult {
    let mut errors = Vec::new();

    for a in assignments {
        if instance.course(&a.course).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownCourse,
                format!("Assignment references unknown course '{}'", a.course),
            ));
        }
        if !instance.contains_slot(&a.slot) {
            errors.push(ValidationError::new(
                ValidationErrorKind::SlotOutsideGrid,
                format!(
                    "Assignment for '{}' uses slot {} outside the grid",
                    a.course, a.slot
                ),
            ));
        }
        if let Some(room) = &a.room {
            if instance.room(room).is_none() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownRoom,
                    format!(
                        "Assignment for '{}' references unknown room '{room}'",
                        a.course
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, Curriculum, Lecturer, Room, TimeSlot};

    fn sample_instance() -> Instance {
        Instance::new(
            vec![
                Course::new("c1", "t1", 2, 1, 30).with_curriculum("q1"),
                Course::new("c2", "t1", 1, 1, 40).with_curriculum("q1"),
            ],
            vec![Lecturer::new("t1").with_course("c1").with_course("c2")],
            vec![Room::new("R1", 40)],
            vec![Curriculum::new("q1").with_course("c1").with_course("c2")],
            5,
            4,
        )
    }

    #[test]
    fn test_valid_instance() {
        assert!(validate_instance(&sample_instance()).is_ok());
    }

    #[test]
    fn test_duplicate_course_id() {
        let inst = Instance::new(
            vec![
                Course::new("c1", "t1", 1, 1, 10),
                Course::new("c1", "t1", 1, 1, 10),
            ],
            vec![Lecturer::new("t1")],
            vec![Room::new("R1", 40)],
            vec![],
            5,
            4,
        );
        let errors = validate_instance(&inst).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId));
    }

    #[test]
    fn test_unknown_lecturer() {
        let inst = Instance::new(
            vec![Course::new("c1", "ghost", 1, 1, 10)],
            vec![Lecturer::new("t1")],
            vec![Room::new("R1", 40)],
            vec![],
            5,
            4,
        );
        let errors = validate_instance(&inst).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnknownLecturer));
    }

    #[test]
    fn test_unavailability_outside_grid() {
        let inst = Instance::new(
            vec![Course::new("c1", "t1", 1, 1, 10).with_unavailable(TimeSlot::new(6, 0))],
            vec![Lecturer::new("t1")],
            vec![Room::new("R1", 40)],
            vec![],
            5,
            4,
        );
        let errors = validate_instance(&inst).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::SlotOutsideGrid));
    }

    #[test]
    fn test_curriculum_unknown_course() {
        let inst = Instance::new(
            vec![Course::new("c1", "t1", 1, 1, 10)],
            vec![Lecturer::new("t1")],
            vec![Room::new("R1", 40)],
            vec![Curriculum::new("q1").with_course("missing")],
            5,
            4,
        );
        let errors = validate_instance(&inst).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnknownCourse));
    }

    #[test]
    fn test_zero_lecture_course() {
        let inst = Instance::new(
            vec![Course::new("c1", "t1", 0, 0, 10)],
            vec![Lecturer::new("t1")],
            vec![Room::new("R1", 40)],
            vec![],
            5,
            4,
        );
        let errors = validate_instance(&inst).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::NoLectures));
    }

    #[test]
    fn test_assignment_references() {
        let inst = sample_instance();
        let good = vec![Assignment::new("c1", TimeSlot::new(0, 1), "R1")];
        assert!(validate_assignments(&inst, &good).is_ok());

        let bad = vec![
            Assignment::new("ghost", TimeSlot::new(0, 1), "R1"),
            Assignment::new("c1", TimeSlot::new(9, 9), "R1"),
            Assignment::new("c1", TimeSlot::new(0, 1), "Rx"),
        ];
        let errors = validate_assignments(&inst, &bad).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnknownCourse));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::SlotOutsideGrid));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnknownRoom));
    }
}
