//! Curriculum and lecturer models.
//!
//! A curriculum is a group of courses followed by the same student
//! body; its members may never clash, and its weekly pattern is scored
//! for compactness and daily load. A lecturer owns a set of courses
//! that likewise may never clash.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A group of courses attended by one student body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Curriculum {
    /// Unique curriculum identifier.
    pub id: String,
    /// Ids of the member courses.
    pub courses: HashSet<String>,
}

impl Curriculum {
    /// Creates an empty curriculum.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            courses: HashSet::new(),
        }
    }

    /// Adds a member course.
    pub fn with_course(mut self, course: impl Into<String>) -> Self {
        self.courses.insert(course.into());
        self
    }

    /// Number of member courses.
    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// Whether the given course belongs to this curriculum.
    pub fn contains(&self, course: &str) -> bool {
        self.courses.contains(course)
    }
}

/// A lecturer and the courses they teach.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lecturer {
    /// Unique lecturer identifier.
    pub id: String,
    /// Ids of the owned courses.
    pub courses: HashSet<String>,
}

impl Lecturer {
    /// Creates a lecturer with no courses.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            courses: HashSet::new(),
        }
    }

    /// Adds an owned course.
    pub fn with_course(mut self, course: impl Into<String>) -> Self {
        self.courses.insert(course.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curriculum_membership() {
        let q = Curriculum::new("q1").with_course("c1").with_course("c2");
        assert_eq!(q.course_count(), 2);
        assert!(q.contains("c1"));
        assert!(!q.contains("c3"));
    }

    #[test]
    fn test_lecturer_courses() {
        let l = Lecturer::new("t1").with_course("c1");
        assert!(l.courses.contains("c1"));
    }
}
