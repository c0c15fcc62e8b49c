//! Timetabling domain models.
//!
//! Core data types for the curriculum-based course timetabling
//! problem (CCT-UD2): the weekly grid, the entity registries, the
//! assignment value type, and the formulation of the weighted soft
//! objective.
//!
//! # Entities
//!
//! | Type | Role |
//! |------|------|
//! | `TimeSlot` | (day, period) grid cell |
//! | `Room` | lecture room, capacity = cost proxy |
//! | `Course` | lectures to place, with avoidance sets |
//! | `Curriculum` | clash group of courses |
//! | `Lecturer` | clash group by teacher |
//! | `Assignment` | (course, slot, room?) occurrence |
//! | `ProblemFormulation` | soft weights + policy knobs |
//! | `Instance` | immutable registry snapshot |

mod assignment;
mod course;
mod curriculum;
mod formulation;
mod instance;
mod room;
mod time_slot;

pub use assignment::Assignment;
pub use course::Course;
pub use curriculum::{Curriculum, Lecturer};
pub use formulation::{Criterion, FormulationError, ProblemFormulation};
pub use instance::Instance;
pub use room::{Room, RoomBracket};
pub use time_slot::TimeSlot;
