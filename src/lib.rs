//! Curriculum-based course timetabling core (CCT-UD2).
//!
//! Provides the domain model, scoring, and multi-objective exploration
//! machinery for the ITC-2007 curriculum-based timetabling problem in
//! its UD2 formulation. The combinatorial search itself lives behind
//! the [`oracle::Oracle`] contract — this crate defines the problem,
//! judges candidates, and orchestrates the solver; it does not solve.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Instance`, `Course`, `Curriculum`,
//!   `Room`, `TimeSlot`, `Assignment`, `ProblemFormulation`
//! - **`validation`**: Input integrity checks (duplicate IDs, dangling
//!   references, out-of-grid slots)
//! - **`scoring`**: Hard-rule verdicts and the weighted soft objective
//! - **`rooms`**: Exact-budget room-profile enumeration
//! - **`oracle`**: Contract for the external solving backend
//! - **`explorer`**: Cost/quality Pareto-frontier exploration
//!
//! # References
//!
//! - Bonutti et al. (2012), "Benchmarking curriculum-based course
//!   timetabling: formulations, data formats, instances"
//! - Di Gaspero, McCollum, Schaerf (2007), ITC-2007 track 3
//! - Ehrgott (2005), "Multicriteria Optimization"

pub mod explorer;
pub mod models;
pub mod oracle;
pub mod rooms;
pub mod scoring;
pub mod validation;
