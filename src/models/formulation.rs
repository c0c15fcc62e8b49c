//! Problem formulation: soft-criterion weights and policy knobs.
//!
//! The CCT-UD2 objective is a weighted sum over seven soft criteria.
//! A formulation bundles those weights with the overbooking tolerance,
//! the room-budget ceiling, and the choice of whether unavailability
//! is a hard rule or folded into the bad-timeslot cost. The named
//! presets reproduce the standard benchmark variants.
//!
//! # Reference
//! Bonutti et al. (2012), "Benchmarking curriculum-based course
//! timetabling", UD2 formulation

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The seven weighted soft criteria of the UD2 objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Criterion {
    /// Students exceeding a room's seat capacity.
    RoomCapacity,
    /// Shortfall below a course's minimum working days.
    MinimumWorkingDays,
    /// Curriculum occurrences with no adjacent sibling occurrence.
    CurriculumCompactness,
    /// Distinct rooms used by a course beyond the first.
    RoomStability,
    /// Occurrences placed in undesirable (edge) time slots.
    BadTimeslots,
    /// Occurrences placed in a room the course deems unsuitable.
    RoomUnsuitability,
    /// Curriculum daily load outside the allowed window.
    StudentMinMaxLoad,
}

impl Criterion {
    /// All criteria, in objective order.
    pub const ALL: [Criterion; 7] = [
        Criterion::RoomCapacity,
        Criterion::MinimumWorkingDays,
        Criterion::CurriculumCompactness,
        Criterion::RoomStability,
        Criterion::BadTimeslots,
        Criterion::RoomUnsuitability,
        Criterion::StudentMinMaxLoad,
    ];

    /// Display name used in score reports.
    pub fn display_name(self) -> &'static str {
        match self {
            Criterion::RoomCapacity => "RoomCapacity",
            Criterion::MinimumWorkingDays => "MinimumWorkingDays",
            Criterion::CurriculumCompactness => "CurriculumCompactness",
            Criterion::RoomStability => "RoomStability",
            Criterion::BadTimeslots => "BadTimeslots",
            Criterion::RoomUnsuitability => "RoomUnsuitability",
            Criterion::StudentMinMaxLoad => "StudentMinMaxLoad",
        }
    }
}

/// Errors raised when a formulation is malformed.
#[derive(Debug, Error, PartialEq)]
pub enum FormulationError {
    /// A criterion weight is NaN or infinite.
    #[error("weight for {0} is not finite")]
    NonFiniteWeight(&'static str),
}

/// Weights and policy knobs for scoring a candidate solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemFormulation {
    /// Weight on seat-capacity overflow.
    pub room_capacity_weight: f64,
    /// Weight on minimum-working-days shortfall.
    pub minimum_working_days_weight: f64,
    /// Weight on isolated curriculum occurrences.
    pub curriculum_compactness_weight: f64,
    /// Weight on rooms used beyond the first per course.
    pub room_stability_weight: f64,
    /// Weight on undesirable-slot occurrences.
    pub bad_timeslots_weight: f64,
    /// Weight on unsuitable-room occurrences.
    pub room_unsuitability_weight: f64,
    /// Weight on curriculum daily-load window violations.
    pub student_min_max_load_weight: f64,
    /// Fraction of seat overbooking tolerated by the solving backend.
    pub overbooking_allowed: f64,
    /// Ceiling on total room cost enforced by the solving backend.
    pub room_budget: f64,
    /// Whether an unavailable-slot placement is a hard violation.
    /// When `false` the occurrence is folded into `BadTimeslots`.
    pub availability_hard: bool,
}

impl ProblemFormulation {
    /// The standard UD2 formulation (1, 5, 2, 1; unbounded budget).
    pub fn ud2() -> Self {
        Self {
            room_capacity_weight: 1.0,
            minimum_working_days_weight: 5.0,
            curriculum_compactness_weight: 2.0,
            room_stability_weight: 1.0,
            bad_timeslots_weight: 0.0,
            room_unsuitability_weight: 0.0,
            student_min_max_load_weight: 0.0,
            overbooking_allowed: f64::INFINITY,
            room_budget: f64::INFINITY,
            availability_hard: true,
        }
    }

    /// UD2 with curriculum compactness zeroed out.
    pub fn ud2_no_curriculum_compactness() -> Self {
        Self {
            curriculum_compactness_weight: 0.0,
            ..Self::ud2()
        }
    }

    /// UD2 with minimum working days zeroed out.
    pub fn ud2_no_minimum_working_days() -> Self {
        Self {
            minimum_working_days_weight: 0.0,
            ..Self::ud2()
        }
    }

    /// UD2 with no seat overbooking tolerated.
    pub fn ud2_no_overbooking() -> Self {
        Self {
            overbooking_allowed: 0.0,
            ..Self::ud2()
        }
    }

    /// No-overbooking UD2 with the daily-load window criterion enabled.
    pub fn ud2_with_min_max_load() -> Self {
        Self {
            curriculum_compactness_weight: 0.0,
            student_min_max_load_weight: 1.0,
            overbooking_allowed: 0.0,
            ..Self::ud2()
        }
    }

    /// Pure room-cost minimization: every quality weight zeroed.
    pub fn minimize_room_cost() -> Self {
        Self {
            room_capacity_weight: 0.0,
            minimum_working_days_weight: 0.0,
            curriculum_compactness_weight: 0.0,
            room_stability_weight: 0.0,
            overbooking_allowed: 0.0,
            ..Self::ud2()
        }
    }

    /// All weights zero; useful as a neutral baseline in tests.
    pub fn everything_zero() -> Self {
        Self {
            room_capacity_weight: 0.0,
            minimum_working_days_weight: 0.0,
            curriculum_compactness_weight: 0.0,
            room_stability_weight: 0.0,
            overbooking_allowed: 0.0,
            ..Self::ud2()
        }
    }

    /// The weight attached to a criterion.
    pub fn weight(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::RoomCapacity => self.room_capacity_weight,
            Criterion::MinimumWorkingDays => self.minimum_working_days_weight,
            Criterion::CurriculumCompactness => self.curriculum_compactness_weight,
            Criterion::RoomStability => self.room_stability_weight,
            Criterion::BadTimeslots => self.bad_timeslots_weight,
            Criterion::RoomUnsuitability => self.room_unsuitability_weight,
            Criterion::StudentMinMaxLoad => self.student_min_max_load_weight,
        }
    }

    /// Replaces the weight attached to a criterion.
    pub fn set_weight(&mut self, criterion: Criterion, value: f64) {
        match criterion {
            Criterion::RoomCapacity => self.room_capacity_weight = value,
            Criterion::MinimumWorkingDays => self.minimum_working_days_weight = value,
            Criterion::CurriculumCompactness => self.curriculum_compactness_weight = value,
            Criterion::RoomStability => self.room_stability_weight = value,
            Criterion::BadTimeslots => self.bad_timeslots_weight = value,
            Criterion::RoomUnsuitability => self.room_unsuitability_weight = value,
            Criterion::StudentMinMaxLoad => self.student_min_max_load_weight = value,
        }
    }

    /// Rejects non-finite criterion weights.
    pub fn validate(&self) -> Result<(), FormulationError> {
        for criterion in Criterion::ALL {
            if !self.weight(criterion).is_finite() {
                return Err(FormulationError::NonFiniteWeight(criterion.display_name()));
            }
        }
        Ok(())
    }
}

impl Default for ProblemFormulation {
    fn default() -> Self {
        Self::ud2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ud2_preset_weights() {
        let f = ProblemFormulation::ud2();
        assert_eq!(f.weight(Criterion::RoomCapacity), 1.0);
        assert_eq!(f.weight(Criterion::MinimumWorkingDays), 5.0);
        assert_eq!(f.weight(Criterion::CurriculumCompactness), 2.0);
        assert_eq!(f.weight(Criterion::RoomStability), 1.0);
        assert_eq!(f.weight(Criterion::StudentMinMaxLoad), 0.0);
        assert!(f.availability_hard);
        assert!(f.room_budget.is_infinite());
    }

    #[test]
    fn test_preset_variants() {
        assert_eq!(
            ProblemFormulation::ud2_no_curriculum_compactness()
                .weight(Criterion::CurriculumCompactness),
            0.0
        );
        assert_eq!(
            ProblemFormulation::ud2_no_minimum_working_days().weight(Criterion::MinimumWorkingDays),
            0.0
        );
        assert_eq!(ProblemFormulation::ud2_no_overbooking().overbooking_allowed, 0.0);
        let zero = ProblemFormulation::everything_zero();
        assert!(Criterion::ALL.iter().all(|&c| zero.weight(c) == 0.0));
    }

    #[test]
    fn test_set_weight_round_trips() {
        let mut f = ProblemFormulation::ud2();
        for criterion in Criterion::ALL {
            f.set_weight(criterion, 7.5);
            assert_eq!(f.weight(criterion), 7.5);
        }
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let mut f = ProblemFormulation::ud2();
        assert!(f.validate().is_ok());
        f.bad_timeslots_weight = f64::NAN;
        assert_eq!(
            f.validate(),
            Err(FormulationError::NonFiniteWeight("BadTimeslots"))
        );
        f.bad_timeslots_weight = f64::INFINITY;
        assert!(f.validate().is_err());
    }
}
