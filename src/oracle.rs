//! Contract for the external combinatorial solving backend.
//!
//! The core never solves anything itself: an [`Oracle`] wraps a
//! stateful MIP (or any other) engine that holds the search-space
//! encoding and is reconfigured in place between calls. The explorer
//! owns its oracle exclusively for a run and issues calls strictly
//! sequentially; nothing here is assumed reentrant.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::models::Assignment;

/// Linear objective weights pushed into the backend.
///
/// The backend minimizes `soft · softObjective + cost · roomCost
/// (+ proximity · distanceFromReference)`. Corner-point solves use
/// degenerate (0/1) weight pairs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveWeights {
    /// Weight on the soft (quality) objective.
    pub soft: f64,
    /// Weight on the room-cost objective.
    pub cost: f64,
    /// Weight on the local-branching distance term.
    pub proximity: f64,
}

impl ObjectiveWeights {
    /// Weights without a proximity term.
    pub fn new(soft: f64, cost: f64) -> Self {
        Self {
            soft,
            cost,
            proximity: 0.0,
        }
    }
}

/// Per-call solve limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveLimits {
    /// Wall-clock limit for one optimize call.
    pub time_limit: Duration,
    /// Relative optimality-gap tolerance at which to stop early.
    pub gap: f64,
    /// Objective cutoff: abandon once provably worse than this.
    pub cutoff: Option<f64>,
}

impl SolveLimits {
    /// A plain time-limited solve with zero gap tolerance.
    pub fn with_time_limit(time_limit: Duration) -> Self {
        Self {
            time_limit,
            gap: 0.0,
            cutoff: None,
        }
    }
}

/// One solution returned by an optimize call.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleSolution {
    /// The full assignment set.
    pub assignments: Vec<Assignment>,
    /// Room cost of the solution.
    pub cost: f64,
    /// Soft (quality) objective of the solution.
    pub soft_objective: i64,
    /// Best proven bound on the active objective.
    pub bound: f64,
    /// Time the backend spent in the call.
    pub runtime: Duration,
    /// Occurrence count per used room id.
    pub room_usage: BTreeMap<String, u32>,
}

/// Result of one optimize call.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    /// The sub-problem has a solution under the active constraints.
    Feasible(OracleSolution),
    /// No solution exists under the active constraints (or none was
    /// found within the limits). Scans treat this as a skippable level.
    Infeasible,
}

impl SolveOutcome {
    /// Whether a solution was returned.
    pub fn is_feasible(&self) -> bool {
        matches!(self, SolveOutcome::Feasible(_))
    }
}

/// A solution found incidentally during a solve, kept in the
/// backend's pool.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolSolution {
    /// The full assignment set.
    pub assignments: Vec<Assignment>,
    /// Room cost of the solution.
    pub cost: f64,
    /// Soft (quality) objective of the solution.
    pub soft_objective: i64,
    /// Occurrence count per used room id.
    pub room_usage: BTreeMap<String, u32>,
}

/// The solving backend consumed by the explorer.
///
/// Implementations are stateful: objective weights, epsilon bounds,
/// fixed variables, and the proximity reference all persist across
/// calls until overwritten. Passing `None` to a bound setter removes
/// that bound. Implementations should be deterministic for a fixed
/// seed so exploration runs are reproducible.
pub trait Oracle {
    /// Replaces the active objective weights.
    fn set_objective(&mut self, weights: ObjectiveWeights);

    /// Bounds the soft objective (`softObjective ≤ q`), or removes
    /// the bound.
    fn set_quality_bound(&mut self, bound: Option<i64>);

    /// Bounds the room cost (`cost ≤ b`), or removes the bound.
    fn set_budget_bound(&mut self, bound: Option<f64>);

    /// Installs or removes the local-branching radius: solutions may
    /// change at most `k` decisions relative to the reference.
    fn set_proximity_limit(&mut self, radius: Option<u32>);

    /// Moves the proximity reference to the current incumbent.
    fn rebase_proximity(&mut self);

    /// Fixes the given assignments; later solves must contain them.
    fn fix_assignments(&mut self, assignments: &[Assignment]);

    /// Warm-start hints for the next solve. Optional; ignored by
    /// default.
    fn set_hints(&mut self, assignments: &[Assignment]) {
        let _ = assignments;
    }

    /// Runs one solve under the active configuration.
    fn optimize(&mut self, limits: &SolveLimits) -> SolveOutcome;

    /// Drains feasible solutions found incidentally during the last
    /// solve. Optional; empty by default.
    fn solution_pool(&mut self) -> Vec<PoolSolution> {
        Vec::new()
    }
}
