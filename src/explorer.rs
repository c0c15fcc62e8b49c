//! Bi-objective exploration of the cost/quality trade-off.
//!
//! Drives an [`Oracle`](crate::oracle::Oracle) through a sequence of
//! constrained solves to trace the Pareto frontier between room cost
//! and the soft (quality) objective: lexicographic corner points
//! bracket both axes, then an epsilon-constraint scan, a weighted-sum
//! scan, or a plain budget sweep fills in the frontier, and a final
//! dominance filter keeps the efficient points and tightens their
//! optimality bounds.
//!
//! All oracle calls are strictly sequential; the explorer owns the
//! oracle handle for the whole run.
//!
//! # Reference
//! Ehrgott (2005), "Multicriteria Optimization", epsilon-constraint
//! method; Fischetti & Lodi (2003), local branching

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::Assignment;
use crate::oracle::{ObjectiveWeights, Oracle, OracleSolution, SolveLimits, SolveOutcome};

/// Cost span below which the frontier is a single point.
const DEGENERATE_COST_SPAN: f64 = 0.05;

/// Errors raised by an exploration run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExploreError {
    /// A stepping scan was requested with `steps == 0`.
    #[error("steps must be positive for a stepping scan")]
    InvalidSteps,
    /// The budget sweep needs a positive budget increment.
    #[error("budget step must be positive")]
    InvalidBudgetStep,
    /// The budget sweep only works on the cost axis.
    #[error("the budget sweep requires the cost axis (epsilon_on_quality = false)")]
    WrongAxis,
    /// The unconstrained problem has no solution; nothing to explore.
    #[error("no feasible solution found while computing a corner point")]
    CornerInfeasible,
}

/// Frontier scan strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanMethod {
    /// Bound one axis, optimize the other, sweep the bound.
    Epsilon,
    /// Recursive interval splitting with slope-derived weights.
    WeightedSum,
    /// Fixed-increment budget levels from cheap to expensive.
    BudgetSweep,
}

/// Configuration of one exploration run.
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    /// Number of scan steps (epsilon levels, or weighted-sum solves).
    pub steps: u32,
    /// Time limit per ordinary solve.
    pub time_limit: Duration,
    /// Optimality-gap tolerance per solve.
    pub gap: f64,
    /// Scan strategy.
    pub method: ScanMethod,
    /// `true`: epsilon-bound the soft objective and optimize cost;
    /// `false`: epsilon-bound the cost and optimize the soft objective.
    pub epsilon_on_quality: bool,
    /// `true`: sweep from the tight end of the bracket outward.
    pub epsilon_relaxing: bool,
    /// Rerun the epsilon scan in the opposite direction afterwards,
    /// over corner points re-derived from the frontier found so far.
    pub double_sweep: bool,
    /// Local-branching radius; `0` disables the proximity constraint.
    pub local_branching: u32,
    /// Corner-point solves get this multiple of the time limit.
    pub corner_time_multiplier: u32,
    /// Budget increment for [`ScanMethod::BudgetSweep`].
    pub budget_step: f64,
    /// Assignments fixed in the oracle before the run starts.
    pub fixed_assignments: Option<Vec<Assignment>>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            steps: 10,
            time_limit: Duration::from_secs(60),
            gap: 0.0,
            method: ScanMethod::Epsilon,
            epsilon_on_quality: true,
            epsilon_relaxing: false,
            double_sweep: false,
            local_branching: 0,
            corner_time_multiplier: 4,
            budget_step: 25.0,
            fixed_assignments: None,
        }
    }
}

/// One candidate point on (or near) the frontier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoPoint {
    /// Room cost of the solution.
    pub cost: f64,
    /// Soft (quality) objective of the solution.
    pub soft_objective: i64,
    /// Proven lower bound on cost at this quality level, if known.
    pub cost_bound: Option<i64>,
    /// Proven lower bound on the soft objective, if known.
    pub soft_objective_bound: Option<i64>,
    /// The budget constraint level that produced this point.
    pub cost_constraint: Option<f64>,
    /// The quality constraint level that produced this point.
    pub quality_constraint: Option<i64>,
    /// Seconds since the run started when this point was recorded.
    pub seconds_since_start: Option<u64>,
    /// The full assignment set.
    pub assignments: Vec<Assignment>,
    /// Occurrence count per used room id.
    pub room_usage: BTreeMap<String, u32>,
}

/// Axis brackets established by the lexicographic corner points.
#[derive(Debug, Clone, Copy)]
struct Corners {
    min_cost: f64,
    max_cost: f64,
    min_soft: i64,
    max_soft: i64,
}

/// Traces the cost/quality frontier by repeated oracle solves.
pub struct MultiObjectiveExplorer<'a, O: Oracle> {
    oracle: &'a mut O,
    config: ExplorerConfig,
    candidates: Vec<ParetoPoint>,
    started: Instant,
}

impl<'a, O: Oracle> MultiObjectiveExplorer<'a, O> {
    /// Wraps an exclusively owned oracle handle for one run.
    pub fn new(oracle: &'a mut O, config: ExplorerConfig) -> Self {
        Self {
            oracle,
            config,
            candidates: Vec::new(),
            started: Instant::now(),
        }
    }

    /// Runs the configured scan and returns the filtered frontier.
    ///
    /// An infeasible sub-problem at one constraint level is skipped;
    /// a degenerate (single-point) frontier short-circuits the scan.
    pub fn run(&mut self) -> Result<Vec<ParetoPoint>, ExploreError> {
        self.started = Instant::now();

        if let Some(fixed) = self.config.fixed_assignments.clone() {
            debug!(count = fixed.len(), "fixing assignments before the run");
            self.oracle.fix_assignments(&fixed);
        }

        match self.config.method {
            ScanMethod::Epsilon | ScanMethod::WeightedSum => {
                if self.config.steps == 0 {
                    return Err(ExploreError::InvalidSteps);
                }
                let corners = self.corner_points()?;
                if (corners.max_cost - corners.min_cost).abs() < DEGENERATE_COST_SPAN {
                    debug!("degenerate frontier, skipping the scan");
                    return Ok(self.pareto());
                }
                if self.config.method == ScanMethod::Epsilon {
                    self.epsilon_scan(corners);
                } else {
                    self.weighted_sum_scan(corners);
                }
            }
            ScanMethod::BudgetSweep => {
                if self.config.epsilon_on_quality {
                    return Err(ExploreError::WrongAxis);
                }
                if self.config.budget_step <= 0.0 {
                    return Err(ExploreError::InvalidBudgetStep);
                }
                let (max_cost, min_soft) = self.lex_max_cost_min_soft()?;
                self.budget_sweep(max_cost, min_soft);
            }
        }

        Ok(self.pareto())
    }

    /// Both lexicographic corner points; order depends on the scan
    /// direction so the scan starts next to the corner found last.
    fn corner_points(&mut self) -> Result<Corners, ExploreError> {
        let (min_cost, max_soft, max_cost, min_soft);
        if self.config.epsilon_relaxing == self.config.epsilon_on_quality {
            (min_cost, max_soft) = self.lex_min_cost_max_soft()?;
            (max_cost, min_soft) = self.lex_max_cost_min_soft()?;
        } else {
            (max_cost, min_soft) = self.lex_max_cost_min_soft()?;
            (min_cost, max_soft) = self.lex_min_cost_max_soft()?;
        }
        debug!(min_cost, max_cost, min_soft, max_soft, "corner points bracketed");
        Ok(Corners {
            min_cost,
            max_cost,
            min_soft,
            max_soft,
        })
    }

    /// Best quality first, then cheapest at that quality.
    fn lex_max_cost_min_soft(&mut self) -> Result<(f64, i64), ExploreError> {
        debug!("corner: min soft objective, then min cost");
        let limits = self.corner_limits();

        self.oracle.set_objective(ObjectiveWeights::new(1.0, 0.0));
        let sol = require_feasible(self.oracle.optimize(&limits))?;
        let min_soft = sol.soft_objective;
        let soft_bound = sol.bound.ceil() as i64;

        self.oracle.set_quality_bound(Some(min_soft));
        self.oracle.set_objective(ObjectiveWeights::new(0.0, 1.0));
        let sol = require_feasible(self.oracle.optimize(&limits))?;
        let max_cost = sol.cost;
        let cost_bound = sol.bound.ceil() as i64;
        self.record(
            &sol,
            Some(cost_bound),
            Some(soft_bound),
            None,
            Some(min_soft),
        );
        self.merge_pool();
        self.oracle.set_quality_bound(None);
        Ok((max_cost, min_soft))
    }

    /// Cheapest first, then best quality at that cost.
    fn lex_min_cost_max_soft(&mut self) -> Result<(f64, i64), ExploreError> {
        debug!("corner: min cost, then min soft objective");
        let limits = self.corner_limits();

        self.oracle.set_objective(ObjectiveWeights::new(0.0, 1.0));
        let sol = require_feasible(self.oracle.optimize(&limits))?;
        let min_cost = sol.cost;
        let cost_bound = sol.bound.ceil() as i64;

        self.oracle.set_budget_bound(Some(min_cost));
        self.oracle.set_objective(ObjectiveWeights::new(1.0, 0.0));
        let sol = require_feasible(self.oracle.optimize(&limits))?;
        let max_soft = sol.soft_objective;
        let soft_bound = sol.bound.ceil() as i64;
        self.record(
            &sol,
            Some(cost_bound),
            Some(soft_bound),
            Some(min_cost),
            None,
        );
        self.merge_pool();
        self.oracle.set_budget_bound(None);
        Ok((min_cost, max_soft))
    }

    /// Epsilon-constraint scan, optionally followed by the opposite
    /// direction over re-derived corners.
    fn epsilon_scan(&mut self, corners: Corners) {
        let weights = if self.config.epsilon_on_quality {
            ObjectiveWeights::new(0.0, 1.0)
        } else {
            ObjectiveWeights::new(1.0, 0.0)
        };
        self.oracle.set_objective(weights);
        if self.config.local_branching > 0 {
            self.oracle
                .set_proximity_limit(Some(self.config.local_branching));
        }

        self.sweep(corners, self.config.epsilon_relaxing, false);

        if self.config.double_sweep {
            let frontier = self.pareto();
            if let Some(rebracketed) = rebracket(&frontier) {
                debug!("double sweep: running the opposite direction");
                self.sweep(rebracketed, !self.config.epsilon_relaxing, true);
            }
        }

        if self.config.epsilon_on_quality {
            self.oracle.set_quality_bound(None);
        } else {
            self.oracle.set_budget_bound(None);
        }
        if self.config.local_branching > 0 {
            self.oracle.set_proximity_limit(None);
        }
    }

    /// One directional pass over the epsilon levels. `interior_only`
    /// drops the bracket endpoints (the double-sweep pass already has
    /// them as corner points).
    fn sweep(&mut self, corners: Corners, relaxing: bool, interior_only: bool) {
        let steps = self.config.steps;
        let limits = self.solve_limits();

        for i in 0..=steps {
            if interior_only && (i == 0 || i == steps) {
                continue;
            }
            let level = if relaxing { i } else { steps - i };
            let alpha = f64::from(level) / f64::from(steps);

            let (budget, quality);
            if self.config.epsilon_on_quality {
                let q = (corners.min_soft as f64 * (1.0 - alpha)
                    + corners.max_soft as f64 * alpha)
                    .round() as i64;
                debug!(alpha, quality = q, "epsilon level");
                self.oracle.set_quality_bound(Some(q));
                (budget, quality) = (None, Some(q));
            } else {
                let b = corners.min_cost * (1.0 - alpha) + corners.max_cost * alpha;
                debug!(alpha, budget = b, "epsilon level");
                self.oracle.set_budget_bound(Some(b));
                (budget, quality) = (Some(b), None);
            }

            if self.config.local_branching > 0 {
                self.oracle.rebase_proximity();
            }

            match self.oracle.optimize(&limits) {
                SolveOutcome::Feasible(sol) => {
                    let cost_bound = self
                        .config
                        .epsilon_on_quality
                        .then(|| sol.bound.ceil() as i64);
                    let soft_bound = (!self.config.epsilon_on_quality)
                        .then(|| sol.bound.ceil() as i64);
                    self.record(&sol, cost_bound, soft_bound, budget, quality);
                }
                SolveOutcome::Infeasible => {
                    warn!(alpha, "infeasible epsilon level, skipping");
                }
            }
            self.merge_pool();
        }
    }

    /// Weighted-sum scan: a queue of axis intervals, each solved with
    /// slope-derived weights and split at the point found.
    fn weighted_sum_scan(&mut self, corners: Corners) {
        let limits = self.solve_limits();
        let mut queue: VecDeque<(i64, i64, i64, i64)> = VecDeque::new();
        queue.push_back((
            corners.min_soft,
            corners.max_soft,
            corners.min_cost as i64,
            corners.max_cost as i64,
        ));

        for _ in 0..self.config.steps {
            let Some((soft_low, soft_high, cost_low, cost_high)) = queue.pop_front() else {
                debug!("interval queue empty, stopping");
                break;
            };

            // Slope of the interval diagonal becomes the weight pair.
            let soft_weight = cost_high - cost_low;
            let cost_weight = soft_high - soft_low;
            if soft_weight < 1 || cost_weight < 1 {
                debug!(soft_weight, cost_weight, "degenerate interval, discarding");
                continue;
            }

            self.oracle
                .set_objective(ObjectiveWeights::new(soft_weight as f64, cost_weight as f64));
            match self.oracle.optimize(&limits) {
                SolveOutcome::Feasible(sol) => {
                    let found_cost = sol.cost as i64;
                    queue.push_back((soft_low, sol.soft_objective, found_cost, cost_high));
                    queue.push_back((sol.soft_objective, soft_high, cost_low, found_cost));

                    // bound ≤ cost·costWeight + soft·softWeight
                    let cost_bound = (sol.bound / cost_weight as f64).floor() as i64;
                    let soft_bound = (sol.bound / soft_weight as f64).floor() as i64;
                    self.record(&sol, Some(cost_bound), Some(soft_bound), None, None);
                }
                SolveOutcome::Infeasible => {
                    warn!("infeasible weighted-sum interval, skipping");
                }
            }
            self.merge_pool();
        }
    }

    /// Fixed-increment budget levels until the budget exceeds the
    /// expensive corner or quality hits its global minimum.
    fn budget_sweep(&mut self, max_cost: f64, min_soft: i64) {
        let limits = self.solve_limits();
        self.oracle.set_objective(ObjectiveWeights::new(1.0, 0.0));

        let mut level = self.config.budget_step;
        while level < max_cost {
            debug!(level, "budget level");
            self.oracle.set_budget_bound(Some(level));
            match self.oracle.optimize(&limits) {
                SolveOutcome::Feasible(sol) => {
                    let soft_bound = sol.bound.ceil() as i64;
                    let reached = sol.soft_objective;
                    self.record(&sol, None, Some(soft_bound), Some(level), None);
                    if reached <= min_soft {
                        debug!("global quality minimum reached, stopping");
                        break;
                    }
                }
                SolveOutcome::Infeasible => {
                    warn!(level, "infeasible budget level, skipping");
                }
            }
            level += self.config.budget_step;
        }
        self.oracle.set_budget_bound(None);
    }

    fn record(
        &mut self,
        sol: &OracleSolution,
        cost_bound: Option<i64>,
        soft_objective_bound: Option<i64>,
        cost_constraint: Option<f64>,
        quality_constraint: Option<i64>,
    ) {
        self.candidates.push(ParetoPoint {
            cost: sol.cost,
            soft_objective: sol.soft_objective,
            cost_bound,
            soft_objective_bound,
            cost_constraint,
            quality_constraint,
            seconds_since_start: Some(self.started.elapsed().as_secs()),
            assignments: sol.assignments.clone(),
            room_usage: sol.room_usage.clone(),
        });
    }

    /// Folds the oracle's incidental solutions into the candidate set.
    fn merge_pool(&mut self) {
        let elapsed = self.started.elapsed().as_secs();
        for found in self.oracle.solution_pool() {
            self.candidates.push(ParetoPoint {
                cost: found.cost,
                soft_objective: found.soft_objective,
                cost_bound: None,
                soft_objective_bound: None,
                cost_constraint: None,
                quality_constraint: None,
                seconds_since_start: Some(elapsed),
                assignments: found.assignments,
                room_usage: found.room_usage,
            });
        }
    }

    fn pareto(&self) -> Vec<ParetoPoint> {
        pareto_points(&self.candidates, self.config.epsilon_on_quality)
    }

    fn solve_limits(&self) -> SolveLimits {
        SolveLimits {
            time_limit: self.config.time_limit,
            gap: self.config.gap,
            cutoff: None,
        }
    }

    fn corner_limits(&self) -> SolveLimits {
        SolveLimits {
            time_limit: self.config.time_limit * self.config.corner_time_multiplier,
            gap: self.config.gap,
            cutoff: None,
        }
    }
}

fn require_feasible(outcome: SolveOutcome) -> Result<OracleSolution, ExploreError> {
    match outcome {
        SolveOutcome::Feasible(sol) => Ok(sol),
        SolveOutcome::Infeasible => Err(ExploreError::CornerInfeasible),
    }
}

/// Axis brackets re-derived from an intermediate frontier.
fn rebracket(frontier: &[ParetoPoint]) -> Option<Corners> {
    let first = frontier.first()?;
    let mut corners = Corners {
        min_cost: first.cost,
        max_cost: first.cost,
        min_soft: first.soft_objective,
        max_soft: first.soft_objective,
    };
    for point in frontier {
        corners.min_cost = corners.min_cost.min(point.cost);
        corners.max_cost = corners.max_cost.max(point.cost);
        corners.min_soft = corners.min_soft.min(point.soft_objective);
        corners.max_soft = corners.max_soft.max(point.soft_objective);
    }
    Some(corners)
}

/// Dominance filter over recorded candidates.
///
/// Candidates are ordered by (cost ascending, soft objective
/// ascending, cost bound descending); a candidate survives only if
/// its soft objective strictly improves on every cheaper survivor,
/// which leaves the frontier strictly monotone. Each survivor's
/// bound on the scanned axis is then tightened to the best bound
/// proven under an equal-or-looser constraint level (an unconstrained
/// candidate counts as loosest).
pub fn pareto_points(candidates: &[ParetoPoint], epsilon_on_quality: bool) -> Vec<ParetoPoint> {
    let mut ordered: Vec<&ParetoPoint> = candidates.iter().collect();
    ordered.sort_by(|a, b| {
        a.cost
            .total_cmp(&b.cost)
            .then_with(|| a.soft_objective.cmp(&b.soft_objective))
            .then_with(|| b.cost_bound.cmp(&a.cost_bound))
    });

    let mut kept = Vec::new();
    let mut dominating_soft = i64::MAX;
    for point in ordered {
        if point.soft_objective >= dominating_soft {
            continue;
        }
        dominating_soft = point.soft_objective;

        let mut point = point.clone();
        if epsilon_on_quality {
            point.cost_bound = candidates
                .iter()
                .filter(|c| match (c.quality_constraint, point.quality_constraint) {
                    (None, _) => true,
                    (Some(level), Some(kept_level)) => level >= kept_level,
                    (Some(_), None) => false,
                })
                .filter_map(|c| c.cost_bound)
                .max();
        } else {
            point.soft_objective_bound = candidates
                .iter()
                .filter(|c| match (c.cost_constraint, point.cost_constraint) {
                    (None, _) => true,
                    (Some(level), Some(kept_level)) => level >= kept_level,
                    (Some(_), None) => false,
                })
                .filter_map(|c| c.soft_objective_bound)
                .max();
        }
        kept.push(point);
    }
    kept
}
