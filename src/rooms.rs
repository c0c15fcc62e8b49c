//! Room-profile enumeration for strategic (budget-driven) planning.
//!
//! Given the lecture-hour demand per course size and a weekly slot
//! count, derives the cheapest room profile that can host everything,
//! then enumerates every way to spend a larger budget exactly by
//! upgrading rooms to bigger brackets or adding new ones. The plans
//! feed budget-constrained exploration runs; no solving happens here.

use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::debug;

use crate::models::Instance;

/// Count of the synthetic zero-size bucket. Upgrading out of it models
/// buying a room that the baseline profile does not contain.
const ZERO_BUCKET_COUNT: u32 = 999;

/// Errors raised while building or querying room plans.
#[derive(Debug, Error, PartialEq)]
pub enum RoomPlanError {
    /// The requested budget cannot even pay for the minimal profile.
    #[error("budget {budget} is below the minimum achievable cost {minimum}")]
    BudgetBelowMinimum {
        /// The rejected budget.
        budget: u64,
        /// Cost of the baseline minimal profile.
        minimum: u64,
    },
    /// The weekly grid holds no slots, so no demand can be hosted.
    #[error("a room plan needs at least one time slot per week")]
    EmptyWeek,
}

/// A room-bracket profile: bracket size to room count.
pub type RoomPlan = BTreeMap<u32, u32>;

/// Enumerates room profiles meeting a demand at an exact budget.
#[derive(Debug, Clone)]
pub struct RoomCombinations {
    /// Upgrade buckets ascending by size, including the synthetic
    /// zero-size bucket.
    buckets: Vec<(u32, u32)>,
    min_cost: u64,
}

impl RoomCombinations {
    /// Builds the generator from raw demand pairs `(size, hours)`.
    ///
    /// `demand` lists the total weekly lecture hours required per
    /// course size; duplicate sizes are merged. `interval_size > 1`
    /// coarsens room sizes up to the next multiple before planning.
    pub fn new(
        demand: &[(u32, u32)],
        weekly_slots: u32,
        interval_size: u32,
    ) -> Result<Self, RoomPlanError> {
        if weekly_slots == 0 {
            return Err(RoomPlanError::EmptyWeek);
        }

        let mut merged: BTreeMap<u32, u32> = BTreeMap::new();
        for &(size, hours) in demand {
            *merged.entry(size).or_insert(0) += hours;
        }

        // Largest sizes first; a bigger room always serves smaller demand,
        // so unused hours carry forward down the brackets.
        let mut profile: Vec<(u32, u32)> = Vec::with_capacity(merged.len());
        let mut hours_left = 0u32;
        for (&size, &hours) in merged.iter().rev() {
            if hours_left < hours {
                let rooms = (hours - hours_left).div_ceil(weekly_slots);
                profile.push((size, rooms));
                hours_left += weekly_slots * rooms;
            } else {
                profile.push((size, 0));
            }
            hours_left -= hours;
        }

        let mut buckets: Vec<(u32, u32)> = profile;
        buckets.push((0, ZERO_BUCKET_COUNT));
        buckets.sort_unstable_by_key(|&(size, _)| size);

        if interval_size > 1 {
            let mut coarsened: BTreeMap<u32, u32> = BTreeMap::new();
            for (size, count) in buckets {
                let rounded = size.div_ceil(interval_size) * interval_size;
                *coarsened.entry(rounded).or_insert(0) += count;
            }
            buckets = coarsened.into_iter().collect();
        }

        let min_cost = buckets
            .iter()
            .map(|&(size, count)| u64::from(size) * u64::from(count))
            .sum();

        Ok(Self { buckets, min_cost })
    }

    /// Derives the demand from an instance: courses grouped by student
    /// count, lecture hours summed per group.
    pub fn from_instance(
        instance: &Instance,
        interval_size: u32,
    ) -> Result<Self, RoomPlanError> {
        let mut demand: BTreeMap<u32, u32> = BTreeMap::new();
        for course in instance.courses() {
            *demand.entry(course.students).or_insert(0) += course.lectures;
        }
        let demand: Vec<(u32, u32)> = demand.into_iter().collect();
        Self::new(&demand, instance.time_slots().len() as u32, interval_size)
    }

    /// Cost of the baseline minimal profile.
    pub fn min_cost(&self) -> u64 {
        self.min_cost
    }

    /// The baseline minimal profile (synthetic bucket excluded).
    pub fn baseline(&self) -> RoomPlan {
        self.buckets
            .iter()
            .filter(|&&(size, _)| size != 0)
            .copied()
            .collect()
    }

    /// Every room profile whose total cost equals `budget` exactly.
    ///
    /// The excess over the baseline cost is spent by upgrading rooms
    /// to larger brackets (upgrading out of the synthetic zero bucket
    /// adds a room). Enumeration is index-ordered, so no two returned
    /// plans are permutation-equal.
    pub fn combinations(&self, budget: u64) -> Result<Vec<RoomPlan>, RoomPlanError> {
        if budget < self.min_cost {
            return Err(RoomPlanError::BudgetBelowMinimum {
                budget,
                minimum: self.min_cost,
            });
        }
        let excess = budget - self.min_cost;

        let mut upgrades = Vec::new();
        self.collect_upgrades(0, 1, excess, &Vec::new(), 0, &mut upgrades);

        let mut seen = HashSet::new();
        let mut plans = Vec::new();
        for upgrade_set in upgrades {
            let mut plan: BTreeMap<u32, i64> = self
                .buckets
                .iter()
                .map(|&(size, count)| (size, i64::from(count)))
                .collect();
            for (from, to) in upgrade_set {
                if let Some(count) = plan.get_mut(&from) {
                    *count -= 1;
                }
                if let Some(count) = plan.get_mut(&to) {
                    *count += 1;
                }
            }
            plan.remove(&0);

            // A bucket may not lend more rooms than the baseline holds.
            if plan.values().any(|&count| count < 0) {
                continue;
            }
            let plan: RoomPlan = plan
                .into_iter()
                .map(|(size, count)| (size, count as u32))
                .collect();
            // Distinct upgrade paths can land on the same profile.
            if seen.insert(plan.clone()) {
                plans.push(plan);
            }
        }

        debug!(budget, excess, plans = plans.len(), "room plans enumerated");
        Ok(plans)
    }

    /// Depth-first search over `(source bracket, target bracket)`
    /// upgrade pairs. Indexes only move forward, which rules out
    /// permutation duplicates; branches are cut as soon as the partial
    /// cost would overshoot the target.
    fn collect_upgrades(
        &self,
        start_i: usize,
        start_j: usize,
        target: u64,
        partial: &[(u32, u32)],
        partial_sum: u64,
        out: &mut Vec<Vec<(u32, u32)>>,
    ) {
        if partial_sum == target {
            out.push(partial.to_vec());
            return;
        }
        let remaining = target - partial_sum;

        for i in start_i..self.buckets.len() {
            let (from_size, available) = self.buckets[i];
            if available == 0 {
                continue;
            }
            let first_j = if i == start_i { start_j } else { i + 1 };
            for j in first_j..self.buckets.len() {
                let step = u64::from(self.buckets[j].0 - from_size);
                if step > remaining {
                    break;
                }
                let mut grown = partial.to_vec();
                for k in 1..=u64::from(available) {
                    if k * step > remaining {
                        break;
                    }
                    grown.push((from_size, self.buckets[j].0));
                    self.collect_upgrades(i, j + 1, target, &grown, partial_sum + k * step, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, Lecturer, Room};
    use proptest::prelude::*;

    fn plan_cost(plan: &RoomPlan) -> u64 {
        plan.iter()
            .map(|(&size, &count)| u64::from(size) * u64::from(count))
            .sum()
    }

    #[test]
    fn test_baseline_profile_with_carry_over() {
        // 10 hours of size-30 demand over 5 weekly slots needs 2 rooms;
        // the size-20 demand then still needs 1 more.
        let rc = RoomCombinations::new(&[(30, 10), (20, 5)], 5, 1).unwrap();
        assert_eq!(rc.min_cost(), 80);
        let baseline = rc.baseline();
        assert_eq!(baseline[&30], 2);
        assert_eq!(baseline[&20], 1);
    }

    #[test]
    fn test_carry_over_absorbs_smaller_demand() {
        // 9 hours of size-30 demand leaves 1 spare hour that fully
        // covers the size-20 demand.
        let rc = RoomCombinations::new(&[(30, 9), (20, 1)], 5, 1).unwrap();
        assert_eq!(rc.min_cost(), 60);
        assert_eq!(rc.baseline()[&30], 2);
        assert_eq!(rc.baseline()[&20], 0);
    }

    #[test]
    fn test_exact_baseline_budget_returns_single_plan() {
        let rc = RoomCombinations::new(&[(30, 10), (20, 5)], 5, 1).unwrap();
        let plans = rc.combinations(80).unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0], rc.baseline());
    }

    #[test]
    fn test_budget_below_minimum_is_an_error() {
        let rc = RoomCombinations::new(&[(30, 10), (20, 5)], 5, 1).unwrap();
        assert_eq!(
            rc.combinations(79),
            Err(RoomPlanError::BudgetBelowMinimum {
                budget: 79,
                minimum: 80
            })
        );
    }

    #[test]
    fn test_upgrade_spends_excess_exactly() {
        // Excess 10 can only be spent by upgrading the size-20 room
        // to size 30.
        let rc = RoomCombinations::new(&[(30, 10), (20, 5)], 5, 1).unwrap();
        let plans = rc.combinations(90).unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0][&30], 3);
        assert_eq!(plans[0][&20], 0);
        assert_eq!(plan_cost(&plans[0]), 90);
    }

    #[test]
    fn test_zero_bucket_models_added_rooms() {
        // Excess 20 can be spent by upgrading 20→30 twice (blocked:
        // only one size-20 room), by adding a size-20 room, or other
        // exact spendings; every plan must cost the budget exactly.
        let rc = RoomCombinations::new(&[(30, 10), (20, 5)], 5, 1).unwrap();
        let plans = rc.combinations(100).unwrap();
        assert!(!plans.is_empty());
        for plan in &plans {
            assert_eq!(plan_cost(plan), 100);
        }
        // Adding a fresh size-20 room is one of the options.
        assert!(plans.iter().any(|p| p[&20] == 2 && p[&30] == 2));
    }

    #[test]
    fn test_no_bucket_lends_more_rooms_than_it_has() {
        let rc = RoomCombinations::new(&[(30, 10), (20, 5)], 5, 1).unwrap();
        for budget in 80..=140 {
            for plan in rc.combinations(budget).unwrap() {
                // u32 counts: any overdraw would have been filtered out.
                assert!(plan.values().all(|&c| c <= 10));
            }
        }
    }

    #[test]
    fn test_interval_grouping_rounds_sizes_up() {
        let rc = RoomCombinations::new(&[(28, 5), (22, 5)], 5, 10).unwrap();
        assert_eq!(rc.min_cost(), 60);
        assert_eq!(rc.baseline()[&30], 2);
    }

    #[test]
    fn test_empty_week_rejected() {
        assert!(matches!(
            RoomCombinations::new(&[(30, 10)], 0, 1),
            Err(RoomPlanError::EmptyWeek)
        ));
    }

    #[test]
    fn test_from_instance_groups_by_course_size() {
        let inst = Instance::new(
            vec![
                Course::new("c1", "t1", 6, 3, 30),
                Course::new("c2", "t1", 4, 2, 30),
                Course::new("c3", "t2", 5, 3, 20),
            ],
            vec![
                Lecturer::new("t1").with_course("c1").with_course("c2"),
                Lecturer::new("t2").with_course("c3"),
            ],
            vec![Room::new("R1", 30)],
            vec![],
            1,
            5,
        );
        // Same demand as the hand-built generator above.
        let rc = RoomCombinations::from_instance(&inst, 1).unwrap();
        assert_eq!(rc.min_cost(), 80);
    }

    proptest! {
        /// Every returned plan costs the budget exactly, and no plan
        /// appears twice.
        #[test]
        fn prop_plans_hit_budget_exactly(
            demand in proptest::collection::vec((1u32..60, 1u32..12), 1..4),
            extra in 0u64..25,
        ) {
            let rc = RoomCombinations::new(&demand, 5, 1).unwrap();
            let budget = rc.min_cost() + extra;
            let plans = rc.combinations(budget).unwrap();
            let mut seen = HashSet::new();
            for plan in &plans {
                prop_assert_eq!(plan_cost(plan), budget);
                prop_assert!(seen.insert(plan.clone()));
            }
        }

        /// Budgets below the baseline are always rejected.
        #[test]
        fn prop_budget_below_minimum_rejected(
            demand in proptest::collection::vec((1u32..60, 1u32..12), 1..4),
        ) {
            let rc = RoomCombinations::new(&demand, 5, 1).unwrap();
            prop_assume!(rc.min_cost() > 0);
            let below = rc.min_cost() - 1;
            prop_assert!(rc.combinations(below).is_err());
        }
    }
}
