//! Cost-to-go estimates used to order the search frontier.
//!
//! A heuristic must be a pure function of the state and the static problem
//! data, and must never return a negative number or NaN. Returning
//! [`INFEASIBLE`] marks the state as a dead end; the search drops it.

use crate::goal::Goal;
use crate::item::ItemId;
use crate::rule::RuleSet;
use crate::state::State;

/// Estimate meaning "no plan passes through this state".
pub const INFEASIBLE: f64 = f64::INFINITY;

/// A trait for heuristic functions used in search algorithms.
pub trait Heuristic: Send + Sync {
    /// Estimates the remaining cost from `state` to any state satisfying
    /// `goal`. Should be 0 on goal states.
    fn estimate(&self, state: &State, goal: &Goal) -> f64;
}

impl<F> Heuristic for F
where
    F: Fn(&State, &Goal) -> f64 + Send + Sync,
{
    fn estimate(&self, state: &State, goal: &Goal) -> f64 {
        self(state, goal)
    }
}

/// Zero heuristic; turns best-first search into uniform-cost search.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    fn estimate(&self, _state: &State, _goal: &Goal) -> f64 {
        0.0
    }
}

/// Counts unmet goal entries, each weighted by `step_cost`.
///
/// With `step_cost` set to the cheapest rule cost this never overestimates
/// as long as no single rule can complete two goal entries at once. Recipe
/// books where one rule produces several goal items make it inadmissible,
/// and plans found with it may then cost more than the optimum.
#[derive(Debug, Clone, Copy)]
pub struct GoalDeficitHeuristic {
    step_cost: f64,
}

impl GoalDeficitHeuristic {
    pub fn new(step_cost: f64) -> Self {
        Self {
            step_cost: step_cost.max(0.0),
        }
    }

    /// Weights each unmet entry by the cheapest rule in `rules`.
    pub fn for_rules(rules: &RuleSet) -> Self {
        Self::new(rules.min_cost().unwrap_or(0.0))
    }
}

impl Default for GoalDeficitHeuristic {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Heuristic for GoalDeficitHeuristic {
    fn estimate(&self, state: &State, goal: &Goal) -> f64 {
        goal.unmet(state) as f64 * self.step_cost
    }
}

/// Prunes states that hold redundant copies of a tool.
///
/// A tool is an item some rule requires and no rule consumes. Having more of
/// them than the start already had never enables anything new, so such
/// states are reported as [`INFEASIBLE`]. The allowance per tool is the
/// largest of 1, the initial count and the goal's minimum. All other states
/// are scored by the wrapped heuristic.
#[derive(Debug, Clone)]
pub struct ToolPruning<H> {
    inner: H,
    /// `(tool, count held at the start, at least 1)`
    allowances: Vec<(ItemId, u32)>,
}

impl<H: Heuristic> ToolPruning<H> {
    /// Prunes relative to the tools `rules` define and what `initial` holds.
    pub fn new(inner: H, rules: &RuleSet, initial: &State) -> Self {
        let allowances = rules
            .tools()
            .into_iter()
            .map(|tool| (tool, initial.get(tool).max(1)))
            .collect();
        Self { inner, allowances }
    }

    pub fn tools(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.allowances.iter().map(|&(tool, _)| tool)
    }
}

impl<H: Heuristic> Heuristic for ToolPruning<H> {
    fn estimate(&self, state: &State, goal: &Goal) -> f64 {
        let redundant = self
            .allowances
            .iter()
            .any(|&(tool, allowed)| state.get(tool) > allowed.max(goal.minimum(tool)));
        if redundant {
            return INFEASIBLE;
        }
        self.inner.estimate(state, goal)
    }
}
