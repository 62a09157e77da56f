//! # Planner
//!
//! The planner ties the pieces together: a compiled [`RuleSet`], a search
//! algorithm and the limits to run it under. A [`Problem`] bundles the
//! static inputs of one planning task (catalog, initial inventory, goal and
//! rules), as produced by the [`catalog`](crate::catalog) loader.
//!
//! ## Basic Usage
//!
//! ```
//! use craftplan::{Goal, ItemCatalog, Planner, RuleSet, RuleSpec, State};
//!
//! let catalog = ItemCatalog::new(["wood", "plank"]);
//! let specs = vec![RuleSpec::new("make_planks", 1.0).consumes("wood", 1).produces("plank", 4)];
//! let rules = RuleSet::compile(&specs, &catalog).unwrap();
//! let planner = Planner::new(rules);
//!
//! let initial = State::from_quantities(&catalog, [("wood", 1)]).unwrap();
//! let goal = Goal::from_pairs(&catalog, [("plank", 4)]).unwrap();
//!
//! let plan = planner.plan(&initial, &goal).unwrap();
//! assert_eq!(plan.actions(), ["make_planks"]);
//! assert_eq!(plan.final_state().unwrap().display(&catalog).to_string(), "{plank: 4}");
//! ```

use crate::goal::{Goal, GoalSpec};
use crate::item::ItemCatalog;
use crate::path::Plan;
use crate::rule::{RuleSet, RuleSpec};
use crate::search::{AStarSearch, SearchAlgorithm, SearchConfig, SearchOutcome};
use crate::state::State;
use crate::Result;

/// Finds plans for a fixed rule set.
///
/// The rule set and search algorithm are read-only once the planner is
/// built, so the same planner can answer many `(initial, goal)` queries.
pub struct Planner {
    rules: RuleSet,
    search_algorithm: Box<dyn SearchAlgorithm>,
    config: SearchConfig,
}

impl Planner {
    /// Creates a planner that uses [`AStarSearch::default`] (uniform-cost
    /// search, cost-optimal) with the default time limit.
    pub fn new(rules: RuleSet) -> Self {
        Self::with_search_algorithm(rules, Box::new(AStarSearch::default()))
    }

    pub fn with_search_algorithm(
        rules: RuleSet,
        search_algorithm: Box<dyn SearchAlgorithm>,
    ) -> Self {
        Self {
            rules,
            search_algorithm,
            config: SearchConfig::default(),
        }
    }

    /// Replaces the search limits.
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Runs the search and reports the full outcome, including statistics
    /// and why no plan was found.
    pub fn search(&self, initial: &State, goal: &Goal) -> Result<SearchOutcome> {
        self.search_algorithm
            .search(&self.rules, initial, goal, &self.config)
    }

    /// Returns a plan, or [`PlanError::NoPlanFound`](crate::PlanError::NoPlanFound)
    /// when the search ends without one.
    pub fn plan(&self, initial: &State, goal: &Goal) -> Result<Plan> {
        self.search(initial, goal)?.into_result()
    }
}

/// The static inputs of one planning task.
#[derive(Debug, Clone)]
pub struct Problem {
    pub catalog: ItemCatalog,
    pub initial: State,
    pub goal: Goal,
    pub rules: RuleSet,
}

impl Problem {
    /// Validates and compiles raw inputs.
    ///
    /// Unknown items and bad quantities in the inventory or goal, and any
    /// malformed rule, are reported before a search can start.
    pub fn build<I, S>(
        catalog: ItemCatalog,
        initial: I,
        goal: &GoalSpec,
        rules: &[RuleSpec],
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        let initial = State::from_quantities(&catalog, initial)?;
        let goal = Goal::compile(goal, &catalog)?;
        let rules = RuleSet::compile(rules, &catalog)?;
        Ok(Self {
            catalog,
            initial,
            goal,
            rules,
        })
    }

    /// Searches this problem with `algorithm` under `config`.
    pub fn solve(
        &self,
        algorithm: &dyn SearchAlgorithm,
        config: &SearchConfig,
    ) -> Result<SearchOutcome> {
        algorithm.search(&self.rules, &self.initial, &self.goal, config)
    }

    /// Consumes the problem into a default [`Planner`] plus the query inputs.
    pub fn into_planner(self) -> (Planner, ItemCatalog, State, Goal) {
        (Planner::new(self.rules), self.catalog, self.initial, self.goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{DijkstraSearch, NoPlanReason};
    use crate::{GoalDeficitHeuristic, PlanError};
    use std::time::Duration;

    fn specs() -> Vec<RuleSpec> {
        vec![
            RuleSpec::new("a", 1.0).requires("start").produces("mid", 1),
            RuleSpec::new("b", 1.0).requires("mid").produces("end", 1),
            RuleSpec::new("c", 1.0).requires("end").produces("goal", 1),
        ]
    }

    fn catalog() -> ItemCatalog {
        ItemCatalog::new(["start", "mid", "end", "goal"])
    }

    #[test]
    fn test_simple_plan() {
        let catalog = catalog();
        let planner = Planner::new(RuleSet::compile(&specs(), &catalog).unwrap());
        let initial = State::from_quantities(&catalog, [("start", 1)]).unwrap();
        let goal = Goal::from_pairs(&catalog, [("goal", 1)]).unwrap();

        let plan = planner.plan(&initial, &goal).unwrap();
        assert_eq!(plan.actions(), ["a", "b", "c"]);
        assert_eq!(plan.total_cost(), 3.0);
    }

    #[test]
    fn test_no_plan_found() {
        let catalog = catalog();
        let planner = Planner::new(RuleSet::compile(&specs(), &catalog).unwrap());
        let initial = State::empty(&catalog);
        let goal = Goal::from_pairs(&catalog, [("goal", 1)]).unwrap();
        let result = planner.plan(&initial, &goal);
        assert!(matches!(
            result,
            Err(PlanError::NoPlanFound(NoPlanReason::Exhausted))
        ));
    }

    #[test]
    fn test_different_search_algorithms() {
        let catalog = catalog();
        let rules = RuleSet::compile(&specs(), &catalog).unwrap();
        let initial = State::from_quantities(&catalog, [("start", 1)]).unwrap();
        let goal = Goal::from_pairs(&catalog, [("goal", 1)]).unwrap();

        let astar = Planner::with_search_algorithm(
            rules.clone(),
            Box::new(AStarSearch::with_heuristic(GoalDeficitHeuristic::for_rules(&rules))),
        );
        let dijkstra = Planner::with_search_algorithm(rules, Box::new(DijkstraSearch));
        assert_eq!(
            astar.plan(&initial, &goal).unwrap(),
            dijkstra.plan(&initial, &goal).unwrap()
        );
    }

    #[test]
    fn test_with_config_applies_time_limit() {
        let catalog = catalog();
        let planner = Planner::new(RuleSet::compile(&specs(), &catalog).unwrap())
            .with_config(SearchConfig::new(Duration::ZERO));
        let initial = State::from_quantities(&catalog, [("start", 1)]).unwrap();
        let goal = Goal::from_pairs(&catalog, [("goal", 1)]).unwrap();
        let outcome = planner.search(&initial, &goal).unwrap();
        assert!(!outcome.is_found());
        assert_eq!(planner.config().time_limit, Duration::ZERO);
    }

    #[test]
    fn test_into_planner() {
        let mut goal = GoalSpec::new();
        goal.insert("goal".to_string(), 1);
        let problem = Problem::build(catalog(), [("start", 1)], &goal, &specs()).unwrap();

        let (planner, catalog, initial, goal) = problem.into_planner();
        assert_eq!(planner.rules().len(), 3);
        assert_eq!(catalog.len(), 4);
        let plan = planner.plan(&initial, &goal).unwrap();
        assert_eq!(plan.actions(), ["a", "b", "c"]);
    }

    #[test]
    fn test_problem_build_validates_inputs() {
        let mut goal = GoalSpec::new();
        goal.insert("goal".to_string(), 1);

        let problem = Problem::build(catalog(), [("start", 1)], &goal, &specs()).unwrap();
        let outcome = problem
            .solve(&DijkstraSearch, &SearchConfig::default())
            .unwrap();
        assert_eq!(outcome.plan().unwrap().len(), 3);

        let bad = Problem::build(catalog(), [("stone", 1)], &goal, &specs());
        assert!(matches!(bad, Err(PlanError::UnknownItem(_))));

        let mut bad_rules = specs();
        bad_rules.push(RuleSpec::new("d", -2.0));
        let bad = Problem::build(catalog(), [("start", 1)], &goal, &bad_rules);
        assert!(matches!(bad, Err(PlanError::MalformedRule { .. })));
    }
}
