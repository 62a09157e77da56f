use craftplan::{
    expand, AStarSearch, CraftingData, DijkstraSearch, Goal, GoalDeficitHeuristic, ItemCatalog,
    NoPlanReason, PlanError, Planner, RuleSet, RuleSpec, SearchAlgorithm, SearchConfig,
    SearchOutcome, State, ToolPruning,
};
use std::time::Duration;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_rule_plan() {
        let catalog = ItemCatalog::new(["wood", "plank"]);
        let specs = vec![RuleSpec::new("make_planks", 1.0)
            .consumes("wood", 1)
            .produces("plank", 4)];
        let planner = Planner::new(RuleSet::compile(&specs, &catalog).unwrap());

        let initial = State::from_quantities(&catalog, [("wood", 1)]).unwrap();
        let goal = Goal::from_pairs(&catalog, [("plank", 4)]).unwrap();

        let plan = planner.plan(&initial, &goal).unwrap();
        assert_eq!(plan.actions(), ["make_planks"]);

        let expected = State::from_quantities(&catalog, [("wood", 0), ("plank", 4)]).unwrap();
        assert_eq!(plan.final_state(), Some(&expected));
        assert_eq!(plan.initial_state(), Some(&initial));
    }

    #[test]
    fn test_unproducible_goal_fails_fast() {
        let catalog = ItemCatalog::new(["wood", "plank", "diamond"]);
        let specs = vec![RuleSpec::new("make_planks", 1.0)
            .consumes("wood", 1)
            .produces("plank", 4)];
        let rules = RuleSet::compile(&specs, &catalog).unwrap();
        let initial = State::from_quantities(&catalog, [("wood", 5)]).unwrap();
        let goal = Goal::from_pairs(&catalog, [("diamond", 1)]).unwrap();

        let config = SearchConfig::new(Duration::from_secs(30));
        let outcome = DijkstraSearch
            .search(&rules, &initial, &goal, &config)
            .unwrap();
        match outcome {
            SearchOutcome::NoPlanFound { reason, stats } => {
                assert_eq!(reason, NoPlanReason::Exhausted);
                assert!(stats.elapsed < config.time_limit);
            }
            SearchOutcome::Found { plan, .. } => panic!("unexpected plan {:?}", plan.actions()),
        }
    }

    #[test]
    fn test_multiple_paths_to_goal() {
        let catalog = ItemCatalog::new(["start", "goal"]);
        let specs = vec![
            RuleSpec::new("expensive_action", 5.0)
                .requires("start")
                .produces("goal", 1),
            RuleSpec::new("cheap_action", 1.0)
                .requires("start")
                .produces("goal", 1),
        ];
        let planner = Planner::new(RuleSet::compile(&specs, &catalog).unwrap());
        let initial = State::from_quantities(&catalog, [("start", 1)]).unwrap();
        let goal = Goal::from_pairs(&catalog, [("goal", 1)]).unwrap();

        let plan = planner.plan(&initial, &goal).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.actions(), ["cheap_action"]);
        assert_eq!(plan.total_cost(), 1.0);
    }

    #[test]
    fn test_rule_consuming_too_much_is_not_expanded() {
        let catalog = ItemCatalog::new(["iron", "ingot"]);
        let specs = vec![
            RuleSpec::new("smelt", 2.0).consumes("iron", 3).produces("ingot", 1),
            RuleSpec::new("mine", 3.0).produces("iron", 1),
        ];
        let rules = RuleSet::compile(&specs, &catalog).unwrap();
        let state = State::from_quantities(&catalog, [("iron", 2)]).unwrap();

        let actions: Vec<_> = expand(&rules, &state).map(|t| t.action).collect();
        assert_eq!(actions, ["mine"]);
    }

    #[test]
    fn test_conjunctive_goal_needs_every_item() {
        let catalog = ItemCatalog::new(["wood", "plank", "stick"]);
        let specs = vec![
            RuleSpec::new("craft plank", 1.0).consumes("wood", 1).produces("plank", 4),
            RuleSpec::new("craft stick", 1.0).consumes("plank", 2).produces("stick", 4),
        ];
        let planner = Planner::new(RuleSet::compile(&specs, &catalog).unwrap());
        let initial = State::from_quantities(&catalog, [("wood", 1)]).unwrap();
        let goal = Goal::from_pairs(&catalog, [("plank", 2), ("stick", 4)]).unwrap();

        let plan = planner.plan(&initial, &goal).unwrap();
        assert_eq!(plan.actions(), ["craft plank", "craft stick"]);
        assert!(goal.is_goal(plan.final_state().unwrap()));
    }

    #[test]
    fn test_invalid_rule_rejected_before_search() {
        let catalog = ItemCatalog::new(["wood"]);
        let specs = vec![RuleSpec::new("burn", -1.0).consumes("wood", 1)];
        let result = RuleSet::compile(&specs, &catalog);
        assert!(matches!(result, Err(PlanError::MalformedRule { .. })));
    }

    #[test]
    fn test_shared_rules_across_runs() {
        let catalog = ItemCatalog::new(["wood", "plank"]);
        let specs = vec![
            RuleSpec::new("punch for wood", 4.0).produces("wood", 1),
            RuleSpec::new("make_planks", 1.0).consumes("wood", 1).produces("plank", 4),
        ];
        let rules = RuleSet::compile(&specs, &catalog).unwrap();
        let initial = State::empty(&catalog);
        let goal = Goal::from_pairs(&catalog, [("plank", 8)]).unwrap();

        let quick = SearchConfig::new(Duration::ZERO);
        let patient = SearchConfig::default();
        let astar = AStarSearch::default();
        assert!(!astar.search(&rules, &initial, &goal, &quick).unwrap().is_found());
        let plan = astar
            .search(&rules, &initial, &goal, &patient)
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(plan.total_cost(), 10.0);
    }

    #[test]
    fn test_tool_pruning_with_spare_tools_in_inventory() {
        let catalog = ItemCatalog::new(["bench", "plank", "wooden_pickaxe"]);
        let specs = vec![RuleSpec::new("craft wooden_pickaxe at bench", 1.0)
            .requires("bench")
            .consumes("plank", 3)
            .produces("wooden_pickaxe", 1)];
        let rules = RuleSet::compile(&specs, &catalog).unwrap();
        let initial = State::from_quantities(&catalog, [("bench", 2), ("plank", 3)]).unwrap();
        let goal = Goal::from_pairs(&catalog, [("wooden_pickaxe", 1)]).unwrap();

        let pruned = AStarSearch::with_heuristic(ToolPruning::new(
            GoalDeficitHeuristic::default(),
            &rules,
            &initial,
        ));
        let outcome = pruned
            .search(&rules, &initial, &goal, &SearchConfig::default())
            .unwrap();
        assert_eq!(outcome.stats().pruned, 0);
        assert_eq!(
            outcome.into_result().unwrap().actions(),
            ["craft wooden_pickaxe at bench"]
        );
    }

    #[test]
    fn test_crafting_file_end_to_end() {
        let json = include_str!("../demos/crafting.json");
        let problem = CraftingData::from_json_str(json)
            .unwrap()
            .into_problem()
            .unwrap();

        let optimal = problem
            .solve(&DijkstraSearch, &SearchConfig::default())
            .unwrap()
            .into_result()
            .unwrap();
        let pruned = AStarSearch::with_heuristic(ToolPruning::new(
            GoalDeficitHeuristic::default(),
            &problem.rules,
            &problem.initial,
        ));
        let fast = problem
            .solve(&pruned, &SearchConfig::default())
            .unwrap()
            .into_result()
            .unwrap();

        for plan in [&optimal, &fast] {
            assert!(problem.goal.is_goal(plan.final_state().unwrap()));
            // Replaying the actions from the initial state reproduces each step.
            let mut state = problem.initial.clone();
            for step in plan.steps().iter().skip(1) {
                let rule = problem
                    .rules
                    .iter()
                    .find(|r| r.name() == step.action)
                    .unwrap();
                assert!(rule.check(&state), "{} not applicable", step.action);
                state = rule.effect(&state);
                assert_eq!(state, step.state);
            }
        }
        assert!(optimal.total_cost() <= fast.total_cost());
    }
}
