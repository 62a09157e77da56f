mod catalog;
mod error;
mod goal;
mod graph;
mod heuristic;
mod item;
mod path;
mod planner;
mod rule;
mod search;
mod state;
mod visualizer;

pub use catalog::{CraftingData, RecipeData};
pub use error::{PlanError, Result};
pub use goal::{Goal, GoalSpec};
pub use graph::{expand, Transition, Transitions};
pub use heuristic::{GoalDeficitHeuristic, Heuristic, ToolPruning, ZeroHeuristic, INFEASIBLE};
pub use item::{ItemCatalog, ItemId};
pub use path::{
    reconstruct, CostTable, NodeId, Plan, PlanDisplay, PlanStep, PredecessorMap, Reconstruction,
    START_ACTION,
};
pub use planner::{Planner, Problem};
pub use rule::{Rule, RuleSet, RuleSpec};
pub use search::{
    search, AStarSearch, DijkstraSearch, NoPlanReason, SearchAlgorithm, SearchConfig,
    SearchOutcome, SearchStats,
};
pub use state::{State, StateDisplay};
pub use visualizer::PlanVisualizer;
