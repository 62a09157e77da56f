//! Plans a crafting goal loaded from a JSON recipe book.
//!
//! ```text
//! cargo run --example crafting -- [recipes.json] [plan.dot]
//! ```
//!
//! Set `RUST_LOG=debug` to see the search progress.

use craftplan::{
    AStarSearch, CraftingData, GoalDeficitHeuristic, PlanVisualizer, SearchConfig, SearchOutcome,
    ToolPruning,
};
use std::error::Error;
use std::time::Duration;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let recipes = args
        .next()
        .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/demos/crafting.json").to_string());
    let dot_path = args.next();

    let problem = CraftingData::from_path(&recipes)?.into_problem()?;
    println!("Initial inventory: {}", problem.initial.display(&problem.catalog));

    let heuristic = ToolPruning::new(
        GoalDeficitHeuristic::for_rules(&problem.rules),
        &problem.rules,
        &problem.initial,
    );
    let search = AStarSearch::with_heuristic(heuristic);
    let config = SearchConfig::new(Duration::from_secs(30));

    match problem.solve(&search, &config)? {
        SearchOutcome::Found { plan, stats } => {
            println!(
                "Found a plan with {} actions, total time {} ({} states expanded in {:?}):",
                plan.len(),
                plan.total_cost(),
                stats.expanded,
                stats.elapsed
            );
            print!("{}", plan.display(&problem.catalog));

            if let Some(path) = dot_path {
                PlanVisualizer::new().visualize_plan(
                    &problem.catalog,
                    &plan,
                    &problem.goal,
                    &path,
                )?;
                println!("Wrote {}", path);
            }
        }
        SearchOutcome::NoPlanFound { reason, stats } => {
            println!(
                "No plan found: {} ({} states expanded in {:?})",
                reason, stats.expanded, stats.elapsed
            );
        }
    }

    Ok(())
}
