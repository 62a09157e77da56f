use crate::goal::Goal;
use crate::item::ItemCatalog;
use crate::path::Plan;
use crate::state::State;
use crate::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// A visualizer for crafting plans that generates Graphviz DOT files
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanVisualizer;

impl PlanVisualizer {
    /// Create a new plan visualizer
    pub fn new() -> Self {
        Self
    }

    /// Write a DOT digraph of `plan`: one node per visited state, one edge
    /// per action, and a final edge into the goal.
    pub fn write_dot<W: Write>(
        &self,
        out: &mut W,
        catalog: &ItemCatalog,
        plan: &Plan,
        goal: &Goal,
    ) -> Result<()> {
        writeln!(out, "digraph Plan {{")?;
        writeln!(out, "    rankdir=LR;")?;
        writeln!(out, "    node [shape=box, style=filled, fillcolor=lightblue];")?;
        writeln!(out, "    edge [fontsize=10];")?;

        for (i, step) in plan.steps().iter().enumerate() {
            let fill = if i == 0 { ", fillcolor=lightgreen" } else { "" };
            writeln!(
                out,
                "    state_{} [label=\"{}\"{}];",
                i,
                Self::state_label(catalog, &step.state),
                fill
            )?;
        }

        writeln!(
            out,
            "    goal [label=\"Goal\\n{}\", fillcolor=lightpink];",
            Self::goal_label(catalog, goal)
        )?;

        for (i, window) in plan.steps().windows(2).enumerate() {
            let step = &window[1];
            writeln!(
                out,
                "    state_{} -> state_{} [label=\"{}\\ncost {}\"];",
                i,
                i + 1,
                Self::escape(&step.action),
                step.cost
            )?;
        }

        if let Some(last) = plan.steps().len().checked_sub(1) {
            writeln!(
                out,
                "    state_{} -> goal [style=dashed, label=\"satisfies\"];",
                last
            )?;
        }

        writeln!(out, "}}")?;
        Ok(())
    }

    /// Write the DOT digraph of `plan` to `path`.
    pub fn visualize_plan(
        &self,
        catalog: &ItemCatalog,
        plan: &Plan,
        goal: &Goal,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        self.write_dot(&mut file, catalog, plan, goal)?;
        file.flush()?;
        Ok(())
    }

    fn state_label(catalog: &ItemCatalog, state: &State) -> String {
        let lines: Vec<_> = state
            .iter()
            .map(|(item, quantity)| format!("{}: {}", Self::escape(catalog.name(item)), quantity))
            .collect();
        if lines.is_empty() {
            "(empty)".to_string()
        } else {
            lines.join("\\n")
        }
    }

    fn goal_label(catalog: &ItemCatalog, goal: &Goal) -> String {
        goal.targets()
            .iter()
            .map(|&(item, minimum)| format!("{} >= {}", Self::escape(catalog.name(item)), minimum))
            .collect::<Vec<_>>()
            .join("\\n")
    }

    fn escape(text: &str) -> String {
        text.replace('\\', "\\\\").replace('"', "\\\"")
    }
}
