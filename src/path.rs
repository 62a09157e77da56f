//! Bookkeeping for discovered states and turning it into a plan.
//!
//! Every state the search discovers gets a [`NodeId`] from the
//! [`PredecessorMap`], which also remembers the action and predecessor that
//! last improved it. The [`CostTable`] holds the best known cost for each
//! node. Once a goal node is reached, [`reconstruct`] walks the predecessor
//! links back to the start and returns the ordered [`Plan`].

use crate::item::ItemCatalog;
use crate::state::State;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Action recorded for the initial state.
pub const START_ACTION: &str = "start";

/// Index of a discovered state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Entry<'r> {
    state: Rc<State>,
    action: &'r str,
    parent: Option<NodeId>,
}

/// Maps each discovered state to the action and state that produced it.
///
/// Action names are borrowed from the rule set for the lifetime `'r`.
#[derive(Debug, Clone)]
pub struct PredecessorMap<'r> {
    entries: Vec<Entry<'r>>,
    index: HashMap<Rc<State>, NodeId>,
}

impl<'r> PredecessorMap<'r> {
    /// Creates a map holding only `initial`, recorded with [`START_ACTION`]
    /// and no predecessor.
    pub fn new(initial: State) -> (Self, NodeId) {
        let mut map = Self {
            entries: Vec::new(),
            index: HashMap::new(),
        };
        let start = map.insert(initial, START_ACTION, None);
        (map, start)
    }

    /// Node of an already discovered state.
    pub fn find(&self, state: &State) -> Option<NodeId> {
        self.index.get(state).copied()
    }

    /// Records that `state` was reached from `parent` through `action`.
    ///
    /// A new state gets a fresh node; a known one has its predecessor
    /// replaced. Returns the state's node.
    pub fn record(&mut self, state: State, action: &'r str, parent: NodeId) -> NodeId {
        match self.find(&state) {
            Some(id) => {
                self.set_predecessor(id, action, Some(parent));
                id
            }
            None => self.insert(state, action, Some(parent)),
        }
    }

    /// Overwrites the predecessor link of `id`.
    pub fn set_predecessor(&mut self, id: NodeId, action: &'r str, parent: Option<NodeId>) {
        if let Some(entry) = self.entries.get_mut(id.0) {
            entry.action = action;
            entry.parent = parent;
        }
    }

    pub fn state(&self, id: NodeId) -> Option<&State> {
        self.entries.get(id.0).map(|e| e.state.as_ref())
    }

    /// The `(action, predecessor)` pair recorded for `id`.
    pub fn predecessor(&self, id: NodeId) -> Option<(&'r str, Option<NodeId>)> {
        self.entries.get(id.0).map(|e| (e.action, e.parent))
    }

    /// Number of distinct states discovered.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, state: State, action: &'r str, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.entries.len());
        let state = Rc::new(state);
        self.index.insert(Rc::clone(&state), id);
        self.entries.push(Entry {
            state,
            action,
            parent,
        });
        id
    }
}

/// Best known cumulative cost per discovered node.
#[derive(Debug, Clone, Default)]
pub struct CostTable {
    costs: Vec<f64>,
    #[cfg(test)]
    writes: Vec<(NodeId, f64)>,
}

impl CostTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: NodeId) -> Option<f64> {
        self.costs.get(id.0).copied().filter(|c| c.is_finite())
    }

    /// Lowers the cost of `id` to `cost` if that is an improvement, or sets
    /// it if `id` has no cost yet. Returns whether the table changed.
    pub fn improve(&mut self, id: NodeId, cost: f64) -> bool {
        if id.0 >= self.costs.len() {
            self.costs.resize(id.0 + 1, f64::INFINITY);
        }
        let slot = &mut self.costs[id.0];
        if cost < *slot {
            *slot = cost;
            #[cfg(test)]
            self.writes.push((id, cost));
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.costs.iter().filter(|c| c.is_finite()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every accepted `(node, cost)` write, in order.
    #[cfg(test)]
    pub(crate) fn writes(&self) -> &[(NodeId, f64)] {
        &self.writes
    }
}

/// One step of a plan: the action taken and the state it led to.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanStep {
    pub action: String,
    pub state: State,
    /// Cumulative cost after this step
    pub cost: f64,
}

/// An ordered sequence of steps from the initial state to a goal state.
///
/// The first step is the initial state under [`START_ACTION`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Plan {
    steps: Vec<PlanStep>,
}

impl Plan {
    pub fn new(steps: Vec<PlanStep>) -> Self {
        Self { steps }
    }

    /// All steps, including the initial one.
    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    /// Names of the applied actions, without the start sentinel.
    pub fn actions(&self) -> Vec<&str> {
        self.applied().map(|s| s.action.as_str()).collect()
    }

    /// Number of applied actions.
    pub fn len(&self) -> usize {
        self.applied().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_cost(&self) -> f64 {
        self.steps.last().map_or(0.0, |s| s.cost)
    }

    pub fn initial_state(&self) -> Option<&State> {
        self.steps.first().map(|s| &s.state)
    }

    pub fn final_state(&self) -> Option<&State> {
        self.steps.last().map(|s| &s.state)
    }

    /// Renders the plan one step per line with item names.
    pub fn display<'a>(&'a self, catalog: &'a ItemCatalog) -> PlanDisplay<'a> {
        PlanDisplay {
            plan: self,
            catalog,
        }
    }

    fn applied(&self) -> impl Iterator<Item = &PlanStep> + '_ {
        let skip = match self.steps.first() {
            Some(step) if step.action == START_ACTION => 1,
            _ => 0,
        };
        self.steps.iter().skip(skip)
    }
}

/// [`Display`](fmt::Display) adapter returned by [`Plan::display`].
pub struct PlanDisplay<'a> {
    plan: &'a Plan,
    catalog: &'a ItemCatalog,
}

impl fmt::Display for PlanDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.plan.steps.iter().enumerate() {
            writeln!(
                f,
                "{:>3}. {} [cost {}] -> {}",
                i,
                step.action,
                step.cost,
                step.state.display(self.catalog)
            )?;
        }
        Ok(())
    }
}

/// Result of walking the predecessor links.
#[derive(Debug, Clone)]
pub struct Reconstruction {
    pub plan: Plan,
    /// False when the walk was cut short before reaching the start entry
    pub complete: bool,
}

/// Walks `predecessors` back from `goal` and returns the plan in forward
/// order.
///
/// The walk visits at most `predecessors.len()` entries, so a corrupted map
/// with a cycle still terminates; the path collected so far is returned with
/// `complete` unset.
pub fn reconstruct(
    goal: NodeId,
    predecessors: &PredecessorMap<'_>,
    costs: &CostTable,
) -> Reconstruction {
    let bound = predecessors.len();
    let mut steps = Vec::new();
    let mut current = Some(goal);
    let mut complete = false;

    while let Some(id) = current {
        if steps.len() >= bound {
            break;
        }
        let (Some(state), Some((action, parent))) =
            (predecessors.state(id), predecessors.predecessor(id))
        else {
            break;
        };
        steps.push(PlanStep {
            action: action.to_string(),
            state: state.clone(),
            cost: costs.get(id).unwrap_or(0.0),
        });
        if parent.is_none() {
            complete = action == START_ACTION;
        }
        current = parent;
    }

    if !complete {
        log::warn!(
            "Path reconstruction stopped after {} of at most {} steps without reaching the start",
            steps.len(),
            bound
        );
    }
    steps.reverse();
    Reconstruction {
        plan: Plan::new(steps),
        complete,
    }
}
