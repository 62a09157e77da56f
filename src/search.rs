use crate::goal::Goal;
use crate::graph::expand;
use crate::heuristic::{Heuristic, ZeroHeuristic};
use crate::path::{reconstruct, CostTable, NodeId, Plan, PredecessorMap, START_ACTION};
use crate::rule::RuleSet;
use crate::state::State;
use crate::{PlanError, Result};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;
use std::time::{Duration, Instant};

/// Limits applied to a single search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Wall-clock budget. Checked before every expansion.
    pub time_limit: Duration,
    /// Optional cap on the number of expanded states.
    pub max_expansions: Option<usize>,
}

impl SearchConfig {
    pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(5);

    pub fn new(time_limit: Duration) -> Self {
        Self {
            time_limit,
            max_expansions: None,
        }
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = Some(max_expansions);
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIME_LIMIT)
    }
}

/// Why a search ended without a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoPlanReason {
    /// Every reachable state was expanded
    Exhausted,
    /// The wall-clock budget ran out
    TimedOut,
    /// `max_expansions` states were expanded
    ExpansionLimit,
}

impl fmt::Display for NoPlanReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            NoPlanReason::Exhausted => "search space exhausted",
            NoPlanReason::TimedOut => "time limit reached",
            NoPlanReason::ExpansionLimit => "expansion limit reached",
        };
        f.write_str(text)
    }
}

/// Counters collected during one search run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStats {
    /// States popped from the frontier and expanded
    pub expanded: usize,
    /// Transitions produced by the expansions
    pub generated: usize,
    /// Distinct states recorded
    pub discovered: usize,
    /// Successors dropped because the heuristic marked them infeasible
    pub pruned: usize,
    pub elapsed: Duration,
}

/// What a search run produced.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    Found { plan: Plan, stats: SearchStats },
    NoPlanFound { reason: NoPlanReason, stats: SearchStats },
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }

    pub fn plan(&self) -> Option<&Plan> {
        match self {
            SearchOutcome::Found { plan, .. } => Some(plan),
            SearchOutcome::NoPlanFound { .. } => None,
        }
    }

    pub fn stats(&self) -> &SearchStats {
        match self {
            SearchOutcome::Found { stats, .. } | SearchOutcome::NoPlanFound { stats, .. } => stats,
        }
    }

    /// Converts a missing plan into [`PlanError::NoPlanFound`].
    pub fn into_result(self) -> Result<Plan> {
        match self {
            SearchOutcome::Found { plan, .. } => Ok(plan),
            SearchOutcome::NoPlanFound { reason, .. } => Err(PlanError::NoPlanFound(reason)),
        }
    }
}

/// Trait defining the interface for search algorithms used by the planner.
pub trait SearchAlgorithm: Send + Sync {
    /// Searches for the cheapest sequence of rules turning `initial` into a
    /// state that satisfies `goal`.
    ///
    /// Running out of states or time is reported through
    /// [`SearchOutcome::NoPlanFound`]. `Err` is reserved for contract
    /// violations such as [`PlanError::DegenerateHeuristic`].
    fn search(
        &self,
        rules: &RuleSet,
        initial: &State,
        goal: &Goal,
        config: &SearchConfig,
    ) -> Result<SearchOutcome>;
}

/// An entry of the frontier.
#[derive(Debug, Clone)]
struct FrontierEntry<'r> {
    priority: f64,
    /// Arrival order, breaks priority ties first-in first-out
    sequence: u64,
    action: &'r str,
    node: NodeId,
    /// Path cost at the time the entry was pushed
    cost: f64,
}

impl PartialEq for FrontierEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry<'_> {}

impl PartialOrd for FrontierEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

/// Manages the state of one graph search.
struct SearchContext<'r> {
    frontier: BinaryHeap<Reverse<FrontierEntry<'r>>>,
    predecessors: PredecessorMap<'r>,
    costs: CostTable,
    sequence: u64,
    stats: SearchStats,
}

impl<'r> SearchContext<'r> {
    fn new(initial: &State) -> Self {
        let (predecessors, start) = PredecessorMap::new(initial.clone());
        let mut costs = CostTable::new();
        costs.improve(start, 0.0);

        let mut context = Self {
            frontier: BinaryHeap::new(),
            predecessors,
            costs,
            sequence: 0,
            stats: SearchStats::default(),
        };
        context.push(0.0, START_ACTION, start, 0.0);
        context
    }

    fn push(&mut self, priority: f64, action: &'r str, node: NodeId, cost: f64) {
        self.frontier.push(Reverse(FrontierEntry {
            priority,
            sequence: self.sequence,
            action,
            node,
            cost,
        }));
        self.sequence += 1;
    }

    /// Pops the best entry that still reflects its node's cheapest cost.
    fn next_entry(&mut self) -> Option<FrontierEntry<'r>> {
        while let Some(Reverse(entry)) = self.frontier.pop() {
            let best = self.costs.get(entry.node).unwrap_or(f64::INFINITY);
            if entry.cost <= best {
                return Some(entry);
            }
        }
        None
    }

    /// True when `cost` is the first or a strictly cheaper way to reach
    /// `next`.
    fn improves(&self, next: &State, cost: f64) -> bool {
        match self.predecessors.find(next).and_then(|id| self.costs.get(id)) {
            Some(best) => cost < best,
            None => true,
        }
    }

    /// Records `next` as reached from `parent` at `cost`. A known state is
    /// only relinked when `cost` lowers its table entry. Returns the node
    /// when something changed.
    fn record(
        &mut self,
        next: State,
        action: &'r str,
        parent: NodeId,
        cost: f64,
    ) -> Option<NodeId> {
        if let Some(id) = self.predecessors.find(&next) {
            if !self.costs.improve(id, cost) {
                return None;
            }
            self.predecessors.set_predecessor(id, action, Some(parent));
            return Some(id);
        }
        let id = self.predecessors.record(next, action, parent);
        self.costs.improve(id, cost);
        Some(id)
    }

    fn close_stats(&mut self, started: Instant) {
        self.stats.discovered = self.predecessors.len();
        self.stats.elapsed = started.elapsed();
    }

    fn found(mut self, started: Instant, goal: NodeId) -> SearchOutcome {
        self.close_stats(started);
        let reconstruction = reconstruct(goal, &self.predecessors, &self.costs);
        SearchOutcome::Found {
            plan: reconstruction.plan,
            stats: self.stats,
        }
    }

    fn failed(mut self, started: Instant, reason: NoPlanReason) -> SearchOutcome {
        self.close_stats(started);
        SearchOutcome::NoPlanFound {
            reason,
            stats: self.stats,
        }
    }
}

/// Checks a heuristic value against the engine's contract.
fn evaluate(heuristic: &dyn Heuristic, state: &State, goal: &Goal) -> Result<f64> {
    let value = heuristic.estimate(state, goal);
    if value.is_nan() || value < 0.0 {
        return Err(PlanError::DegenerateHeuristic { value });
    }
    debug_assert_eq!(
        value.to_bits(),
        heuristic.estimate(state, goal).to_bits(),
        "heuristic returned different estimates for the same state"
    );
    Ok(value)
}

/// How [`explore`] stopped.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Stop {
    Goal(NodeId),
    Failed(NoPlanReason),
}

/// Best-first search from `initial` until a state satisfying `goal` is
/// popped, the frontier empties, or a budget in `config` runs out.
///
/// Successors are scored `cost so far + heuristic`; entries with equal score
/// are expanded in arrival order, so repeated runs give the same plan.
/// States the heuristic reports as infinitely far are dropped.
pub fn search(
    rules: &RuleSet,
    initial: &State,
    goal: &Goal,
    heuristic: &dyn Heuristic,
    config: &SearchConfig,
) -> Result<SearchOutcome> {
    let started = Instant::now();
    let mut context = SearchContext::new(initial);
    log::debug!(
        "Starting search over {} rules (time limit {:?})",
        rules.len(),
        config.time_limit
    );

    let stop = explore(&mut context, rules, goal, heuristic, config, started)?;
    Ok(match stop {
        Stop::Goal(node) => context.found(started, node),
        Stop::Failed(reason) => context.failed(started, reason),
    })
}

fn explore<'r>(
    context: &mut SearchContext<'r>,
    rules: &'r RuleSet,
    goal: &Goal,
    heuristic: &dyn Heuristic,
    config: &SearchConfig,
    started: Instant,
) -> Result<Stop> {
    loop {
        if started.elapsed() >= config.time_limit {
            log::warn!(
                "Search timed out after {:?} with {} states expanded",
                config.time_limit,
                context.stats.expanded
            );
            return Ok(Stop::Failed(NoPlanReason::TimedOut));
        }

        let Some(entry) = context.next_entry() else {
            log::debug!(
                "Search space exhausted after {} expansions",
                context.stats.expanded
            );
            return Ok(Stop::Failed(NoPlanReason::Exhausted));
        };

        let state = match context.predecessors.state(entry.node) {
            Some(state) => state.clone(),
            None => continue,
        };

        if goal.is_goal(&state) {
            log::info!(
                "Goal reached at cost {} after {} expansions",
                entry.cost,
                context.stats.expanded
            );
            return Ok(Stop::Goal(entry.node));
        }

        if let Some(limit) = config.max_expansions {
            if context.stats.expanded >= limit {
                log::warn!("Search stopped at the expansion limit of {}", limit);
                return Ok(Stop::Failed(NoPlanReason::ExpansionLimit));
            }
        }

        context.stats.expanded += 1;
        log::trace!(
            "Expanding node {} via '{}' (priority {}, cost {})",
            entry.node.index(),
            entry.action,
            entry.priority,
            entry.cost
        );

        for transition in expand(rules, &state) {
            context.stats.generated += 1;
            let new_cost = entry.cost + transition.cost;
            if !context.improves(&transition.next, new_cost) {
                continue;
            }
            let estimate = evaluate(heuristic, &transition.next, goal)?;
            if estimate.is_infinite() {
                context.stats.pruned += 1;
                continue;
            }
            let action = transition.action;
            if let Some(id) = context.record(transition.next, action, entry.node, new_cost) {
                context.push(new_cost + estimate, action, id, new_cost);
            }
        }
    }
}

/// A* search over the state graph.
///
/// Plans are cost-optimal when the heuristic never overestimates. With an
/// inadmissible heuristic the first goal reached is returned even if a
/// cheaper one exists.
pub struct AStarSearch {
    heuristic: Box<dyn Heuristic>,
}

impl AStarSearch {
    /// Creates a new A* search with the given heuristic.
    pub fn new(heuristic: Box<dyn Heuristic>) -> Self {
        Self { heuristic }
    }

    pub fn with_heuristic<H: Heuristic + 'static>(heuristic: H) -> Self {
        Self::new(Box::new(heuristic))
    }
}

impl Default for AStarSearch {
    fn default() -> Self {
        Self::with_heuristic(ZeroHeuristic)
    }
}

impl SearchAlgorithm for AStarSearch {
    fn search(
        &self,
        rules: &RuleSet,
        initial: &State,
        goal: &Goal,
        config: &SearchConfig,
    ) -> Result<SearchOutcome> {
        search(rules, initial, goal, self.heuristic.as_ref(), config)
    }
}

/// Dijkstra's algorithm (uniform-cost search).
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraSearch;

impl SearchAlgorithm for DijkstraSearch {
    fn search(
        &self,
        rules: &RuleSet,
        initial: &State,
        goal: &Goal,
        config: &SearchConfig,
    ) -> Result<SearchOutcome> {
        // Dijkstra is A* with a zero heuristic
        search(rules, initial, goal, &ZeroHeuristic, config)
    }
}
