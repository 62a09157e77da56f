//! Successor generation for the implicit state graph.
//!
//! Nodes of the graph are [`State`]s and edges are rule applications. The
//! graph is never materialised; [`expand`] produces the outgoing edges of one
//! state on demand.

use crate::rule::{Rule, RuleSet};
use crate::state::State;
use std::iter::Enumerate;
use std::slice::Iter;

/// One outgoing edge: applying rule `rule` leads to `next` at `cost`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<'a> {
    /// Index of the rule inside its [`RuleSet`]
    pub rule: usize,
    pub action: &'a str,
    pub next: State,
    pub cost: f64,
}

/// Lazy iterator over the transitions out of one state, in rule order.
pub struct Transitions<'a, 's> {
    rules: Enumerate<Iter<'a, Rule>>,
    state: &'s State,
}

impl<'a> Iterator for Transitions<'a, '_> {
    type Item = Transition<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for (index, rule) in self.rules.by_ref() {
            if rule.check(self.state) {
                return Some(Transition {
                    rule: index,
                    action: rule.name(),
                    next: rule.effect(self.state),
                    cost: rule.cost(),
                });
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.rules.size_hint().1)
    }
}

/// Yields `(action, next_state, cost)` for every rule applicable in `state`.
///
/// `effect` is only evaluated for rules whose `check` held on the same state.
/// Calling `expand` again on the same inputs yields the same sequence.
pub fn expand<'a, 's>(rules: &'a RuleSet, state: &'s State) -> Transitions<'a, 's> {
    Transitions {
        rules: rules.iter().enumerate(),
        state,
    }
}

impl RuleSet {
    /// Shorthand for [`expand`].
    pub fn expand<'a, 's>(&'a self, state: &'s State) -> Transitions<'a, 's> {
        expand(self, state)
    }
}
