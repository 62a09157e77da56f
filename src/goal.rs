//! # Goal predicate
//!
//! A goal asks for *at least* a given quantity of every listed item. A state
//! that holds more, or holds items the goal never mentions, still satisfies
//! it: the test is containment, not equality.

use crate::item::{ItemCatalog, ItemId};
use crate::state::{checked_quantity, State};
use crate::Result;
use std::collections::BTreeMap;

/// Declarative goal: item name → minimum quantity.
pub type GoalSpec = BTreeMap<String, i64>;

/// A compiled, conjunctive goal test.
///
/// # Examples
///
/// ```
/// use craftplan::{Goal, ItemCatalog, State};
///
/// let catalog = ItemCatalog::new(["plank", "stick", "wood"]);
/// let goal = Goal::from_pairs(&catalog, [("plank", 1), ("stick", 1)]).unwrap();
///
/// let partial = State::from_quantities(&catalog, [("plank", 4)]).unwrap();
/// assert!(!goal.is_goal(&partial));
///
/// let done = State::from_quantities(&catalog, [("plank", 4), ("stick", 2), ("wood", 1)]).unwrap();
/// assert!(goal.is_goal(&done));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Goal {
    targets: Vec<(ItemId, u32)>,
}

impl Goal {
    /// Compiles a goal mapping against `catalog`.
    pub fn compile(spec: &GoalSpec, catalog: &ItemCatalog) -> Result<Self> {
        Self::from_pairs(catalog, spec.iter().map(|(item, &qty)| (item.as_str(), qty)))
    }

    /// Compiles `(item, minimum)` pairs. Zero minimums are always met and
    /// are dropped.
    pub fn from_pairs<I, S>(catalog: &ItemCatalog, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        let mut targets: Vec<(ItemId, u32)> = Vec::new();
        for (name, quantity) in pairs {
            let name = name.as_ref();
            let id = catalog.resolve(name)?;
            let minimum = checked_quantity(name, quantity)?;
            targets.retain(|&(item, _)| item != id);
            if minimum > 0 {
                targets.push((id, minimum));
            }
        }
        targets.sort_unstable();
        Ok(Self { targets })
    }

    /// True iff the state holds at least the required amount of every goal
    /// item. Pure function of `state`.
    pub fn is_goal(&self, state: &State) -> bool {
        self.targets
            .iter()
            .all(|&(item, minimum)| state.get(item) >= minimum)
    }

    /// Number of goal entries the state does not yet meet.
    pub fn unmet(&self, state: &State) -> usize {
        self.targets
            .iter()
            .filter(|&&(item, minimum)| state.get(item) < minimum)
            .count()
    }

    /// Total number of units still missing across all goal entries.
    pub fn deficit(&self, state: &State) -> u64 {
        self.targets
            .iter()
            .map(|&(item, minimum)| u64::from(minimum.saturating_sub(state.get(item))))
            .sum()
    }

    /// Minimum quantity asked for `item` (0 when the goal does not list it).
    pub fn minimum(&self, item: ItemId) -> u32 {
        self.targets
            .iter()
            .find(|&&(target, _)| target == item)
            .map_or(0, |&(_, minimum)| minimum)
    }

    pub fn targets(&self) -> &[(ItemId, u32)] {
        &self.targets
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
