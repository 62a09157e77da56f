//! # World state
//!
//! A [`State`] is an inventory snapshot: one non-negative quantity per item of
//! an [`ItemCatalog`]. States are plain values. Nothing in the crate mutates a
//! state after it has been handed to the search; every rule application
//! builds a fresh one, so a state can safely sit in the frontier, the cost
//! table and the predecessor map at the same time.
//!
//! ```
//! use craftplan::{ItemCatalog, State};
//!
//! let catalog = ItemCatalog::new(["wood", "plank"]);
//! let state = State::from_quantities(&catalog, [("wood", 2)]).unwrap();
//!
//! let wood = catalog.id("wood").unwrap();
//! let plank = catalog.id("plank").unwrap();
//! assert_eq!(state.get(wood), 2);
//! assert_eq!(state.get(plank), 0);
//!
//! // Unset items count as zero, so these are the same state.
//! let explicit = State::from_quantities(&catalog, [("wood", 2), ("plank", 0)]).unwrap();
//! assert_eq!(state, explicit);
//! assert_eq!(state.display(&catalog).to_string(), "{wood: 2}");
//! ```

use crate::item::{ItemCatalog, ItemId};
use crate::{PlanError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An inventory of item quantities, usable as a hash or tree key.
///
/// Equality, hashing and ordering only look at quantities, with items past
/// the end of the stored vector counting as 0. A state built before its
/// catalog grew therefore equals the same inventory built afterwards.
#[derive(Debug, Clone)]
pub struct State {
    quantities: Box<[u32]>,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.significant() == other.significant()
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        self.significant().hash(hasher);
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        self.significant().cmp(other.significant())
    }
}

impl State {
    /// An inventory holding nothing.
    pub fn empty(catalog: &ItemCatalog) -> Self {
        Self {
            quantities: vec![0; catalog.len()].into_boxed_slice(),
        }
    }

    /// Builds a state from `(item, quantity)` pairs. Items not listed are 0.
    ///
    /// Unknown items and negative or oversized quantities are rejected.
    pub fn from_quantities<I, S>(catalog: &ItemCatalog, quantities: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        let mut values = vec![0u32; catalog.len()];
        for (name, quantity) in quantities {
            let name = name.as_ref();
            let id = catalog.resolve(name)?;
            values[id.index()] = checked_quantity(name, quantity)?;
        }
        Ok(Self {
            quantities: values.into_boxed_slice(),
        })
    }

    /// Quantity held of `item`; items outside the state count as 0.
    pub fn get(&self, item: ItemId) -> u32 {
        self.quantities.get(item.index()).copied().unwrap_or(0)
    }

    /// Looks an item up by name.
    pub fn get_named(&self, catalog: &ItemCatalog, name: &str) -> Option<u32> {
        catalog.id(name).map(|id| self.get(id))
    }

    /// Returns a copy of this state with `item` set to `quantity`.
    pub fn with(&self, item: ItemId, quantity: u32) -> Self {
        let mut next = self.clone();
        next.put(item, quantity);
        next
    }

    /// Non-zero entries in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, u32)> + '_ {
        self.quantities
            .iter()
            .enumerate()
            .filter(|(_, q)| **q > 0)
            .map(|(i, &q)| (ItemId(i), q))
    }

    /// Total number of units across all items.
    pub fn total_units(&self) -> u64 {
        self.quantities.iter().map(|&q| u64::from(q)).sum()
    }

    /// Renders the state with item names, omitting zero quantities.
    pub fn display<'a>(&'a self, catalog: &'a ItemCatalog) -> StateDisplay<'a> {
        StateDisplay {
            state: self,
            catalog,
        }
    }

    /// Quantities without trailing zeros.
    fn significant(&self) -> &[u32] {
        let len = self
            .quantities
            .iter()
            .rposition(|&q| q > 0)
            .map_or(0, |last| last + 1);
        &self.quantities[..len]
    }

    /// Writes a quantity in place. Only used on states the caller exclusively
    /// owns and has not yet published to the search.
    pub(crate) fn put(&mut self, item: ItemId, quantity: u32) {
        if item.index() >= self.quantities.len() {
            let mut grown = self.quantities.to_vec();
            grown.resize(item.index() + 1, 0);
            self.quantities = grown.into_boxed_slice();
        }
        self.quantities[item.index()] = quantity;
    }
}

pub(crate) fn checked_quantity(item: &str, quantity: i64) -> Result<u32> {
    u32::try_from(quantity).map_err(|_| PlanError::InvalidQuantity {
        item: item.to_string(),
        quantity,
    })
}

/// [`Display`](fmt::Display) adapter returned by [`State::display`].
pub struct StateDisplay<'a> {
    state: &'a State,
    catalog: &'a ItemCatalog,
}

impl fmt::Display for StateDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for (item, quantity) in self.state.iter() {
            if !first {
                write!(f, ", ")?;
            }
            let name = if item.index() < self.catalog.len() {
                self.catalog.name(item)
            } else {
                "?"
            };
            write!(f, "{}: {}", name, quantity)?;
            first = false;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn catalog() -> ItemCatalog {
        ItemCatalog::new(["wood", "plank", "stick"])
    }

    #[test]
    fn test_empty_state_holds_nothing() {
        let catalog = catalog();
        let state = State::empty(&catalog);
        assert_eq!(state.iter().count(), 0);
        assert_eq!(state.total_units(), 0);
        assert_eq!(state.display(&catalog).to_string(), "{}");
    }

    #[test]
    fn test_from_quantities_rejects_bad_input() {
        let catalog = catalog();
        assert!(matches!(
            State::from_quantities(&catalog, [("ore", 1)]),
            Err(PlanError::UnknownItem(_))
        ));
        assert!(matches!(
            State::from_quantities(&catalog, [("wood", -3)]),
            Err(PlanError::InvalidQuantity { quantity: -3, .. })
        ));
        assert!(State::from_quantities(&catalog, [("wood", i64::from(u32::MAX) + 1)]).is_err());
    }

    #[test]
    fn test_with_leaves_original_untouched() {
        let catalog = catalog();
        let wood = catalog.id("wood").unwrap();
        let original = State::from_quantities(&catalog, [("wood", 1)]).unwrap();
        let changed = original.with(wood, 5);
        assert_eq!(original.get(wood), 1);
        assert_eq!(changed.get(wood), 5);
        assert_ne!(original, changed);
    }

    #[test]
    fn test_equal_states_hash_equal() {
        let catalog = catalog();
        let a = State::from_quantities(&catalog, [("plank", 4), ("wood", 0)]).unwrap();
        let b = State::from_quantities(&catalog, [("plank", 4)]).unwrap();
        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_state_built_before_catalog_grew() {
        let mut catalog = ItemCatalog::new(["wood"]);
        let before = State::from_quantities(&catalog, [("wood", 1)]).unwrap();
        let plank = catalog.insert("plank");

        // Making a plank and using it up again pads the vector with a zero.
        let round_trip = before.with(plank, 1).with(plank, 0);
        assert_eq!(round_trip, before);
        assert_eq!(round_trip.cmp(&before), Ordering::Equal);

        let mut set = HashSet::new();
        set.insert(before.clone());
        assert!(set.contains(&round_trip));

        let after = State::from_quantities(&catalog, [("wood", 1)]).unwrap();
        assert_eq!(after, before);
        assert!(before < before.with(plank, 1));
    }

    #[test]
    fn test_display_uses_catalog_order() {
        let catalog = catalog();
        let state = State::from_quantities(&catalog, [("stick", 2), ("wood", 1)]).unwrap();
        assert_eq!(state.display(&catalog).to_string(), "{wood: 1, stick: 2}");
        assert_eq!(state.get_named(&catalog, "stick"), Some(2));
        assert_eq!(state.get_named(&catalog, "ore"), None);
    }
}
