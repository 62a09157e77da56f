//! # Item catalog
//!
//! Every item a plan can talk about is registered once in an [`ItemCatalog`].
//! The catalog hands out dense [`ItemId`]s, which is what states and compiled
//! rules store instead of strings. Catalog order is also the order in which
//! inventories are displayed.

use crate::{PlanError, Result};
use std::collections::HashMap;
use std::fmt;

/// Dense index of an item inside its [`ItemCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub(crate) usize);

impl ItemId {
    /// Position of the item in the catalog.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The ordered set of item identifiers known to a planning problem.
///
/// # Examples
///
/// ```
/// use craftplan::ItemCatalog;
///
/// let catalog = ItemCatalog::new(["wood", "plank", "wood"]);
/// assert_eq!(catalog.len(), 2);
/// assert_eq!(catalog.name(catalog.id("plank").unwrap()), "plank");
/// assert!(catalog.id("diamond").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    names: Vec<String>,
    ids: HashMap<String, ItemId>,
}

impl ItemCatalog {
    /// Builds a catalog from item names. Repeated names are registered once.
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut catalog = Self::default();
        for item in items {
            catalog.insert(item);
        }
        catalog
    }

    /// Registers an item, returning its id. Existing items keep their id.
    pub fn insert(&mut self, name: impl Into<String>) -> ItemId {
        let name = name.into();
        if let Some(&id) = self.ids.get(&name) {
            return id;
        }
        let id = ItemId(self.names.len());
        self.ids.insert(name.clone(), id);
        self.names.push(name);
        id
    }

    pub fn id(&self, name: &str) -> Option<ItemId> {
        self.ids.get(name).copied()
    }

    /// Like [`id`](Self::id) but reports unknown names as an error.
    pub fn resolve(&self, name: &str) -> Result<ItemId> {
        self.id(name)
            .ok_or_else(|| PlanError::UnknownItem(name.to_string()))
    }

    /// Name of an item.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different catalog with more items.
    pub fn name(&self, id: ItemId) -> &str {
        &self.names[id.0]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over `(id, name)` pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (ItemId(i), name.as_str()))
    }
}
