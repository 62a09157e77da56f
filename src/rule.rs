//! # Rules (recipes)
//!
//! A [`RuleSpec`] is the declarative description of a recipe: items it needs
//! on hand, items it uses up, items it makes and what it costs. Compiling a
//! spec against an [`ItemCatalog`] validates it and yields a [`Rule`], which
//! exposes the two operations the search needs:
//!
//! * [`Rule::check`] decides whether the rule can fire in a state
//! * [`Rule::effect`] builds the state that results from firing it
//!
//! ```
//! use craftplan::{ItemCatalog, Rule, RuleSpec, State};
//!
//! let catalog = ItemCatalog::new(["bench", "wood", "plank", "stick"]);
//! let spec = RuleSpec::new("craft stick at bench", 1.0)
//!     .requires("bench")
//!     .consumes("plank", 2)
//!     .produces("stick", 4);
//! let rule = Rule::compile(&spec, &catalog).unwrap();
//!
//! let state = State::from_quantities(&catalog, [("bench", 1), ("plank", 2)]).unwrap();
//! assert!(rule.check(&state));
//!
//! let next = rule.effect(&state);
//! assert_eq!(next.display(&catalog).to_string(), "{bench: 1, stick: 4}");
//! // The input state is untouched.
//! assert_eq!(state.display(&catalog).to_string(), "{bench: 1, plank: 2}");
//! ```

use crate::item::{ItemCatalog, ItemId};
use crate::state::State;
use crate::{PlanError, Result};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

/// Declarative description of a recipe, before validation.
///
/// Quantities are signed so that bad input can be represented and rejected
/// by [`Rule::compile`] rather than silently wrapped.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSpec {
    pub name: String,
    pub requires: BTreeSet<String>,
    pub consumes: BTreeMap<String, i64>,
    pub produces: BTreeMap<String, i64>,
    pub cost: f64,
}

impl RuleSpec {
    pub fn new(name: impl Into<String>, cost: f64) -> Self {
        Self {
            name: name.into(),
            requires: BTreeSet::new(),
            consumes: BTreeMap::new(),
            produces: BTreeMap::new(),
            cost,
        }
    }

    /// Adds an item that must be held (in any non-zero amount) but is kept.
    pub fn requires(mut self, item: impl Into<String>) -> Self {
        self.requires.insert(item.into());
        self
    }

    /// Adds an item that is used up by the rule.
    pub fn consumes(mut self, item: impl Into<String>, quantity: i64) -> Self {
        self.consumes.insert(item.into(), quantity);
        self
    }

    /// Adds an item that the rule makes.
    pub fn produces(mut self, item: impl Into<String>, quantity: i64) -> Self {
        self.produces.insert(item.into(), quantity);
        self
    }
}

/// A validated, immutable rule bound to a catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    name: String,
    requires: Vec<ItemId>,
    consumes: Vec<(ItemId, u32)>,
    produces: Vec<(ItemId, u32)>,
    cost: f64,
}

impl Rule {
    /// Validates `spec` against `catalog`.
    ///
    /// Fails with [`PlanError::MalformedRule`] when the name is empty, the
    /// cost is negative or not finite, a quantity is negative or does not fit
    /// a `u32`, or an item is not in the catalog.
    pub fn compile(spec: &RuleSpec, catalog: &ItemCatalog) -> Result<Self> {
        let name = spec.name.as_str();
        if name.trim().is_empty() {
            return Err(PlanError::malformed(name, "rule name is empty"));
        }
        if !spec.cost.is_finite() || spec.cost < 0.0 {
            return Err(PlanError::malformed(
                name,
                format!("cost must be a finite non-negative number, got {}", spec.cost),
            ));
        }

        let lookup = |item: &str| {
            catalog
                .id(item)
                .ok_or_else(|| PlanError::malformed(name, format!("unknown item '{}'", item)))
        };
        let amounts = |entries: &BTreeMap<String, i64>, verb: &str| -> Result<Vec<(ItemId, u32)>> {
            let mut resolved = Vec::with_capacity(entries.len());
            for (item, &quantity) in entries {
                let id = lookup(item.as_str())?;
                let amount = u32::try_from(quantity).map_err(|_| {
                    PlanError::malformed(
                        name,
                        format!("{} quantity {} for '{}' is out of range", verb, quantity, item),
                    )
                })?;
                if amount > 0 {
                    resolved.push((id, amount));
                }
            }
            Ok(resolved)
        };

        let requires = spec
            .requires
            .iter()
            .map(|item| lookup(item.as_str()))
            .collect::<Result<Vec<_>>>()?;
        let consumes = amounts(&spec.consumes, "consumed")?;
        let produces = amounts(&spec.produces, "produced")?;

        Ok(Self {
            name: spec.name.clone(),
            requires,
            consumes,
            produces,
            cost: spec.cost,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn required_items(&self) -> &[ItemId] {
        &self.requires
    }

    pub fn consumed_items(&self) -> &[(ItemId, u32)] {
        &self.consumes
    }

    pub fn produced_items(&self) -> &[(ItemId, u32)] {
        &self.produces
    }

    /// True iff every required item is held and every consumed item is held
    /// in at least the consumed amount.
    ///
    /// A rule whose output would overflow an item's counter is also reported
    /// as not applicable, so [`effect`](Self::effect) never has to saturate.
    pub fn check(&self, state: &State) -> bool {
        self.requires.iter().all(|&item| state.get(item) > 0)
            && self
                .consumes
                .iter()
                .all(|&(item, amount)| state.get(item) >= amount)
            && self
                .produces
                .iter()
                .all(|&(item, amount)| state.get(item).checked_add(amount).is_some())
    }

    /// Returns the state after applying this rule to `state`.
    ///
    /// Callers must only pass states for which [`check`](Self::check) holds.
    /// The input is never modified.
    pub fn effect(&self, state: &State) -> State {
        let mut next = state.clone();
        for &(item, amount) in &self.consumes {
            debug_assert!(next.get(item) >= amount, "effect applied without check");
            next.put(item, next.get(item).saturating_sub(amount));
        }
        for &(item, amount) in &self.produces {
            next.put(item, next.get(item).saturating_add(amount));
        }
        next
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (cost {})", self.name, self.cost)
    }
}

/// An ordered collection of compiled rules.
///
/// The order rules were compiled in is the order the search tries them.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Compiles every spec in order. Duplicate rule names are rejected.
    pub fn compile<'a, I>(specs: I, catalog: &ItemCatalog) -> Result<Self>
    where
        I: IntoIterator<Item = &'a RuleSpec>,
    {
        let mut rules = Vec::new();
        let mut seen = HashSet::new();
        for spec in specs {
            if !seen.insert(spec.name.clone()) {
                return Err(PlanError::malformed(&spec.name, "duplicate rule name"));
            }
            rules.push(Rule::compile(spec, catalog)?);
        }
        log::debug!("Compiled {} rules over {} items", rules.len(), catalog.len());
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Cost of the cheapest rule, or `None` for an empty set.
    pub fn min_cost(&self) -> Option<f64> {
        self.rules.iter().map(Rule::cost).reduce(f64::min)
    }

    /// Items that some rule requires and no rule consumes.
    ///
    /// Holding more than one of these never enables anything new.
    pub fn tools(&self) -> BTreeSet<ItemId> {
        let consumed: HashSet<ItemId> = self
            .rules
            .iter()
            .flat_map(|r| r.consumes.iter().map(|&(item, _)| item))
            .collect();
        self.rules
            .iter()
            .flat_map(|r| r.requires.iter().copied())
            .filter(|item| !consumed.contains(item))
            .collect()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
