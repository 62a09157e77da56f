//! Loading crafting problems from JSON.
//!
//! The expected layout is:
//!
//! ```json
//! {
//!   "Items": ["bench", "plank", "wood"],
//!   "Initial": {"wood": 1},
//!   "Goal": {"plank": 4},
//!   "Recipes": {
//!     "craft plank": {"Consumes": {"wood": 1}, "Produces": {"plank": 4}, "Time": 1},
//!     "craft bench": {"Requires": {"plank": true}, "Produces": {"bench": 1}, "Time": 1}
//!   }
//! }
//! ```
//!
//! Recipes keep the order they have in the file, which is the order the
//! search tries them in. `Requires` entries set to `false` are ignored.

use crate::goal::GoalSpec;
use crate::item::ItemCatalog;
use crate::planner::Problem;
use crate::rule::RuleSpec;
use crate::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// One recipe as written in the JSON file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecipeData {
    #[serde(default)]
    pub requires: BTreeMap<String, bool>,
    #[serde(default)]
    pub consumes: BTreeMap<String, i64>,
    #[serde(default)]
    pub produces: BTreeMap<String, i64>,
    pub time: f64,
}

impl RecipeData {
    fn into_rule_spec(self, name: &str) -> RuleSpec {
        RuleSpec {
            name: name.to_string(),
            requires: self
                .requires
                .into_iter()
                .filter_map(|(item, needed)| needed.then_some(item))
                .collect(),
            consumes: self.consumes,
            produces: self.produces,
            cost: self.time,
        }
    }
}

/// Top-level crafting file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CraftingData {
    pub items: Vec<String>,
    #[serde(default)]
    pub initial: BTreeMap<String, i64>,
    #[serde(default)]
    pub goal: GoalSpec,
    /// Raw recipe table, kept as a JSON map so file order survives.
    #[serde(default)]
    pub recipes: serde_json::Map<String, serde_json::Value>,
}

impl CraftingData {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    /// Recipes as rule specs, in file order.
    pub fn rule_specs(&self) -> Result<Vec<RuleSpec>> {
        self.recipes
            .iter()
            .map(|(name, value)| -> Result<RuleSpec> {
                let recipe: RecipeData = serde_json::from_value(value.clone())?;
                Ok(recipe.into_rule_spec(name))
            })
            .collect()
    }

    pub fn item_catalog(&self) -> ItemCatalog {
        ItemCatalog::new(self.items.iter().cloned())
    }

    /// Validates everything and compiles it into a [`Problem`].
    pub fn into_problem(self) -> Result<Problem> {
        let specs = self.rule_specs()?;
        let catalog = self.item_catalog();
        log::debug!(
            "Loaded {} items and {} recipes",
            catalog.len(),
            specs.len()
        );
        Problem::build(catalog, self.initial, &self.goal, &specs)
    }
}
