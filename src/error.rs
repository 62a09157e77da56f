use crate::search::NoPlanReason;
use thiserror::Error;

/// Errors produced while building or running a crafting plan.
///
/// A rule that simply does not apply to a state is not an error; that is the
/// `false` branch of [`Rule::check`](crate::Rule::check).
#[derive(Error, Debug)]
pub enum PlanError {
    /// A rule description was rejected before search started
    #[error("Malformed rule '{rule}': {reason}")]
    MalformedRule { rule: String, reason: String },

    /// An inventory or goal refers to an item the catalog does not know
    #[error("Unknown item: {0}")]
    UnknownItem(String),

    /// An inventory or goal quantity is negative or too large
    #[error("Invalid quantity {quantity} for item '{item}'")]
    InvalidQuantity { item: String, quantity: i64 },

    /// The heuristic returned a value that breaks the frontier ordering
    #[error("Heuristic returned an invalid estimate: {value}")]
    DegenerateHeuristic { value: f64 },

    /// Search ended without reaching a goal state
    #[error("No valid plan found to achieve the goal ({0})")]
    NoPlanFound(NoPlanReason),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PlanError {
    pub(crate) fn malformed(rule: &str, reason: impl Into<String>) -> Self {
        PlanError::MalformedRule {
            rule: rule.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
