//! Top-level meta document: an ordered list of rules.

use serde::{Deserialize, Serialize};

use crate::{Condition, MetaAction};

/// One `(condition, action, state)` rule.
///
/// `state` is a free-form label; rules sharing a state form a group but no
/// uniqueness is enforced anywhere in the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub condition: Condition,
    pub action: MetaAction,
    pub state: String,
}

/// A whole meta document. Rule order is meaningful: it is the evaluation
/// order within a state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Meta {
    pub rules: Vec<Rule>,
}

impl Meta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distinct state names in first-appearance order.
    pub fn state_names(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for rule in &self.rules {
            if !seen.contains(&rule.state.as_str()) {
                seen.push(rule.state.as_str());
            }
        }
        seen
    }
}
