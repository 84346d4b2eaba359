//! Directive pipeline: model output to executable operations
//!
//! Raw completion text flows through the stages in order:
//! extract -> normalize -> reconcile -> resolve
//! Each stage either repairs the directive or drops it; only the first two
//! stages can fail the whole turn.

pub mod extract;
pub mod normalize;
pub mod reconcile;
pub mod resolve;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One requested action, as emitted by the model
///
/// The operation name and parameter keys are untrusted until the
/// reconciler has mapped them onto a registry descriptor; task-reference
/// values are untrusted until the resolver has rewritten them to IDs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Directive {
    /// Operation name; matches a registry key only after reconciliation
    pub operation: String,
    /// Parameter name -> value, canonical names only after reconciliation
    #[serde(default)]
    pub parameters: BTreeMap<String, serde_json::Value>,
    /// The model's stated reason for this action, kept for the audit log
    #[serde(default)]
    pub rationale: String,
    /// Explicit confirmation request from the model; `None` falls back to
    /// the descriptor's destructive flag
    #[serde(default)]
    pub needs_confirmation: Option<bool>,
}

impl Directive {
    /// Whether this directive must pass the confirmation gate
    pub fn requires_confirmation(&self, destructive_default: bool) -> bool {
        self.needs_confirmation.unwrap_or(destructive_default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_defaults_from_destructive_flag() {
        let mut directive = Directive {
            operation: "rm".into(),
            parameters: BTreeMap::new(),
            rationale: String::new(),
            needs_confirmation: None,
        };
        assert!(directive.requires_confirmation(true));
        assert!(!directive.requires_confirmation(false));

        directive.needs_confirmation = Some(false);
        assert!(!directive.requires_confirmation(true));
    }
}
