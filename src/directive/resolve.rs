//! Resolve human task references to stable store IDs
//!
//! The model refers to tasks the way the user did: "elden ring", "the
//! rust book", occasionally a literal ID. Every such reference must be
//! pinned to exactly one snapshot ID before execution; guessing is the
//! one failure mode this engine exists to prevent, so anything ambiguous
//! or unmatched drops the whole directive instead.

use crate::core::error::{PilotError, Result};
use crate::directive::Directive;
use crate::ops::registry::{OperationDescriptor, ValueRole};
use crate::store::snapshot::TaskSnapshot;
use serde_json::Value;

/// Outcome of resolving one reference
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Exactly one task matched
    Id(String),
    /// Several titles matched; their IDs, in snapshot order
    Ambiguous(Vec<String>),
    /// Nothing matched
    NotFound,
}

/// Resolve a single reference against the snapshot
///
/// An exact ID match short-circuits title matching entirely, so a task
/// titled "42" can never shadow task ID 42. Otherwise the reference is a
/// case-insensitive substring match over titles.
pub fn resolve_reference(reference: &str, snapshot: &TaskSnapshot) -> Resolution {
    if snapshot.contains_id(reference) {
        return Resolution::Id(reference.to_string());
    }

    let needle = reference.to_lowercase();
    let matches: Vec<String> = snapshot
        .iter()
        .filter(|(_, record)| record.title.to_lowercase().contains(&needle))
        .map(|(id, _)| id.to_string())
        .collect();

    match matches.len() {
        0 => Resolution::NotFound,
        1 => Resolution::Id(matches.into_iter().next().expect("one match")),
        _ => Resolution::Ambiguous(matches),
    }
}

/// Rewrite every task-reference parameter of a directive to canonical IDs
///
/// All-or-nothing: if any reference is ambiguous or unmatched the whole
/// directive fails and nothing in it is executed. Partial resolution of
/// e.g. a removal list would mutate a different set of tasks than the
/// user asked for.
pub fn resolve_directive(
    directive: &mut Directive,
    descriptor: &OperationDescriptor,
    snapshot: &TaskSnapshot,
) -> Result<()> {
    for param in descriptor.params {
        let Some(value) = directive.parameters.get_mut(param.name) else {
            continue;
        };
        match param.role {
            ValueRole::Plain => {}
            ValueRole::TaskRef => {
                if let Value::String(reference) = value {
                    *reference = resolve_one(reference, snapshot)?;
                }
            }
            ValueRole::TaskRefList => {
                // A lone string is treated as a one-element list
                let references: Vec<String> = match value {
                    Value::String(s) => vec![s.clone()],
                    Value::Array(items) => items
                        .iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect(),
                    _ => continue,
                };
                let mut resolved = Vec::with_capacity(references.len());
                for reference in &references {
                    resolved.push(Value::String(resolve_one(reference, snapshot)?));
                }
                *value = Value::Array(resolved);
            }
        }
    }
    Ok(())
}

fn resolve_one(reference: &str, snapshot: &TaskSnapshot) -> Result<String> {
    match resolve_reference(reference, snapshot) {
        Resolution::Id(id) => Ok(id),
        Resolution::Ambiguous(matches) => Err(PilotError::AmbiguousReference {
            reference: reference.to_string(),
            matches,
        }),
        Resolution::NotFound => Err(PilotError::UnresolvedReference(reference.to_string())),
    }
}
