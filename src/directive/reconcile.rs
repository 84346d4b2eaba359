//! Map model-supplied parameter names onto canonical registry names
//!
//! The model frequently abbreviates or misspells parameter names (`ctx`
//! for `context`, `dedline` for `deadline`). Instead of a lookup table of
//! known typos, every supplied name is scored against every canonical name
//! with normalized edit distance and mapped to the best match.

use crate::core::error::{PilotError, Result};
use crate::directive::Directive;
use crate::ops::registry::{self, OperationDescriptor};
use std::collections::BTreeMap;

/// Rewrite a directive's parameter names to canonical form
///
/// Fails with `UnknownOperation` when the operation name itself has no
/// registry match; the caller drops the directive and moves on. Supplied
/// names that score against nothing (operation takes no parameters) are
/// discarded. When two supplied names collapse onto the same canonical
/// name the first one wins.
pub fn reconcile(directive: Directive) -> Result<(Directive, &'static OperationDescriptor)> {
    let descriptor = registry::lookup(&directive.operation)
        .ok_or_else(|| PilotError::UnknownOperation(directive.operation.clone()))?;
    let Directive {
        parameters: supplied_parameters,
        rationale,
        needs_confirmation,
        ..
    } = directive;

    let mut parameters = BTreeMap::new();
    for (supplied, value) in supplied_parameters {
        match best_match(&supplied, descriptor) {
            Some(canonical) => {
                if canonical != supplied {
                    tracing::debug!(
                        operation = descriptor.name,
                        supplied = %supplied,
                        canonical,
                        "reconciled parameter name"
                    );
                }
                parameters.entry(canonical.to_string()).or_insert(value);
            }
            None => {
                tracing::warn!(
                    operation = descriptor.name,
                    parameter = %supplied,
                    "discarding parameter with no canonical counterpart"
                );
            }
        }
    }

    Ok((
        Directive {
            operation: descriptor.name.to_string(),
            parameters,
            rationale,
            needs_confirmation,
        },
        descriptor,
    ))
}

/// First required parameter missing from a reconciled directive, if any
///
/// An explicit JSON null counts as missing; it would be dropped at
/// rendering anyway and must not reach the confirmation gate.
pub fn missing_required(
    directive: &Directive,
    descriptor: &OperationDescriptor,
) -> Option<&'static str> {
    descriptor
        .params
        .iter()
        .find(|p| {
            p.required
                && directive
                    .parameters
                    .get(p.name)
                    .map_or(true, serde_json::Value::is_null)
        })
        .map(|p| p.name)
}

/// Best-scoring canonical name for a supplied parameter name
///
/// Ties break toward the earlier name in the descriptor's declared order,
/// hence the strict comparison.
fn best_match(supplied: &str, descriptor: &OperationDescriptor) -> Option<&'static str> {
    let supplied = supplied.to_lowercase();
    let mut best: Option<(&'static str, f64)> = None;
    for canonical in descriptor.canonical_names() {
        let score = strsim::normalized_levenshtein(&supplied, &canonical.to_lowercase());
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((canonical, score));
        }
    }
    best.map(|(name, _)| name)
}
