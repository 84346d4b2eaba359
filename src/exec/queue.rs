//! Ordered queue of resolved directives awaiting execution

use crate::directive::Directive;
use crate::ops::registry::OperationDescriptor;

/// One fully reconciled and resolved directive, ready to run
#[derive(Debug, Clone)]
pub struct QueuedDirective {
    pub directive: Directive,
    pub descriptor: &'static OperationDescriptor,
}

impl QueuedDirective {
    pub fn requires_confirmation(&self) -> bool {
        self.directive
            .requires_confirmation(self.descriptor.destructive)
    }
}

/// The per-turn execution queue
///
/// Emptied at the start of each user turn, populated by the pipeline, and
/// then either fully drained by the runner or fully discarded on a
/// rejected confirmation. Never partially persisted across turns.
#[derive(Debug, Default)]
pub struct ExecutionQueue {
    items: Vec<QueuedDirective>,
}

impl ExecutionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, directive: Directive, descriptor: &'static OperationDescriptor) {
        self.items.push(QueuedDirective {
            directive,
            descriptor,
        });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether any queued directive must pass the confirmation gate
    pub fn requires_confirmation(&self) -> bool {
        self.items.iter().any(QueuedDirective::requires_confirmation)
    }

    /// Human-readable summary of the directives needing approval
    pub fn confirmation_message(&self) -> String {
        let mut lines = vec!["The following actions need your approval:".to_string()];
        for item in self.items.iter().filter(|i| i.requires_confirmation()) {
            let rationale = if item.directive.rationale.is_empty() {
                "(no rationale given)"
            } else {
                item.directive.rationale.as_str()
            };
            lines.push(format!("  - {}: {}", item.directive.operation, rationale));
        }
        lines.push("Rejecting discards the whole queue, including unflagged actions.".into());
        lines.join("\n")
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueuedDirective> {
        self.items.iter()
    }

    pub fn into_items(self) -> Vec<QueuedDirective> {
        self.items
    }
}
