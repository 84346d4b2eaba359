//! Sequential execution of a resolved queue against the store

use crate::exec::queue::ExecutionQueue;
use crate::store::{command, output, TaskStore};
use serde_json::Value;

/// Per-directive execution record, kept for the audit log
#[derive(Debug, Clone)]
pub struct DirectiveOutcome {
    pub operation: String,
    pub rationale: String,
    /// The rendered command line, when rendering succeeded
    pub command: Option<String>,
    /// Store stdout, ANSI-stripped
    pub output: Option<String>,
    pub error: Option<String>,
    /// Deadline the directive carried, for scheduling-conflict probes
    pub deadline: Option<String>,
}

impl DirectiveOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Execute every queued directive in submission order
///
/// One external command per directive, strictly sequential. A store
/// failure is recorded and the runner moves on: later directives are
/// frequently independent of the failed one.
pub fn run(queue: ExecutionQueue, store: &mut dyn TaskStore, bin: &str) -> Vec<DirectiveOutcome> {
    let mut outcomes = Vec::with_capacity(queue.len());

    for item in queue.into_items() {
        let deadline = item
            .directive
            .parameters
            .get("deadline")
            .and_then(Value::as_str)
            .map(str::to_string);
        let mut outcome = DirectiveOutcome {
            operation: item.directive.operation.clone(),
            rationale: item.directive.rationale.clone(),
            command: None,
            output: None,
            error: None,
            deadline,
        };

        let command_line = match command::render(bin, &item.directive, item.descriptor) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(operation = %outcome.operation, error = %e, "directive not rendered");
                outcome.error = Some(e.to_string());
                outcomes.push(outcome);
                continue;
            }
        };

        tracing::info!(
            command = %command_line,
            rationale = %outcome.rationale,
            "executing directive"
        );
        outcome.command = Some(command_line.clone());

        match store.run(&command_line) {
            Ok(raw) => {
                let cleaned = output::strip_ansi(&raw);
                if cleaned.trim().is_empty() {
                    tracing::debug!(command = %command_line, "store produced no output");
                } else {
                    tracing::debug!(command = %command_line, output = %cleaned, "store output");
                }
                outcome.output = Some(cleaned);
            }
            Err(e) => {
                tracing::warn!(command = %command_line, error = %e, "store command failed");
                outcome.error = Some(e.to_string());
            }
        }
        outcomes.push(outcome);
    }

    outcomes
}
