//! Per-turn pipeline orchestration
//!
//! A session owns the execution state that used to hide in module globals
//! in ad-hoc assistants: the confirmation gate and, while one is pending,
//! the suspended queue. Each user turn flows raw model text through
//! extract -> normalize -> reconcile -> resolve, queues what survives,
//! and either runs the queue or suspends it at the gate.

use crate::core::error::{PilotError, Result};
use crate::directive::{extract, normalize, reconcile, resolve};
use crate::exec::{runner, ConfirmationGate, DirectiveOutcome, ExecutionQueue, GateDecision};
use crate::ops::registry::ValueRole;
use crate::store::snapshot::TaskSnapshot;
use crate::store::TaskStore;

/// What a turn produced, for the caller to render
#[derive(Debug)]
pub enum TurnOutcome {
    /// No actionable directives: missing payload, empty plan, or every
    /// directive was dropped during validation
    NoDirectives,
    /// The queue ran; one outcome per executed directive
    Executed(Vec<DirectiveOutcome>),
    /// The queue is suspended; render the message and collect a yes/no
    AwaitingConfirmation { message: String },
    /// New input arrived while a confirmation was still pending
    ConfirmationPending,
}

pub struct Session<S: TaskStore> {
    store: S,
    bin: String,
    gate: ConfirmationGate,
}

impl<S: TaskStore> Session<S> {
    pub fn new(store: S, bin: impl Into<String>) -> Self {
        Self {
            store,
            bin: bin.into(),
            gate: ConfirmationGate::new(),
        }
    }

    /// Whether a suspended queue is waiting on the user
    pub fn awaiting_confirmation(&self) -> bool {
        self.gate.is_awaiting()
    }

    /// Direct access to the underlying store (inspection in tests)
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Current task listing, used as prompt context
    ///
    /// A store failure degrades to an empty listing; the model just gets
    /// less context to ground references against.
    pub fn task_listing(&mut self) -> String {
        self.store
            .run(&format!("{} --flat", self.bin))
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "task listing unavailable for prompt context");
                String::new()
            })
    }

    /// Process one raw model response
    ///
    /// Only `ParseError` is turn-fatal and surfaces as `Err`; a missing
    /// payload is a normal `NoDirectives` turn, and every later failure
    /// is directive-local (logged, dropped, siblings proceed).
    pub fn handle_response(&mut self, raw: &str) -> Result<TurnOutcome> {
        if self.gate.is_awaiting() {
            return Ok(TurnOutcome::ConfirmationPending);
        }

        let payload = match extract::extract(raw) {
            Ok(payload) => payload,
            Err(PilotError::MalformedOutput(reason)) => {
                tracing::info!(%reason, "model produced no actionable directives");
                return Ok(TurnOutcome::NoDirectives);
            }
            Err(e) => return Err(e),
        };

        let directives = normalize::normalize(payload)?;
        tracing::debug!(count = directives.len(), "directives extracted");

        let mut queue = ExecutionQueue::new();
        let mut snapshot: Option<TaskSnapshot> = None;

        for directive in directives {
            let (mut directive, descriptor) = match reconcile::reconcile(directive) {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::warn!(error = %e, "directive dropped");
                    continue;
                }
            };

            if let Some(missing) = reconcile::missing_required(&directive, descriptor) {
                tracing::warn!(
                    operation = descriptor.name,
                    missing,
                    "directive dropped: required parameter absent"
                );
                continue;
            }

            if needs_resolution(&directive, descriptor) {
                if snapshot.is_none() {
                    match TaskSnapshot::fetch(&mut self.store, &self.bin) {
                        Ok(s) => snapshot = Some(s),
                        Err(e) => {
                            tracing::warn!(error = %e, operation = descriptor.name,
                                "directive dropped: snapshot unavailable");
                            continue;
                        }
                    }
                }
                let snap = snapshot.as_ref().expect("snapshot just fetched");
                if let Err(e) = resolve::resolve_directive(&mut directive, descriptor, snap) {
                    tracing::warn!(error = %e, operation = descriptor.name, "directive dropped");
                    continue;
                }
            }

            queue.push(directive, descriptor);
        }

        if queue.is_empty() {
            return Ok(TurnOutcome::NoDirectives);
        }

        match self.gate.intercept(queue) {
            GateDecision::PassThrough(queue) => Ok(TurnOutcome::Executed(runner::run(
                queue,
                &mut self.store,
                &self.bin,
            ))),
            GateDecision::Held { message } => Ok(TurnOutcome::AwaitingConfirmation { message }),
        }
    }

    /// Apply the user's confirmation choice
    ///
    /// Accept runs the full suspended queue; reject discards it. With
    /// nothing pending this is a no-op returning no outcomes.
    pub fn respond_to_confirmation(&mut self, accept: bool) -> Vec<DirectiveOutcome> {
        match self.gate.respond(accept) {
            Some(queue) => runner::run(queue, &mut self.store, &self.bin),
            None => Vec::new(),
        }
    }
}

/// Whether any present, non-null parameter is a task reference
fn needs_resolution(
    directive: &crate::directive::Directive,
    descriptor: &crate::ops::registry::OperationDescriptor,
) -> bool {
    descriptor.params.iter().any(|p| {
        p.role != ValueRole::Plain
            && directive
                .parameters
                .get(p.name)
                .map_or(false, |v| !v.is_null())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Store fake that serves a fixed listing and records every command
    struct ScriptedStore {
        listing: &'static str,
        commands: Vec<String>,
    }

    impl ScriptedStore {
        fn new(listing: &'static str) -> Self {
            Self {
                listing,
                commands: Vec::new(),
            }
        }

        fn mutations(&self) -> Vec<&String> {
            self.commands
                .iter()
                .filter(|c| !c.contains("search \"\""))
                .collect()
        }
    }

    impl TaskStore for ScriptedStore {
        fn run(&mut self, command_line: &str) -> Result<String> {
            self.commands.push(command_line.to_string());
            if command_line.contains("search \"\" --undone") {
                Ok(self.listing.to_string())
            } else {
                Ok(String::new())
            }
        }
    }

    const LISTING: &str = " 1 | Elden Ring ★5 #games\n 2 | Rust #games_wishlist\n";

    fn wrap(payload: &str) -> String {
        format!("Here is my plan.\n<JSON>\n{}\n<JSON/>\n", payload)
    }

    #[test]
    fn test_no_sentinel_is_quiet_turn() {
        let mut session = Session::new(ScriptedStore::new(LISTING), "todo");
        let outcome = session.handle_response("I cannot help with that.").unwrap();
        assert!(matches!(outcome, TurnOutcome::NoDirectives));
        assert!(session.store.commands.is_empty());
    }

    #[test]
    fn test_parse_error_is_turn_fatal_and_side_effect_free() {
        let mut session = Session::new(ScriptedStore::new(LISTING), "todo");
        let err = session.handle_response(&wrap("[{broken")).unwrap_err();
        assert!(matches!(err, PilotError::ParseError(_)));
        assert!(session.store.commands.is_empty());
    }

    #[test]
    fn test_plain_add_executes_without_gate() {
        let mut session = Session::new(ScriptedStore::new(LISTING), "todo");
        let payload = r#"[{"operation": "add",
            "parameters": {"title": "sekiro", "ctx": "games_wishlist"},
            "rationale": "user wants it"}]"#;
        let outcome = session.handle_response(&wrap(payload)).unwrap();
        match outcome {
            TurnOutcome::Executed(outcomes) => {
                assert_eq!(outcomes.len(), 1);
                assert_eq!(
                    outcomes[0].command.as_deref(),
                    Some("todo add \"sekiro\" --context \"games_wishlist\"")
                );
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_operation_dropped_sibling_proceeds() {
        let mut session = Session::new(ScriptedStore::new(LISTING), "todo");
        let payload = r#"[
            {"operation": "teleport", "parameters": {}, "rationale": "??"},
            {"operation": "ping", "parameters": {"ids": ["rust"]}, "rationale": "bump"}
        ]"#;
        let outcome = session.handle_response(&wrap(payload)).unwrap();
        match outcome {
            TurnOutcome::Executed(outcomes) => {
                assert_eq!(outcomes.len(), 1);
                assert_eq!(outcomes[0].command.as_deref(), Some("todo ping 2"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_destructive_turn_suspends_then_runs_all_on_accept() {
        let mut session = Session::new(ScriptedStore::new(LISTING), "todo");
        let payload = r#"[
            {"operation": "rm", "parameters": {"ids": ["elden ring"]}, "rationale": "remove it"},
            {"operation": "add", "parameters": {"title": "sekiro"}, "rationale": "replacement"}
        ]"#;
        let outcome = session.handle_response(&wrap(payload)).unwrap();
        assert!(matches!(outcome, TurnOutcome::AwaitingConfirmation { .. }));
        assert!(session.awaiting_confirmation());
        // Nothing has run yet beyond the snapshot queries
        assert!(session.store.mutations().is_empty());

        let outcomes = session.respond_to_confirmation(true);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(
            session.store.mutations(),
            vec!["todo rm 1", "todo add \"sekiro\""]
        );
    }

    #[test]
    fn test_rejection_discards_flagged_and_unflagged_alike() {
        let mut session = Session::new(ScriptedStore::new(LISTING), "todo");
        let payload = r#"[
            {"operation": "rm", "parameters": {"ids": ["1"]}, "rationale": "remove"},
            {"operation": "add", "parameters": {"title": "sekiro"}, "rationale": "add"}
        ]"#;
        session.handle_response(&wrap(payload)).unwrap();
        let outcomes = session.respond_to_confirmation(false);
        assert!(outcomes.is_empty());
        assert!(session.store.mutations().is_empty());
        assert!(!session.awaiting_confirmation());
    }

    #[test]
    fn test_new_input_refused_while_gate_pending() {
        let mut session = Session::new(ScriptedStore::new(LISTING), "todo");
        let payload = r#"[{"operation": "rm", "parameters": {"ids": ["1"]}, "rationale": "x"}]"#;
        session.handle_response(&wrap(payload)).unwrap();
        let outcome = session.handle_response(&wrap(payload)).unwrap();
        assert!(matches!(outcome, TurnOutcome::ConfirmationPending));
        assert!(session.awaiting_confirmation());
    }

    #[test]
    fn test_null_required_parameter_never_reaches_gate() {
        let mut session = Session::new(ScriptedStore::new(LISTING), "todo");
        let payload = r#"[{"operation": "rm", "parameters": {"ids": null}, "rationale": "x"}]"#;
        let outcome = session.handle_response(&wrap(payload)).unwrap();
        assert!(matches!(outcome, TurnOutcome::NoDirectives));
        assert!(!session.awaiting_confirmation());
        assert!(session.store.mutations().is_empty());
    }

    #[test]
    fn test_ambiguous_reference_drops_directive() {
        // Both titles contain "elden" once we add a second one
        let listing = " 1 | Elden Ring #games\n 2 | Elden Lord #games\n";
        let mut session = Session::new(ScriptedStore::new(listing), "todo");
        let payload =
            r#"[{"operation": "done", "parameters": {"ids": ["elden"]}, "rationale": "finish"}]"#;
        let outcome = session.handle_response(&wrap(payload)).unwrap();
        assert!(matches!(outcome, TurnOutcome::NoDirectives));
        assert!(session.store.mutations().is_empty());
    }
}
