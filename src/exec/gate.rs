//! Confirmation gate: human approval before destructive queues run
//!
//! Two states: idle, awaiting a response. When a freshly built queue
//! contains any directive requiring confirmation, the gate takes ownership
//! of the whole queue and hands the caller a message to render. The
//! response is all-or-nothing for the turn: accept runs everything that
//! was queued (flagged or not), reject discards everything. There is no
//! timeout; an unanswered gate stays pending until an explicit response.

use crate::exec::queue::ExecutionQueue;

/// What the gate did with a freshly built queue
#[derive(Debug)]
pub enum GateDecision {
    /// Nothing needed approval; execute immediately
    PassThrough(ExecutionQueue),
    /// Queue held; render the message and ask the user
    Held { message: String },
}

#[derive(Debug, Default)]
pub struct ConfirmationGate {
    pending: Option<ExecutionQueue>,
}

impl ConfirmationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a queue is suspended waiting for a response
    pub fn is_awaiting(&self) -> bool {
        self.pending.is_some()
    }

    /// Inspect a queue; hold it if any directive needs approval
    ///
    /// Must not be called while already awaiting; the session refuses new
    /// turns in that state.
    pub fn intercept(&mut self, queue: ExecutionQueue) -> GateDecision {
        debug_assert!(self.pending.is_none(), "gate already holds a queue");
        if queue.requires_confirmation() {
            let message = queue.confirmation_message();
            tracing::info!(directives = queue.len(), "queue suspended for confirmation");
            self.pending = Some(queue);
            GateDecision::Held { message }
        } else {
            GateDecision::PassThrough(queue)
        }
    }

    /// Apply the user's single choice
    ///
    /// Accept returns the full pending queue for execution; reject (or a
    /// response with nothing pending) returns `None` and the queue, if
    /// any, is dropped unexecuted.
    pub fn respond(&mut self, accept: bool) -> Option<ExecutionQueue> {
        let pending = self.pending.take()?;
        if accept {
            Some(pending)
        } else {
            tracing::info!(directives = pending.len(), "queue discarded on rejection");
            None
        }
    }
}
