//! Execution queue, confirmation gate, and runner
//!
//! Resolved directives are queued in submission order, optionally held at
//! the confirmation gate, and then executed one external command at a
//! time.

pub mod gate;
pub mod queue;
pub mod runner;

pub use gate::{ConfirmationGate, GateDecision};
pub use queue::ExecutionQueue;
pub use runner::DirectiveOutcome;
