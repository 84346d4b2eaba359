//! Extract the machine-readable payload from model output
//!
//! The model is instructed to wrap its directive array between fixed
//! sentinel markers. Everything outside the markers is prose and ignored.

use crate::core::error::{PilotError, Result};

/// Opening sentinel the model wraps its payload in
pub const OPEN_SENTINEL: &str = "<JSON>";
/// Closing sentinel
pub const CLOSE_SENTINEL: &str = "<JSON/>";

/// Pull the payload out of a raw completion
///
/// Returns the trimmed substring between the first opening marker and the
/// first closing marker after it. A missing marker is `MalformedOutput`:
/// the caller treats it as "no actionable directives", not a crash.
pub fn extract(raw: &str) -> Result<&str> {
    let start = raw
        .find(OPEN_SENTINEL)
        .ok_or_else(|| PilotError::MalformedOutput("missing opening sentinel".into()))?;
    let after_open = &raw[start + OPEN_SENTINEL.len()..];
    let end = after_open
        .find(CLOSE_SENTINEL)
        .ok_or_else(|| PilotError::MalformedOutput("missing closing sentinel".into()))?;
    Ok(after_open[..end].trim())
}
