//! Access to the external `todo` task store
//!
//! The store is an external program reached by shelling out. Everything
//! the engine knows about it is a family of command templates it renders
//! (`command`), the textual result it parses back (`output`, `snapshot`),
//! and a narrow execution seam (`TaskStore`) so tests can substitute a
//! recording fake for the real subprocess.

pub mod command;
pub mod output;
pub mod snapshot;

use crate::core::error::{PilotError, Result};
use std::process::Command;

/// Execution seam over the task-store CLI
///
/// One rendered command line in, the store's stdout back. Implementations
/// are blocking by contract: the engine never issues a second call while
/// one is outstanding.
pub trait TaskStore {
    fn run(&mut self, command_line: &str) -> Result<String>;
}

/// The real store: runs command lines through a shell
///
/// The command line is a single rendered string (quoting already applied
/// by the renderer), executed with `sh -c` the same way a user would type
/// it.
pub struct TodoCli;

impl TaskStore for TodoCli {
    fn run(&mut self, command_line: &str) -> Result<String> {
        tracing::info!(command = command_line, "running store command");
        let output = Command::new("sh").arg("-c").arg(command_line).output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PilotError::ExternalCommandFailure(format!(
                "{} (exit {:?}): {}",
                command_line,
                output.status.code(),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
