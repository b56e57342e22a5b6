//! Executor abstraction for toolchain subprocesses.
//!
//! The [`Executor`] trait is the single boundary to the external CLI
//! toolchain: an argument vector in, exit code plus both streams out.
//! Implementations must not retry and must not impose their own timeout;
//! bounding a hung invocation is the caller's responsibility.

pub mod cli;

use crate::error::Result;
use std::collections::HashMap;
use std::path::Path;

/// Raw outcome of one subprocess invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code (-1 when the process was killed by a signal)
    pub rc: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the process exited zero.
    pub fn success(&self) -> bool {
        self.rc == 0
    }
}

/// Boundary to the external CLI toolchain.
///
/// This trait abstracts subprocess execution, enabling:
/// - Real invocation via `std::process::Command`
/// - Scripted implementations for testing
pub trait Executor: Send + Sync {
    /// Run an argument vector with an optional working directory and an
    /// environment overlay applied on top of the parent environment.
    ///
    /// A non-zero exit is a successful `execute` call; only failing to
    /// start the process at all is an error.
    fn execute(
        &self,
        argv: &[String],
        cwd: Option<&Path>,
        env: &HashMap<String, String>,
    ) -> Result<CommandOutput>;
}

/// Render an argument vector the way it would be typed in a shell.
///
/// Display-only: the vector itself is what gets executed, this string is
/// carried in reports and error messages for diagnosis.
pub fn render_command(argv: &[String]) -> String {
    shell_words::join(argv)
}
