//! Real subprocess executor backed by `std::process::Command`.

use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};

use super::{CommandOutput, Executor, render_command};

/// Executor that spawns the toolchain binaries found on `PATH`.
///
/// The parent environment is inherited and the overlay is applied on top,
/// so `ANSIBLE_CONFIG` and friends can be injected per invocation without
/// mutating the host process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliExecutor;

impl CliExecutor {
    /// Create a new CliExecutor.
    pub fn new() -> Self {
        Self
    }
}

impl Executor for CliExecutor {
    fn execute(
        &self,
        argv: &[String],
        cwd: Option<&Path>,
        env: &HashMap<String, String>,
    ) -> Result<CommandOutput> {
        let (program, args) = argv.split_first().ok_or_else(|| Error::Spawn {
            command: String::new(),
            source: std::io::Error::other("empty argument vector"),
        })?;

        let mut command = Command::new(program);
        command.args(args).envs(env);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        log::debug!("executing: {}", render_command(argv));

        let output = command.output().map_err(|source| Error::Spawn {
            command: render_command(argv),
            source,
        })?;

        let result = CommandOutput {
            rc: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };
        log::debug!("exit code {} from {}", result.rc, program);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_argv_is_spawn_error() {
        let executor = CliExecutor::new();
        let err = executor
            .execute(&[], None, &HashMap::new())
            .expect_err("empty argv must not spawn");
        assert!(matches!(err, Error::Spawn { .. }));
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let executor = CliExecutor::new();
        let argv = vec!["ansictl-test-binary-that-does-not-exist".to_string()];
        let err = executor
            .execute(&argv, None, &HashMap::new())
            .expect_err("missing binary must not spawn");
        assert!(matches!(err, Error::Spawn { .. }));
    }
}
