//! Test support: a scripted executor that replays canned outputs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::Result;
use crate::executor::{CommandOutput, Executor};

/// One recorded invocation: argv, working directory, env overlay.
pub type RecordedCall = (Vec<String>, Option<PathBuf>, HashMap<String, String>);

/// Executor that replays canned outputs in order and records every call.
pub struct ScriptedExecutor {
    outputs: Mutex<Vec<CommandOutput>>,
    /// Invocations seen so far, in order.
    pub calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedExecutor {
    pub fn new(outputs: Vec<CommandOutput>) -> Self {
        Self {
            outputs: Mutex::new(outputs),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn ok(stdout: &str) -> CommandOutput {
        CommandOutput {
            rc: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    pub fn failed(rc: i32, stderr: &str) -> CommandOutput {
        CommandOutput {
            rc,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    /// Argv of the call at `index`, for assertions.
    pub fn argv(&self, index: usize) -> Vec<String> {
        self.calls.lock().unwrap()[index].0.clone()
    }
}

impl Executor for ScriptedExecutor {
    fn execute(
        &self,
        argv: &[String],
        cwd: Option<&Path>,
        env: &HashMap<String, String>,
    ) -> Result<CommandOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((argv.to_vec(), cwd.map(Path::to_path_buf), env.clone()));
        Ok(self.outputs.lock().unwrap().remove(0))
    }
}
