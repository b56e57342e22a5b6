//! Command implementations: thin marshalling from CLI flags into the
//! `anskit` client, with JSON reports on stdout.
//!
//! Every command returns an exit code. Toolchain failures that carry
//! structured output (exit code, stdout, stderr) are printed as failure
//! reports rather than bubbling up as opaque errors.

pub mod galaxy;
pub mod inventory;
pub mod playbook;
pub mod project;
pub mod role;
pub mod task;
pub mod vault;

use anyhow::{Result, bail};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;

use anskit::{Error, ExecutionContext, RunReport};

use crate::config::{self, ProjectDefinition, Registry};

/// Pretty-print a serializable report to stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a run report and map it to an exit code.
pub fn finish_run(report: &RunReport) -> Result<i32> {
    print_json(report)?;
    Ok(i32::from(!report.ok))
}

/// Render a toolchain error as a structured failure report.
///
/// Errors that carry captured output (a non-zero exit, or unparseable
/// stdout) keep it in the report so the caller can see what the
/// toolchain actually said.
pub fn failure_report(err: &Error) -> serde_json::Value {
    let mut report = json!({
        "ok": false,
        "category": err.category().description(),
        "error": err.to_string(),
    });
    match err {
        Error::CommandFailed {
            command,
            rc,
            stdout,
            stderr,
        } => {
            report["command"] = json!(command);
            report["rc"] = json!(rc);
            report["stdout"] = json!(stdout);
            report["stderr"] = json!(stderr);
        }
        Error::InventoryParse { stdout, .. } => {
            report["stdout"] = json!(stdout);
        }
        _ => {}
    }
    report
}

/// Execution context plus the defaults a resolved project contributes.
pub struct CommandContext {
    pub context: ExecutionContext,
    pub project: Option<ProjectDefinition>,
}

impl CommandContext {
    /// Default inventory from the project, when the flags gave none.
    pub fn default_inventory(&self) -> Option<String> {
        self.project.as_ref().and_then(|p| p.inventory.clone())
    }
}

/// Resolve the working context for a command.
///
/// A resolved project supplies the working directory and environment
/// overlay; an explicit `--cwd` always wins over the project root. An
/// explicitly named project that is not registered is an error, while a
/// missing implicit project just means no overlay.
pub fn resolve_context(
    explicit_project: Option<&str>,
    cwd: Option<PathBuf>,
) -> Result<CommandContext> {
    let registry = Registry::load()?;
    let project = registry.resolve_project(explicit_project, &config::process_env());
    if let Some(name) = explicit_project
        && project.is_none()
    {
        bail!("Project '{name}' is not registered (see `ansictl project list`)");
    }

    let mut context = ExecutionContext::default();
    if let Some(project) = &project {
        context.cwd = Some(project.root_path());
        context.env = project.overlay_env();
    }
    if cwd.is_some() {
        context.cwd = cwd;
    }
    Ok(CommandContext { context, project })
}
