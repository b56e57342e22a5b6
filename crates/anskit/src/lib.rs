//! # anskit
//!
//! Pure Rust library for driving the Ansible CLI toolchain.
//!
//! This crate provides functionality for:
//! - Running playbooks, ad-hoc tasks, and galaxy installs as subprocesses
//! - Normalizing `ansible-inventory` JSON into snapshots and diffing them
//! - Parsing `PLAY RECAP` blocks into per-host counters
//! - Certifying idempotence by running an operation twice
//! - Scoped, leak-free vault password handling
//!
//! ## Example
//!
//! ```no_run
//! use anskit::{Client, SnapshotRequest};
//!
//! let client = Client::new();
//! let request = SnapshotRequest {
//!     sources: vec!["hosts.ini".to_string()],
//!     include_hostvars: true,
//!     ..SnapshotRequest::default()
//! };
//! let snapshot = client.inventory_snapshot(&request).expect("inventory failed");
//! for host in &snapshot.hosts {
//!     println!("{host}");
//! }
//! ```
//!
//! The toolchain boundary is the [`Executor`] trait; tests substitute a
//! scripted implementation so no subprocess ever runs.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod args;
pub mod diff;
pub mod error;
pub mod executor;
pub mod idempotence;
pub mod inventory;
pub mod recap;
#[cfg(test)]
pub(crate) mod testing;
pub mod types;
pub mod vault;

pub use args::{
    GalaxyKind, GalaxyOptions, ModuleArgs, PlaybookOptions, TaskOptions, galaxy_argv,
    playbook_argv, syntax_check_argv, task_argv,
};
pub use diff::diff_snapshots;
pub use error::{Error, ErrorCategory, Result};
pub use executor::{CommandOutput, Executor, cli::CliExecutor, render_command};
pub use idempotence::verify_idempotent;
pub use inventory::{SnapshotRequest, extract_snapshot, snapshot};
pub use recap::parse_recap;
pub use types::{
    IdempotenceVerdict, InventoryDiff, InventorySnapshot, KeyChange, MembershipChange, RecapStats,
    RecapTable, RunReport, changed_total,
};
pub use vault::{CredentialPlan, PasswordSource, ScopedSecretFile, resolve_credential};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Working directory and environment overlay for toolchain invocations.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    /// Working directory for the subprocess
    pub cwd: Option<PathBuf>,
    /// Environment overlay applied on top of the parent environment
    pub env: HashMap<String, String>,
}

impl ExecutionContext {
    /// Context running in `cwd` with no extra environment.
    pub fn in_dir(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(cwd.into()),
            env: HashMap::new(),
        }
    }
}

/// High-level client for Ansible toolchain operations.
///
/// The client wraps an executor and provides the operation surface:
/// playbook and task execution, inventory snapshots and diffs,
/// idempotence checks, galaxy installs, and vault operations.
pub struct Client {
    executor: Box<dyn Executor>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Create a client that spawns the real toolchain binaries.
    pub fn new() -> Self {
        Self {
            executor: Box::new(CliExecutor::new()),
        }
    }

    /// Create a client with a custom executor (useful for testing).
    pub fn with_executor(executor: Box<dyn Executor>) -> Self {
        Self { executor }
    }

    /// Execute an argument vector and wrap the outcome in a [`RunReport`].
    ///
    /// A non-zero exit is a structured, non-fatal result; only failing to
    /// start the process is an error.
    fn run(&self, argv: &[String], context: &ExecutionContext) -> Result<RunReport> {
        let output = self
            .executor
            .execute(argv, context.cwd.as_deref(), &context.env)?;
        Ok(RunReport {
            ok: output.success(),
            rc: output.rc,
            command: render_command(argv),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    // =========================================================================
    // Playbook and task execution
    // =========================================================================

    /// Run a playbook.
    pub fn run_playbook(
        &self,
        options: &PlaybookOptions,
        context: &ExecutionContext,
    ) -> Result<RunReport> {
        self.run(&playbook_argv(options), context)
    }

    /// Validate playbook syntax without executing it.
    pub fn syntax_check(
        &self,
        playbook: &Path,
        inventory: Option<&str>,
        context: &ExecutionContext,
    ) -> Result<RunReport> {
        self.run(&syntax_check_argv(playbook, inventory), context)
    }

    /// Run an ad-hoc module invocation.
    pub fn run_task(&self, options: &TaskOptions, context: &ExecutionContext) -> Result<RunReport> {
        self.run(&task_argv(options), context)
    }

    /// Run a playbook twice and certify that the second run changed nothing.
    pub fn verify_playbook_idempotent(
        &self,
        options: &PlaybookOptions,
        context: &ExecutionContext,
    ) -> Result<IdempotenceVerdict> {
        verify_idempotent(
            self.executor.as_ref(),
            &playbook_argv(options),
            context.cwd.as_deref(),
            &context.env,
        )
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    /// Acquire a normalized inventory snapshot.
    pub fn inventory_snapshot(&self, request: &SnapshotRequest) -> Result<InventorySnapshot> {
        snapshot(self.executor.as_ref(), request)
    }

    /// Snapshot two configurations and diff them, left as baseline.
    ///
    /// Both acquisitions must succeed before any diffing happens; a
    /// failure on either side propagates unchanged.
    pub fn inventory_diff(
        &self,
        left: &SnapshotRequest,
        right: &SnapshotRequest,
        include_hostvars: bool,
    ) -> Result<InventoryDiff> {
        let left_snapshot = snapshot(self.executor.as_ref(), left)?;
        let right_snapshot = snapshot(self.executor.as_ref(), right)?;
        Ok(diff_snapshots(
            &left_snapshot,
            &right_snapshot,
            include_hostvars,
        ))
    }

    // =========================================================================
    // Dependency installation
    // =========================================================================

    /// Install roles or collections via `ansible-galaxy`.
    pub fn galaxy_install(
        &self,
        options: &GalaxyOptions,
        context: &ExecutionContext,
    ) -> Result<RunReport> {
        self.run(&galaxy_argv(options), context)
    }

    // =========================================================================
    // Vault operations
    // =========================================================================

    fn vault_run(
        &self,
        subcommand: &str,
        trailing: &[String],
        plan: &CredentialPlan,
        context: &ExecutionContext,
    ) -> Result<RunReport> {
        let mut argv = vec!["ansible-vault".to_string(), subcommand.to_string()];
        argv.extend(trailing.iter().cloned());
        // The password source lives exactly as long as this invocation.
        let source = plan.acquire()?;
        if let Some(source) = &source {
            argv.push("--vault-password-file".to_string());
            argv.push(source.path().display().to_string());
        }
        self.run(&argv, context)
    }

    /// Encrypt files at rest.
    pub fn vault_encrypt(
        &self,
        files: &[String],
        plan: &CredentialPlan,
        context: &ExecutionContext,
    ) -> Result<RunReport> {
        self.vault_run("encrypt", files, plan, context)
    }

    /// Decrypt files at rest.
    pub fn vault_decrypt(
        &self,
        files: &[String],
        plan: &CredentialPlan,
        context: &ExecutionContext,
    ) -> Result<RunReport> {
        self.vault_run("decrypt", files, plan, context)
    }

    /// View encrypted files without rewriting them.
    pub fn vault_view(
        &self,
        files: &[String],
        plan: &CredentialPlan,
        context: &ExecutionContext,
    ) -> Result<RunReport> {
        self.vault_run("view", files, plan, context)
    }

    /// Encrypt a single string as a named vaulted variable.
    pub fn vault_encrypt_string(
        &self,
        value: &str,
        name: Option<&str>,
        plan: &CredentialPlan,
        context: &ExecutionContext,
    ) -> Result<RunReport> {
        let mut trailing = vec![value.to_string()];
        if let Some(name) = name {
            trailing.push("--name".to_string());
            trailing.push(name.to_string());
        }
        self.vault_run("encrypt_string", &trailing, plan, context)
    }

    /// Re-encrypt files under a new password.
    ///
    /// Old and new credentials come from two independent resolutions,
    /// composed uniformly: the old one feeds `--vault-password-file`, the
    /// new one `--new-vault-password-file`, each through its own scoped
    /// password source.
    pub fn vault_rekey(
        &self,
        files: &[String],
        old: &CredentialPlan,
        new: &CredentialPlan,
        context: &ExecutionContext,
    ) -> Result<RunReport> {
        let mut argv = vec!["ansible-vault".to_string(), "rekey".to_string()];
        argv.extend(files.iter().cloned());
        let old_source = old.acquire()?;
        if let Some(source) = &old_source {
            argv.push("--vault-password-file".to_string());
            argv.push(source.path().display().to_string());
        }
        let new_source = new.acquire()?;
        if let Some(source) = &new_source {
            argv.push("--new-vault-password-file".to_string());
            argv.push(source.path().display().to_string());
        }
        self.run(&argv, context)
    }
}
