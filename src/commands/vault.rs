//! `ansictl vault` subcommands.
//!
//! Passwords given as values never reach the toolchain argv; they are
//! materialized to scoped temp files that live only for the invocation.

use anyhow::Result;
use std::path::{Path, PathBuf};

use anskit::vault::{VAULT_PASSWORD_ENV, VAULT_PASSWORD_FILE_ENV};
use anskit::{Client, CredentialPlan, resolve_credential};

use super::{finish_run, resolve_context};
use crate::cli::VaultCredentialArgs;

/// Resolve a credential plan from flags with environment fallbacks.
fn plan_from(value: Option<&str>, file: Option<&Path>) -> CredentialPlan {
    let env_value = std::env::var(VAULT_PASSWORD_ENV).ok();
    let env_file = std::env::var(VAULT_PASSWORD_FILE_ENV).ok();
    resolve_credential(value, file, env_value.as_deref(), env_file.as_deref())
}

fn credential_plan(credential: &VaultCredentialArgs) -> CredentialPlan {
    plan_from(
        credential.vault_password.as_deref(),
        credential.vault_password_file.as_deref(),
    )
}

/// Encrypt files at rest.
pub fn encrypt(
    files: &[String],
    credential: &VaultCredentialArgs,
    cwd: Option<PathBuf>,
) -> Result<i32> {
    let command = resolve_context(None, cwd)?;
    let report = Client::new().vault_encrypt(files, &credential_plan(credential), &command.context)?;
    finish_run(&report)
}

/// Decrypt files at rest.
pub fn decrypt(
    files: &[String],
    credential: &VaultCredentialArgs,
    cwd: Option<PathBuf>,
) -> Result<i32> {
    let command = resolve_context(None, cwd)?;
    let report = Client::new().vault_decrypt(files, &credential_plan(credential), &command.context)?;
    finish_run(&report)
}

/// View encrypted files without rewriting them.
pub fn view(
    files: &[String],
    credential: &VaultCredentialArgs,
    cwd: Option<PathBuf>,
) -> Result<i32> {
    let command = resolve_context(None, cwd)?;
    let report = Client::new().vault_view(files, &credential_plan(credential), &command.context)?;
    finish_run(&report)
}

/// Encrypt a single string as a vaulted variable.
pub fn encrypt_string(
    value: &str,
    name: Option<&str>,
    credential: &VaultCredentialArgs,
    cwd: Option<PathBuf>,
) -> Result<i32> {
    let command = resolve_context(None, cwd)?;
    let report = Client::new().vault_encrypt_string(
        value,
        name,
        &credential_plan(credential),
        &command.context,
    )?;
    finish_run(&report)
}

/// Re-encrypt files under a new password.
///
/// The old and new credentials resolve independently, so the same
/// environment fallback can supply the current password while the new
/// one comes from a flag.
pub fn rekey(
    files: &[String],
    old_value: Option<&str>,
    old_file: Option<&Path>,
    new_value: Option<&str>,
    new_file: Option<&Path>,
    cwd: Option<PathBuf>,
) -> Result<i32> {
    let command = resolve_context(None, cwd)?;
    let old = plan_from(old_value, old_file);
    let new = plan_from(new_value, new_file);
    let report = Client::new().vault_rekey(files, &old, &new, &command.context)?;
    finish_run(&report)
}
