//! Vault credential resolution and scoped secret files.
//!
//! Vault passwords are ephemeral secret material. A password held in
//! memory is materialized to a restrictive temporary file immediately
//! before a toolchain invocation and erased unconditionally afterwards —
//! deletion happens on every exit path, including unwinding, because a
//! leaked password file is credential material left on disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable consulted for an in-memory password fallback.
pub const VAULT_PASSWORD_ENV: &str = "ANSIBLE_VAULT_PASSWORD";

/// Environment variable consulted for a password-file fallback.
pub const VAULT_PASSWORD_FILE_ENV: &str = "ANSIBLE_VAULT_PASSWORD_FILE";

/// How a vault password will be supplied to the toolchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialPlan {
    /// Use an existing password file directly; no temp file is created
    File(PathBuf),
    /// Materialize this in-memory value to a scoped secret file
    Value(String),
    /// No credential; the operation proceeds without a password argument
    None,
}

impl CredentialPlan {
    /// Whether any credential was resolved.
    pub fn is_none(&self) -> bool {
        matches!(self, CredentialPlan::None)
    }

    /// Acquire the password source for exactly one invocation.
    ///
    /// `File` plans pass the path through untouched; `Value` plans create
    /// a [`ScopedSecretFile`] whose lifetime ends when the returned source
    /// is dropped. Each acquisition creates its own file; sources are
    /// never shared or reused across invocations.
    pub fn acquire(&self) -> Result<Option<PasswordSource>> {
        match self {
            CredentialPlan::File(path) => Ok(Some(PasswordSource {
                path: path.clone(),
                _secret: None,
            })),
            CredentialPlan::Value(secret) => {
                let file = ScopedSecretFile::create(secret)?;
                Ok(Some(PasswordSource {
                    path: file.path().to_path_buf(),
                    _secret: Some(file),
                }))
            }
            CredentialPlan::None => Ok(None),
        }
    }
}

/// Resolve a vault credential from explicit parameters and environment
/// fallbacks, first match wins:
///
/// 1. explicit file path (used directly)
/// 2. explicit in-memory value (materialized)
/// 3. in-memory value from `ANSIBLE_VAULT_PASSWORD` (materialized)
/// 4. file path from `ANSIBLE_VAULT_PASSWORD_FILE` (used directly)
/// 5. no credential
///
/// All inputs are parameters; the caller performs the environment lookups
/// so this stays a pure function.
pub fn resolve_credential(
    explicit_value: Option<&str>,
    explicit_file: Option<&Path>,
    env_value: Option<&str>,
    env_file: Option<&str>,
) -> CredentialPlan {
    if let Some(file) = explicit_file {
        return CredentialPlan::File(file.to_path_buf());
    }
    if let Some(value) = explicit_value {
        return CredentialPlan::Value(value.to_string());
    }
    if let Some(value) = env_value {
        return CredentialPlan::Value(value.to_string());
    }
    if let Some(file) = env_file {
        return CredentialPlan::File(PathBuf::from(file));
    }
    CredentialPlan::None
}

/// A password file path valid for one toolchain invocation.
///
/// Holds the scoped secret file (when one was materialized) so the secret
/// survives exactly as long as this source.
#[derive(Debug)]
pub struct PasswordSource {
    path: PathBuf,
    _secret: Option<ScopedSecretFile>,
}

impl PasswordSource {
    /// Path to hand to the toolchain's password-file flag.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// An owned temporary file containing raw secret material.
///
/// Created with owner-only permissions, deleted on `Drop` on every exit
/// path including unwinding. Deletion is best-effort (logged, never
/// raised); creation failure propagates as [`Error::SecretFile`] because
/// proceeding without a promised password file would silently produce an
/// invalid command line.
#[derive(Debug)]
pub struct ScopedSecretFile {
    path: tempfile::TempPath,
}

impl ScopedSecretFile {
    /// Create a secret file holding `secret` as its exact contents.
    pub fn create(secret: &str) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("vaultpass_")
            .tempfile()
            .map_err(Error::SecretFile)?;
        file.write_all(secret.as_bytes())
            .and_then(|()| file.flush())
            .map_err(Error::SecretFile)?;
        log::debug!("materialized vault password to {}", file.path().display());
        Ok(Self {
            path: file.into_temp_path(),
        })
    }

    /// Path of the secret file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_precedence_explicit_file_wins() {
        let plan = resolve_credential(
            Some("inline"),
            Some(Path::new("/keys/vault.txt")),
            Some("from-env"),
            Some("/keys/env.txt"),
        );
        assert_eq!(plan, CredentialPlan::File(PathBuf::from("/keys/vault.txt")));
    }

    #[test]
    fn test_precedence_explicit_value_over_env() {
        let plan = resolve_credential(Some("inline"), None, Some("from-env"), None);
        assert_eq!(plan, CredentialPlan::Value("inline".to_string()));
    }

    #[test]
    fn test_precedence_env_value_over_env_file() {
        let plan = resolve_credential(None, None, Some("from-env"), Some("/keys/env.txt"));
        assert_eq!(plan, CredentialPlan::Value("from-env".to_string()));
    }

    #[test]
    fn test_precedence_env_file_then_none() {
        let plan = resolve_credential(None, None, None, Some("/keys/env.txt"));
        assert_eq!(plan, CredentialPlan::File(PathBuf::from("/keys/env.txt")));

        let none = resolve_credential(None, None, None, None);
        assert!(none.is_none());
    }

    #[test]
    fn test_scoped_file_holds_secret_then_vanishes() {
        let path;
        {
            let secret = ScopedSecretFile::create("s3cret").unwrap();
            path = secret.path().to_path_buf();
            assert_eq!(fs::read_to_string(&path).unwrap(), "s3cret");
        }
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_scoped_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let secret = ScopedSecretFile::create("s3cret").unwrap();
        let mode = fs::metadata(secret.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_scoped_file_deleted_on_error_path() {
        fn doomed(observed: &mut PathBuf) -> Result<()> {
            let secret = ScopedSecretFile::create("s3cret")?;
            *observed = secret.path().to_path_buf();
            Err(Error::SecretFile(std::io::Error::other("simulated")))
        }

        let mut path = PathBuf::new();
        assert!(doomed(&mut path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_acquire_file_plan_passes_path_through() {
        let plan = CredentialPlan::File(PathBuf::from("/keys/vault.txt"));
        let source = plan.acquire().unwrap().unwrap();
        assert_eq!(source.path(), Path::new("/keys/vault.txt"));
    }

    #[test]
    fn test_acquire_value_plan_materializes_and_cleans_up() {
        let plan = CredentialPlan::Value("hunter2".to_string());
        let path;
        {
            let source = plan.acquire().unwrap().unwrap();
            path = source.path().to_path_buf();
            assert_eq!(fs::read_to_string(&path).unwrap(), "hunter2");
        }
        assert!(!path.exists());

        // A second acquisition creates its own file.
        let second = plan.acquire().unwrap().unwrap();
        assert_ne!(second.path(), path.as_path());
    }

    #[test]
    fn test_acquire_none_plan() {
        assert!(CredentialPlan::None.acquire().unwrap().is_none());
    }
}
