//! Error types for Ansible toolchain operations.
//!
//! Errors are categorized so callers can tell a failed subprocess apart
//! from undecodable output and from local resource problems. Each variant
//! carries the raw context (exit code, captured streams) so diagnosis is
//! always possible without re-running the command.

use thiserror::Error;

/// Categories of toolchain errors.
///
/// The category determines how a caller should react: execution failures
/// are structured, recoverable results; parse failures suggest a toolchain
/// version or plugin mismatch; resource failures abort the enclosing
/// operation because proceeding would produce an invalid command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The external process exited non-zero
    Execution,
    /// Expected JSON or marker text was absent from otherwise-successful output
    Parse,
    /// A local resource (secret temp file) could not be created
    Resource,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Whether the raw subprocess output is available for diagnosis.
    pub fn carries_output(&self) -> bool {
        matches!(self, Self::Execution | Self::Parse)
    }

    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Execution => "Toolchain command failed",
            Self::Parse => "Toolchain output could not be decoded",
            Self::Resource => "Local resource unavailable",
            Self::Other => "Unexpected error",
        }
    }
}

/// Errors that can occur while driving the Ansible CLI toolchain.
#[derive(Debug, Error)]
pub enum Error {
    /// The command ran but exited non-zero, and the operation has no
    /// meaningful partial result (e.g. inventory listing).
    #[error("command failed with exit code {rc}: {command}")]
    CommandFailed {
        /// Rendered command line that was executed
        command: String,
        /// Exit code reported by the process
        rc: i32,
        /// Captured standard output
        stdout: String,
        /// Captured standard error
        stderr: String,
    },

    /// The toolchain binary could not be started at all.
    #[error("failed to spawn {command}: {source}")]
    Spawn {
        /// Rendered command line that failed to start
        command: String,
        /// Underlying OS error
        source: std::io::Error,
    },

    /// The command exited zero but its stdout was not the JSON document
    /// the operation expected.
    #[error("inventory output is not valid JSON: {source}")]
    InventoryParse {
        /// Raw stdout kept for diagnosis
        stdout: String,
        /// Decode error from the JSON parser
        source: serde_json::Error,
    },

    /// A scoped secret file could not be created.
    #[error("failed to create secret file: {0}")]
    SecretFile(std::io::Error),
}

impl Error {
    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::CommandFailed { .. } => ErrorCategory::Execution,
            Error::InventoryParse { .. } => ErrorCategory::Parse,
            Error::SecretFile(_) => ErrorCategory::Resource,
            Error::Spawn { .. } => ErrorCategory::Other,
        }
    }

    /// Raw stdout captured from the toolchain, when this error carries it.
    pub fn stdout(&self) -> Option<&str> {
        match self {
            Error::CommandFailed { stdout, .. } => Some(stdout),
            Error::InventoryParse { stdout, .. } => Some(stdout),
            _ => None,
        }
    }
}

/// Result type for toolchain operations.
pub type Result<T> = std::result::Result<T, Error>;
