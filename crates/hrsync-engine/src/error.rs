//! Run-level errors.
//!
//! Only failures that make every later record write meaningless are errors
//! here. Per-record failures end up as [`hrsync_core::SyncOutcome::Failed`]
//! lines in the result, and a deadline cut-off is reported through
//! [`hrsync_core::SyncResult::timed_out`].

use hrsync_core::DirectoryError;
use thiserror::Error;

use crate::config::ConfigError;

/// A step of the schema bootstrap that precedes enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapStep {
    /// The cross-reference custom field on the employee doctype.
    CustomField,
    /// The default role profile assigned to provisioned login users.
    RoleProfile,
}

impl std::fmt::Display for BootstrapStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CustomField => f.write_str("custom field"),
            Self::RoleProfile => f.write_str("role profile"),
        }
    }
}

/// Errors that abort a whole run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Required schema could not be ensured on the HR side.
    #[error("bootstrap failed ({step}): {source}")]
    Bootstrap {
        step: BootstrapStep,
        source: DirectoryError,
    },

    /// The source directory could not be enumerated.
    #[error("enumerating {directory} failed: {source}")]
    Enumeration {
        directory: String,
        source: DirectoryError,
    },

    /// The run configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
