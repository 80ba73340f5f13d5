//! Loader and translation policies.

use serde::{Deserialize, Serialize};

/// What to do when an account file cannot be opened or read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFilePolicy {
    /// Treat the file as empty and record a diagnostic.
    #[default]
    Skip,
    /// Abort `read` with [`IdDbError::Unreadable`](crate::error::IdDbError::Unreadable).
    Fail,
}

/// How `transform` treats an id whose account has no entry in the new files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovedAccountPolicy {
    /// Return [`AccountId::INVALID`](crate::id::AccountId::INVALID).
    #[default]
    MapToInvalid,
    /// Return the id unchanged.
    PassThrough,
}

/// Configuration for an [`IdDb`](crate::db::IdDb).
///
/// Deserializable so a host tool can embed it in its own config file.
///
/// ```
/// use idremap::{IdDbConfig, MissingFilePolicy};
///
/// let config: IdDbConfig = serde_json::from_str(r#"{"missing_files":"fail"}"#).unwrap();
/// assert_eq!(config.missing_files, MissingFilePolicy::Fail);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdDbConfig {
    /// Policy for unreadable account files.
    pub missing_files: MissingFilePolicy,
    /// Policy for accounts absent from the new files.
    pub removed_accounts: RemovedAccountPolicy,
}

impl IdDbConfig {
    /// Builder-style setter for [`IdDbConfig::missing_files`].
    #[must_use]
    pub const fn with_missing_files(mut self, policy: MissingFilePolicy) -> Self {
        self.missing_files = policy;
        self
    }

    /// Builder-style setter for [`IdDbConfig::removed_accounts`].
    #[must_use]
    pub const fn with_removed_accounts(mut self, policy: RemovedAccountPolicy) -> Self {
        self.removed_accounts = policy;
        self
    }
}
