//! Account records correlated by name.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::AccountId;

/// Which file a line came from, and so which id field it fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    /// The "before" snapshot; fills `original_id`.
    Original,
    /// The "after" snapshot; fills `new_id`.
    New,
}

/// One account, as seen in the original and the new files.
///
/// Each id field is written at most once. Later attempts are rejected by
/// [`AccountRecord::assign`] and the first value stays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Account name; unique within a namespace.
    pub name: String,
    /// Id from the original file, or INVALID.
    pub original_id: AccountId,
    /// Id from the new file, or INVALID.
    pub new_id: AccountId,
}

impl AccountRecord {
    /// Creates a record with both ids unset.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            original_id: AccountId::INVALID,
            new_id: AccountId::INVALID,
        }
    }

    /// Returns the id field filled by `pass`.
    #[must_use]
    pub const fn id(&self, pass: Pass) -> AccountId {
        match pass {
            Pass::Original => self.original_id,
            Pass::New => self.new_id,
        }
    }

    /// Sets the field for `pass` if it is still unset.
    ///
    /// Returns `false`, leaving the record untouched, when the field already
    /// holds a value.
    pub fn assign(&mut self, pass: Pass, id: AccountId) -> bool {
        let slot = match pass {
            Pass::Original => &mut self.original_id,
            Pass::New => &mut self.new_id,
        };
        if slot.is_valid() {
            return false;
        }
        *slot = id;
        true
    }

    /// True when both ids are equal, i.e. the mapping carries no information.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.original_id == self.new_id
    }
}

impl fmt::Display for AccountRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}->{}}}", self.name, self.original_id, self.new_id)
    }
}
