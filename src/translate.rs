//! Id translation.
//!
//! Lookups never fail: an id with no index entry is an unchanged id and is
//! passed through as is.

use serde::{Deserialize, Serialize};

use crate::config::RemovedAccountPolicy;
use crate::id::AccountId;
use crate::index::TranslationIndex;
use crate::store::RecordStore;

/// Classified result of looking an id up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Translation {
    /// No mapping; the id keeps its value.
    Unchanged,
    /// The id maps to a different value.
    Remapped(AccountId),
    /// The account exists in the original files but not in the new ones.
    Removed,
}

impl Translation {
    /// Resolves to a concrete id for `id` under `policy`.
    #[must_use]
    pub const fn resolve(self, id: AccountId, policy: RemovedAccountPolicy) -> AccountId {
        match (self, policy) {
            (Self::Unchanged, _) | (Self::Removed, RemovedAccountPolicy::PassThrough) => id,
            (Self::Remapped(new), _) => new,
            (Self::Removed, RemovedAccountPolicy::MapToInvalid) => AccountId::INVALID,
        }
    }
}

/// Classifies `id` against `index`.
#[must_use]
pub fn lookup(id: AccountId, index: &TranslationIndex, store: &RecordStore) -> Translation {
    match index.get(id).and_then(|idx| store.get(idx)) {
        None => Translation::Unchanged,
        Some(record) if record.new_id.is_valid() => Translation::Remapped(record.new_id),
        Some(_) => Translation::Removed,
    }
}

/// Returns the new id for `id`, or `id` itself when it has no mapping.
///
/// Removed accounts map to [`AccountId::INVALID`].
#[must_use]
pub fn transform(id: AccountId, index: &TranslationIndex, store: &RecordStore) -> AccountId {
    lookup(id, index, store).resolve(id, RemovedAccountPolicy::MapToInvalid)
}
