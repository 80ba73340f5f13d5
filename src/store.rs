//! Record store.
//!
//! Records live in an insertion-ordered arena and are addressed by
//! [`RecordIdx`]. A name map gives O(1) lookup on every parsed line while
//! the arena order keeps index building deterministic.

use std::collections::HashMap;

use crate::id::AccountId;
use crate::record::{AccountRecord, Pass};

/// Stable position of a record inside a [`RecordStore`].
///
/// Records are never removed, so an index stays valid for the lifetime of
/// the store that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordIdx(usize);

impl RecordIdx {
    /// Returns the arena position.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0
    }
}

/// Outcome of [`RecordStore::assign`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// The field was empty and now holds the id.
    Set(RecordIdx),
    /// The field was already set; it keeps `existing`.
    Duplicate {
        /// Record that was addressed.
        idx: RecordIdx,
        /// Value that stays in place.
        existing: AccountId,
    },
}

/// Name-keyed, insertion-ordered collection of account records.
#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    records: Vec<AccountRecord>,
    by_name: HashMap<String, RecordIdx>,
}

impl RecordStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record for `name`, appending a fresh one on first sight.
    pub fn entry(&mut self, name: &str) -> RecordIdx {
        if let Some(idx) = self.by_name.get(name) {
            return *idx;
        }
        let idx = RecordIdx(self.records.len());
        self.records.push(AccountRecord::new(name));
        self.by_name.insert(name.to_string(), idx);
        idx
    }

    /// Writes `id` into the `pass` field of `name`'s record, first writer wins.
    pub fn assign(&mut self, name: &str, pass: Pass, id: AccountId) -> Assignment {
        let idx = self.entry(name);
        let record = &mut self.records[idx.0];
        if record.assign(pass, id) {
            Assignment::Set(idx)
        } else {
            Assignment::Duplicate {
                idx,
                existing: record.id(pass),
            }
        }
    }

    /// Gets a record by position.
    #[must_use]
    pub fn get(&self, idx: RecordIdx) -> Option<&AccountRecord> {
        self.records.get(idx.0)
    }

    /// Finds a record by account name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&AccountRecord> {
        self.by_name.get(name).and_then(|idx| self.get(*idx))
    }

    /// Iterates records in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (RecordIdx, &AccountRecord)> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| (RecordIdx(i), record))
    }

    /// Number of distinct names seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no names have been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
