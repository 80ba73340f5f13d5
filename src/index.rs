//! Translation index.
//!
//! Maps original ids to records in a [`RecordStore`]. Built once after all
//! files for a namespace are loaded.

use std::collections::btree_map::{BTreeMap, Entry};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::id::AccountId;
use crate::namespace::Namespace;
use crate::store::{RecordIdx, RecordStore};

/// Original id → record position, without identity mappings.
///
/// Invariants after [`TranslationIndex::build`]:
/// - each key belongs to the first record (in store order) that claimed it;
/// - no entry has `original_id == new_id`;
/// - no key is [`AccountId::INVALID`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationIndex {
    entries: BTreeMap<AccountId, RecordIdx>,
    conflicts: usize,
    removed_unchanged: usize,
}

impl TranslationIndex {
    /// Builds the index for one namespace.
    ///
    /// Records are visited in store order. A record whose original id is
    /// already claimed is left out and reported as a
    /// [`Diagnostic::Conflict`]. Identity mappings are pruned afterwards and
    /// summarized in one [`Diagnostic::UnchangedRemoved`].
    pub fn build(store: &RecordStore, namespace: Namespace, diagnostics: &mut Diagnostics) -> Self {
        let mut entries: BTreeMap<AccountId, RecordIdx> = BTreeMap::new();
        let mut conflicts = 0;
        let mut never_original = 0;

        for (idx, record) in store.iter() {
            if !record.original_id.is_valid() {
                never_original += 1;
                continue;
            }
            match entries.entry(record.original_id) {
                Entry::Vacant(slot) => {
                    slot.insert(idx);
                }
                Entry::Occupied(existing) => {
                    conflicts += 1;
                    if let Some(retained) = store.get(*existing.get()) {
                        diagnostics.push(Diagnostic::Conflict {
                            namespace,
                            rejected: record.clone(),
                            retained: retained.clone(),
                        });
                    }
                }
            }
        }

        let before = entries.len();
        entries.retain(|_, idx| store.get(*idx).is_some_and(|r| !r.is_unchanged()));
        let removed_unchanged = before - entries.len();

        diagnostics.push(Diagnostic::UnchangedRemoved {
            namespace,
            count: removed_unchanged,
        });
        tracing::debug!(
            %namespace,
            mapped = entries.len(),
            conflicts,
            never_original,
            "built translation index"
        );

        Self {
            entries,
            conflicts,
            removed_unchanged,
        }
    }

    /// Looks up the record that owns `id`.
    #[must_use]
    pub fn get(&self, id: AccountId) -> Option<RecordIdx> {
        self.entries.get(&id).copied()
    }

    /// True if `id` will be remapped.
    #[must_use]
    pub fn contains(&self, id: AccountId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Iterates entries in ascending original-id order.
    pub fn iter(&self) -> impl Iterator<Item = (AccountId, RecordIdx)> + '_ {
        self.entries.iter().map(|(&id, &idx)| (id, idx))
    }

    /// Number of remapped ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is remapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records left out because their original id was already claimed.
    #[must_use]
    pub const fn conflicts(&self) -> usize {
        self.conflicts
    }

    /// Identity mappings pruned during the build.
    #[must_use]
    pub const fn removed_unchanged(&self) -> usize {
        self.removed_unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Pass;

    fn store_of(rows: &[(&str, Option<u32>, Option<u32>)]) -> RecordStore {
        let mut store = RecordStore::new();
        for &(name, orig, new) in rows {
            store.entry(name);
            if let Some(orig) = orig {
                store.assign(name, Pass::Original, AccountId::new(orig));
            }
            if let Some(new) = new {
                store.assign(name, Pass::New, AccountId::new(new));
            }
        }
        store
    }

    #[test]
    fn keeps_changed_and_prunes_unchanged() {
        let store = store_of(&[
            ("alice", Some(100), Some(200)),
            ("bob", Some(101), Some(101)),
        ]);
        let mut diags = Diagnostics::new();
        let index = TranslationIndex::build(&store, Namespace::Users, &mut diags);

        assert!(index.contains(AccountId::new(100)));
        assert!(!index.contains(AccountId::new(101)));
        assert_eq!(index.len(), 1);
        assert_eq!(index.removed_unchanged(), 1);
        assert_eq!(diags.render(), ["Removed 1 unchanged entries from uids"]);
    }

    #[test]
    fn first_record_wins_a_collision() {
        let store = store_of(&[
            ("dave", Some(400), Some(401)),
            ("erin", Some(400), Some(402)),
        ]);
        let mut diags = Diagnostics::new();
        let index = TranslationIndex::build(&store, Namespace::Users, &mut diags);

        let owner = index.get(AccountId::new(400)).and_then(|idx| store.get(idx));
        assert_eq!(owner.map(|r| r.name.as_str()), Some("dave"));
        assert_eq!(index.conflicts(), 1);
        assert_eq!(
            diags.render(),
            [
                "WARNING: Ignoring conflict of {erin, 400->402} with existing {dave, 400->401} in uids",
                "Removed 0 unchanged entries from uids",
            ]
        );
        // the loser is still in the store
        assert!(store.get_by_name("erin").is_some());
    }

    #[test]
    fn collision_with_unchanged_owner_leaves_id_unmapped() {
        let store = store_of(&[
            ("dave", Some(400), Some(400)),
            ("erin", Some(400), Some(402)),
        ]);
        let mut diags = Diagnostics::new();
        let index = TranslationIndex::build(&store, Namespace::Groups, &mut diags);

        assert!(index.is_empty());
        assert_eq!(index.conflicts(), 1);
        assert_eq!(index.removed_unchanged(), 1);
    }

    #[test]
    fn removed_accounts_stay_and_new_only_accounts_are_skipped() {
        let store = store_of(&[
            ("gone", Some(500), None),
            ("fresh", None, Some(600)),
            ("other_fresh", None, Some(601)),
        ]);
        let mut diags = Diagnostics::new();
        let index = TranslationIndex::build(&store, Namespace::Users, &mut diags);

        assert_eq!(index.len(), 1);
        assert!(index.contains(AccountId::new(500)));
        assert!(!index.contains(AccountId::INVALID));
        assert_eq!(diags.warning_count(), 0);
    }

    #[test]
    fn iterates_in_id_order() {
        let store = store_of(&[
            ("c", Some(30), Some(3)),
            ("a", Some(10), Some(1)),
            ("b", Some(20), Some(2)),
        ]);
        let index = TranslationIndex::build(&store, Namespace::Users, &mut Diagnostics::new());
        let keys: Vec<u32> = index.iter().map(|(id, _)| id.get()).collect();
        assert_eq!(keys, [10, 20, 30]);
    }
}
