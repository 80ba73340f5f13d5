//! Serializable summaries of built translation tables.
//!
//! Hosts use these for dry runs ("what would be rewritten") and for
//! logging a machine-readable record of the mapping that was applied.

use serde::{Deserialize, Serialize};

use crate::error::IdDbError;
use crate::id::AccountId;
use crate::index::TranslationIndex;
use crate::namespace::Namespace;
use crate::store::RecordStore;

/// One remapped id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Account name that carried the id.
    pub name: String,
    /// Id in the original files.
    pub original_id: AccountId,
    /// Id in the new files; `None` if the account was removed.
    pub new_id: Option<AccountId>,
}

/// Summary of one namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceReport {
    /// Namespace covered.
    pub namespace: Namespace,
    /// Distinct account names seen.
    pub records: usize,
    /// Remapped ids in ascending original-id order.
    pub mappings: Vec<MappingEntry>,
    /// Records left out of the index by an id collision.
    pub conflicts: usize,
    /// Identity mappings pruned.
    pub removed_unchanged: usize,
}

impl NamespaceReport {
    pub(crate) fn from_table(
        namespace: Namespace,
        store: &RecordStore,
        index: &TranslationIndex,
    ) -> Self {
        let mappings = index
            .iter()
            .filter_map(|(original_id, idx)| {
                let record = store.get(idx)?;
                Some(MappingEntry {
                    name: record.name.clone(),
                    original_id,
                    new_id: record.new_id.is_valid().then_some(record.new_id),
                })
            })
            .collect();

        Self {
            namespace,
            records: store.len(),
            mappings,
            conflicts: index.conflicts(),
            removed_unchanged: index.removed_unchanged(),
        }
    }
}

/// Summary of both namespaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationReport {
    /// User id table.
    pub users: NamespaceReport,
    /// Group id table.
    pub groups: NamespaceReport,
    /// Warnings raised while building.
    pub warnings: usize,
}

/// Serialize a report to pretty JSON.
///
/// # Errors
///
/// Returns [`IdDbError::Serialization`] if serde fails.
pub fn to_json_pretty(report: &TranslationReport) -> Result<String, IdDbError> {
    serde_json::to_string_pretty(report).map_err(|e| IdDbError::Serialization {
        message: format!("serialize report: {e}"),
    })
}

/// Deserialize a report from JSON.
///
/// # Errors
///
/// Returns [`IdDbError::Serialization`] if the input is not a report.
pub fn from_json(s: &str) -> Result<TranslationReport, IdDbError> {
    serde_json::from_str(s).map_err(|e| IdDbError::Serialization {
        message: format!("deserialize report: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::record::Pass;

    #[test]
    fn report_lists_mappings_and_removed_accounts() {
        let mut store = RecordStore::new();
        store.assign("zed", Pass::Original, AccountId::new(30));
        store.assign("zed", Pass::New, AccountId::new(31));
        store.assign("amy", Pass::Original, AccountId::new(10));
        store.assign("same", Pass::Original, AccountId::new(20));
        store.assign("same", Pass::New, AccountId::new(20));
        let index = TranslationIndex::build(&store, Namespace::Users, &mut Diagnostics::new());

        let report = NamespaceReport::from_table(Namespace::Users, &store, &index);
        assert_eq!(report.records, 3);
        assert_eq!(report.removed_unchanged, 1);
        assert_eq!(
            report.mappings,
            [
                MappingEntry {
                    name: "amy".to_string(),
                    original_id: AccountId::new(10),
                    new_id: None,
                },
                MappingEntry {
                    name: "zed".to_string(),
                    original_id: AccountId::new(30),
                    new_id: Some(AccountId::new(31)),
                },
            ]
        );
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let err = from_json("{").unwrap_err();
        assert!(matches!(err, IdDbError::Serialization { .. }));
    }
}
