//! Account file loader.
//!
//! Files are passwd/group shaped: one record per line, fields separated by
//! `:`, name in field 0 and numeric id in field 2. Everything else on the
//! line is ignored.
//!
//! Loading is permissive. Short lines are skipped, unparsable ids count as
//! absent, and a second id for the same name in the same pass is dropped
//! with a [`Diagnostic::DuplicateEntry`].

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::config::MissingFilePolicy;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::IdDbError;
use crate::id::AccountId;
use crate::namespace::Namespace;
use crate::record::Pass;
use crate::store::{Assignment, RecordStore};

const FIELD_SEPARATOR: char = ':';
const NAME_FIELD: usize = 0;
const ID_FIELD: usize = 2;

/// Counters for one loaded file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Lines read, including skipped ones.
    pub lines: usize,
    /// Ids written into a record.
    pub assigned: usize,
    /// Lines with fewer than three fields.
    pub skipped: usize,
    /// Lines whose id field did not parse.
    pub malformed_ids: usize,
    /// Ids dropped because the field was already set.
    pub duplicates: usize,
}

enum Line<'a> {
    Short,
    Record { name: &'a str, id: Option<AccountId> },
}

fn parse_line(line: &str) -> Line<'_> {
    let mut fields = line.split(FIELD_SEPARATOR);
    let name = fields.next();
    let id = fields.nth(ID_FIELD - NAME_FIELD - 1);
    match (name, id) {
        (Some(name), Some(id)) => Line::Record {
            name,
            id: AccountId::parse_field(id),
        },
        _ => Line::Short,
    }
}

fn decode(raw: &[u8]) -> Cow<'_, str> {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw)
}

/// Loads records from any buffered reader.
///
/// `label` names the source in diagnostics. Records parsed before a read
/// error stay in `store`.
///
/// # Errors
///
/// Returns the underlying I/O error if reading fails part way.
pub fn load_reader<R: BufRead>(
    reader: R,
    label: &str,
    store: &mut RecordStore,
    namespace: Namespace,
    pass: Pass,
    diagnostics: &mut Diagnostics,
) -> io::Result<LoadStats> {
    let mut stats = LoadStats::default();

    for (i, raw) in reader.split(b'\n').enumerate() {
        let raw = raw?;
        let line_number = i + 1;
        stats.lines = line_number;

        let text = decode(&raw);
        let Line::Record { name, id } = parse_line(&text) else {
            stats.skipped += 1;
            continue;
        };

        // An already-set field makes any further line a duplicate, whatever its id holds.
        let assignment = match id {
            Some(id) => store.assign(name, pass, id),
            None => {
                let idx = store.entry(name);
                match store.get(idx).map(|record| record.id(pass)) {
                    Some(existing) if existing.is_valid() => {
                        Assignment::Duplicate { idx, existing }
                    }
                    _ => {
                        stats.malformed_ids += 1;
                        continue;
                    }
                }
            }
        };

        match assignment {
            Assignment::Set(_) => stats.assigned += 1,
            Assignment::Duplicate { .. } => {
                stats.duplicates += 1;
                diagnostics.push(Diagnostic::DuplicateEntry {
                    namespace,
                    name: name.to_string(),
                    file: label.to_string(),
                    line: line_number,
                });
            }
        }
    }

    Ok(stats)
}

/// Opens `path` and loads it into `store`.
///
/// Under [`MissingFilePolicy::Skip`] an unreadable file is reported as a
/// [`Diagnostic::Unreadable`] and yields whatever was parsed before the
/// failure (usually nothing).
///
/// # Errors
///
/// Returns [`IdDbError::Unreadable`] under [`MissingFilePolicy::Fail`].
pub fn load_file(
    path: &Path,
    store: &mut RecordStore,
    namespace: Namespace,
    pass: Pass,
    policy: MissingFilePolicy,
    diagnostics: &mut Diagnostics,
) -> Result<LoadStats, IdDbError> {
    let label = path.display().to_string();
    let result = File::open(path).and_then(|file| {
        load_reader(
            BufReader::new(file),
            &label,
            store,
            namespace,
            pass,
            diagnostics,
        )
    });

    match result {
        Ok(stats) => {
            tracing::debug!(
                %namespace,
                file = %label,
                ?pass,
                lines = stats.lines,
                assigned = stats.assigned,
                skipped = stats.skipped,
                duplicates = stats.duplicates,
                "loaded account file"
            );
            Ok(stats)
        }
        Err(source) => match policy {
            MissingFilePolicy::Fail => Err(IdDbError::unreadable(path, source)),
            MissingFilePolicy::Skip => {
                diagnostics.push(Diagnostic::Unreadable {
                    namespace,
                    file: label,
                    reason: source.to_string(),
                });
                Ok(LoadStats::default())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str, store: &mut RecordStore, pass: Pass) -> (LoadStats, Diagnostics) {
        let mut diags = Diagnostics::new();
        let stats = load_reader(
            text.as_bytes(),
            "passwd",
            store,
            Namespace::Users,
            pass,
            &mut diags,
        )
        .unwrap();
        (stats, diags)
    }

    #[test]
    fn reads_name_and_third_field() {
        let mut store = RecordStore::new();
        let text = "root:x:0:0:root:/root:/bin/sh\nalice:x:100:100::/home/alice:/bin/sh\n";
        let (stats, diags) = load(text, &mut store, Pass::Original);

        assert_eq!(stats.lines, 2);
        assert_eq!(stats.assigned, 2);
        assert_eq!(stats.skipped, 0);
        assert!(diags.is_empty());
        assert_eq!(
            store.get_by_name("alice").map(|r| r.original_id),
            Some(AccountId::new(100))
        );
        assert_eq!(
            store.get_by_name("root").map(|r| r.original_id),
            Some(AccountId::new(0))
        );
    }

    #[test]
    fn group_format_uses_same_fields() {
        let mut store = RecordStore::new();
        let (stats, _) = load("wheel:x:10:alice,bob\nstaff:*:20:", &mut store, Pass::New);
        assert_eq!(stats.assigned, 2);
        assert_eq!(
            store.get_by_name("wheel").map(|r| r.new_id),
            Some(AccountId::new(10))
        );
        assert_eq!(
            store.get_by_name("staff").map(|r| r.original_id),
            Some(AccountId::INVALID)
        );
    }

    #[test]
    fn short_lines_are_skipped_silently() {
        let mut store = RecordStore::new();
        let (stats, diags) = load("justaname\nname:x\n\n# comment\n", &mut store, Pass::Original);
        assert_eq!(stats.lines, 4);
        assert_eq!(stats.skipped, 4);
        assert!(store.is_empty());
        assert!(diags.is_empty());
    }

    #[test]
    fn duplicate_in_same_pass_keeps_first_and_warns() {
        let mut store = RecordStore::new();
        let (stats, diags) = load("carol:x:300:\ncarol:x:301:\n", &mut store, Pass::Original);

        assert_eq!(stats.duplicates, 1);
        assert_eq!(
            store.get_by_name("carol").map(|r| r.original_id),
            Some(AccountId::new(300))
        );
        assert_eq!(
            diags.render(),
            ["WARNING: Ignoring duplicate entry for user carol at passwd:2"]
        );
    }

    #[test]
    fn malformed_id_counts_as_absent() {
        let mut store = RecordStore::new();
        let (stats, diags) = load("eve:x:notanumber:\neve:x:42:\n", &mut store, Pass::Original);

        assert_eq!(stats.malformed_ids, 1);
        assert_eq!(stats.assigned, 1);
        assert!(diags.is_empty());
        assert_eq!(
            store.get_by_name("eve").map(|r| r.original_id),
            Some(AccountId::new(42))
        );
    }

    #[test]
    fn unparsable_id_after_set_field_is_still_a_duplicate() {
        let mut store = RecordStore::new();
        let (stats, diags) = load(
            "carol:x:300:\ncarol:x:abc:\ncarol:x:\n",
            &mut store,
            Pass::Original,
        );

        assert_eq!(stats.assigned, 1);
        assert_eq!(stats.duplicates, 2);
        assert_eq!(stats.malformed_ids, 0);
        assert_eq!(
            store.get_by_name("carol").map(|r| r.original_id),
            Some(AccountId::new(300))
        );
        assert_eq!(
            diags.render(),
            [
                "WARNING: Ignoring duplicate entry for user carol at passwd:2",
                "WARNING: Ignoring duplicate entry for user carol at passwd:3",
            ]
        );
    }

    #[test]
    fn duplicate_in_new_pass_keeps_first() {
        let mut store = RecordStore::new();
        load("carol:x:300:\n", &mut store, Pass::Original);
        let (stats, diags) = load("carol:x:310:\ncarol:x:311:\n", &mut store, Pass::New);

        assert_eq!(stats.duplicates, 1);
        let carol = store.get_by_name("carol").unwrap();
        assert_eq!(carol.original_id, AccountId::new(300));
        assert_eq!(carol.new_id, AccountId::new(310));
        assert_eq!(
            diags.render(),
            ["WARNING: Ignoring duplicate entry for user carol at passwd:2"]
        );
    }

    #[test]
    fn crlf_and_invalid_utf8_are_tolerated() {
        let mut store = RecordStore::new();
        let mut diags = Diagnostics::new();
        let bytes: &[u8] = b"fr\xe9d:x:7\r\nbob:x:8\r\n";
        let stats = load_reader(
            bytes,
            "group",
            &mut store,
            Namespace::Groups,
            Pass::Original,
            &mut diags,
        )
        .unwrap();

        assert_eq!(stats.assigned, 2);
        assert_eq!(
            store.get_by_name("bob").map(|r| r.original_id),
            Some(AccountId::new(8))
        );
        assert!(store.get_by_name("fr\u{fffd}d").is_some());
    }

    #[test]
    fn missing_file_policy_controls_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist");
        let mut store = RecordStore::new();
        let mut diags = Diagnostics::new();

        let stats = load_file(
            &path,
            &mut store,
            Namespace::Users,
            Pass::Original,
            MissingFilePolicy::Skip,
            &mut diags,
        )
        .unwrap();
        assert_eq!(stats, LoadStats::default());
        assert!(matches!(
            diags.iter().next(),
            Some(Diagnostic::Unreadable { .. })
        ));

        let err = load_file(
            &path,
            &mut store,
            Namespace::Users,
            Pass::Original,
            MissingFilePolicy::Fail,
            &mut diags,
        )
        .unwrap_err();
        assert!(err.is_unreadable());
    }
}
