//! Structured diagnostics.
//!
//! Loading and index building never fail on bad input; they report what
//! they ignored here instead. Every diagnostic is kept in a [`Diagnostics`]
//! collector for the caller and mirrored to `tracing`, so a host that
//! installs a subscriber sees the same lines on its log stream.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::namespace::Namespace;
use crate::record::AccountRecord;

/// Something the loader or index builder ignored or summarized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A second id for a name in the same file pass was dropped.
    DuplicateEntry {
        /// Namespace being loaded.
        namespace: Namespace,
        /// Account name.
        name: String,
        /// File (or reader label) the line came from.
        file: String,
        /// 1-based line number.
        line: usize,
    },

    /// Two records share an original id; the later one was left out of the index.
    Conflict {
        /// Namespace being indexed.
        namespace: Namespace,
        /// Record kept out of the index.
        rejected: AccountRecord,
        /// Record that owns the id.
        retained: AccountRecord,
    },

    /// Identity mappings pruned from an index.
    UnchangedRemoved {
        /// Namespace being indexed.
        namespace: Namespace,
        /// Entries removed.
        count: usize,
    },

    /// An account file could not be read and contributed no records.
    Unreadable {
        /// Namespace being loaded.
        namespace: Namespace,
        /// File that failed.
        file: String,
        /// I/O error text.
        reason: String,
    },
}

impl Diagnostic {
    /// True for everything except the pruning summary.
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        !matches!(self, Self::UnchangedRemoved { .. })
    }

    /// Namespace the diagnostic belongs to.
    #[must_use]
    pub const fn namespace(&self) -> Namespace {
        match self {
            Self::DuplicateEntry { namespace, .. }
            | Self::Conflict { namespace, .. }
            | Self::UnchangedRemoved { namespace, .. }
            | Self::Unreadable { namespace, .. } => *namespace,
        }
    }

    fn emit(&self) {
        match self {
            Self::DuplicateEntry {
                namespace,
                name,
                file,
                line,
            } => tracing::warn!(%namespace, name = %name, file = %file, line = *line, "{self}"),
            Self::Conflict {
                namespace,
                rejected,
                retained,
            } => tracing::warn!(
                %namespace,
                rejected = %rejected,
                retained = %retained,
                "{self}"
            ),
            Self::UnchangedRemoved { namespace, count } => {
                tracing::info!(%namespace, count = *count, "{self}");
            }
            Self::Unreadable {
                namespace,
                file,
                reason,
            } => tracing::warn!(%namespace, file = %file, reason = %reason, "{self}"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateEntry { name, file, line, .. } => write!(
                f,
                "WARNING: Ignoring duplicate entry for user {name} at {file}:{line}"
            ),
            Self::Conflict {
                namespace,
                rejected,
                retained,
            } => write!(
                f,
                "WARNING: Ignoring conflict of {rejected} with existing {retained} in {namespace}"
            ),
            Self::UnchangedRemoved { namespace, count } => {
                write!(f, "Removed {count} unchanged entries from {namespace}")
            }
            Self::Unreadable { file, reason, .. } => {
                write!(f, "WARNING: Unable to read {file}: {reason}")
            }
        }
    }
}

/// Ordered collection of diagnostics.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic and logs it.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        diagnostic.emit();
        self.entries.push(diagnostic);
    }

    /// Iterates in the order diagnostics were raised.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Number of recorded diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of warnings (excludes summaries).
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.entries.iter().filter(|d| d.is_warning()).count()
    }

    /// Renders every diagnostic as one line, the way a host would print them.
    #[must_use]
    pub fn render(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
