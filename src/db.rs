//! The id database facade.
//!
//! [`IdDb`] owns one record store and one translation index per
//! namespace. [`IdDb::read`] runs the four file loads in a fixed order and
//! only then builds both indexes, since a record's new id is not final
//! until the new files have been read.

use std::path::Path;

use crate::config::IdDbConfig;
use crate::diagnostics::Diagnostics;
use crate::error::IdDbError;
use crate::id::AccountId;
use crate::index::TranslationIndex;
use crate::loader::load_file;
use crate::namespace::Namespace;
use crate::record::Pass;
use crate::report::{NamespaceReport, TranslationReport};
use crate::store::RecordStore;
use crate::translate::{lookup, Translation};

/// Records and index for one namespace.
#[derive(Debug, Clone)]
pub struct NamespaceTable {
    namespace: Namespace,
    store: RecordStore,
    index: TranslationIndex,
}

impl NamespaceTable {
    fn empty(namespace: Namespace) -> Self {
        Self {
            namespace,
            store: RecordStore::new(),
            index: TranslationIndex::default(),
        }
    }

    /// Namespace this table covers.
    #[must_use]
    pub const fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Every record seen, including ones that lost an id collision.
    #[must_use]
    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    /// The built index.
    #[must_use]
    pub const fn index(&self) -> &TranslationIndex {
        &self.index
    }

    /// Classifies `id` against this namespace.
    #[must_use]
    pub fn lookup(&self, id: AccountId) -> Translation {
        lookup(id, &self.index, &self.store)
    }

    fn report(&self) -> NamespaceReport {
        NamespaceReport::from_table(self.namespace, &self.store, &self.index)
    }
}

/// Uid/gid translation tables built from two snapshots of account files.
///
/// # Examples
///
/// ```no_run
/// use idremap::{AccountId, IdDb};
///
/// let mut db = IdDb::new();
/// db.read("old/passwd", "new/passwd", "old/group", "new/group")?;
/// let uid = db.transform_uid(AccountId::new(1000));
/// # Ok::<(), idremap::IdDbError>(())
/// ```
#[derive(Debug, Clone)]
pub struct IdDb {
    config: IdDbConfig,
    users: NamespaceTable,
    groups: NamespaceTable,
    diagnostics: Diagnostics,
}

impl Default for IdDb {
    fn default() -> Self {
        Self::with_config(IdDbConfig::default())
    }
}

impl IdDb {
    /// Creates an empty database with default policies.
    ///
    /// Until [`IdDb::read`] succeeds every id passes through unchanged.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty database with the given policies.
    #[must_use]
    pub fn with_config(config: IdDbConfig) -> Self {
        Self {
            config,
            users: NamespaceTable::empty(Namespace::Users),
            groups: NamespaceTable::empty(Namespace::Groups),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Loads all four account files and builds both indexes.
    ///
    /// Files are read in the order original users, original groups, new
    /// users, new groups. Anything from a previous `read` is discarded.
    ///
    /// # Errors
    ///
    /// Only under [`MissingFilePolicy::Fail`](crate::config::MissingFilePolicy::Fail):
    /// returns [`IdDbError::Unreadable`] for the first file that could not be
    /// read, leaving the database as it was.
    pub fn read(
        &mut self,
        orig_users: impl AsRef<Path>,
        new_users: impl AsRef<Path>,
        orig_groups: impl AsRef<Path>,
        new_groups: impl AsRef<Path>,
    ) -> Result<(), IdDbError> {
        let policy = self.config.missing_files;
        let mut users = RecordStore::new();
        let mut groups = RecordStore::new();
        let mut diagnostics = Diagnostics::new();

        let passes = [
            (orig_users.as_ref(), Namespace::Users, Pass::Original),
            (orig_groups.as_ref(), Namespace::Groups, Pass::Original),
            (new_users.as_ref(), Namespace::Users, Pass::New),
            (new_groups.as_ref(), Namespace::Groups, Pass::New),
        ];
        for (path, namespace, pass) in passes {
            let store = match namespace {
                Namespace::Users => &mut users,
                Namespace::Groups => &mut groups,
            };
            load_file(path, store, namespace, pass, policy, &mut diagnostics)?;
        }

        let uid_index = TranslationIndex::build(&users, Namespace::Users, &mut diagnostics);
        let gid_index = TranslationIndex::build(&groups, Namespace::Groups, &mut diagnostics);

        tracing::info!(
            users = users.len(),
            groups = groups.len(),
            uid_mappings = uid_index.len(),
            gid_mappings = gid_index.len(),
            warnings = diagnostics.warning_count(),
            "id database loaded"
        );

        self.users = NamespaceTable {
            namespace: Namespace::Users,
            store: users,
            index: uid_index,
        };
        self.groups = NamespaceTable {
            namespace: Namespace::Groups,
            store: groups,
            index: gid_index,
        };
        self.diagnostics = diagnostics;
        Ok(())
    }

    /// Translates a user id. Unmapped ids pass through unchanged.
    #[must_use]
    pub fn transform_uid(&self, id: AccountId) -> AccountId {
        self.transform(Namespace::Users, id)
    }

    /// Translates a group id. Unmapped ids pass through unchanged.
    #[must_use]
    pub fn transform_gid(&self, id: AccountId) -> AccountId {
        self.transform(Namespace::Groups, id)
    }

    /// Translates an id in `namespace`, applying the configured
    /// [`RemovedAccountPolicy`](crate::config::RemovedAccountPolicy).
    #[must_use]
    pub fn transform(&self, namespace: Namespace, id: AccountId) -> AccountId {
        self.table(namespace)
            .lookup(id)
            .resolve(id, self.config.removed_accounts)
    }

    /// Classifies a user id.
    #[must_use]
    pub fn lookup_uid(&self, id: AccountId) -> Translation {
        self.users.lookup(id)
    }

    /// Classifies a group id.
    #[must_use]
    pub fn lookup_gid(&self, id: AccountId) -> Translation {
        self.groups.lookup(id)
    }

    /// Table for `namespace`.
    #[must_use]
    pub const fn table(&self, namespace: Namespace) -> &NamespaceTable {
        match namespace {
            Namespace::Users => &self.users,
            Namespace::Groups => &self.groups,
        }
    }

    /// Diagnostics from the last successful [`IdDb::read`].
    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Policies in effect.
    #[must_use]
    pub const fn config(&self) -> &IdDbConfig {
        &self.config
    }

    /// Summarizes both tables.
    #[must_use]
    pub fn report(&self) -> TranslationReport {
        TranslationReport {
            users: self.users.report(),
            groups: self.groups.report(),
            warnings: self.diagnostics.warning_count(),
        }
    }
}
