//! The two independent id spaces.

use std::fmt;

use serde::{Deserialize, Serialize};

/// User ids or group ids. Each has its own record store and index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    /// Entries from passwd-style files.
    Users,
    /// Entries from group-style files.
    Groups,
}

impl Namespace {
    /// Both namespaces, users first.
    pub const ALL: [Self; 2] = [Self::Users, Self::Groups];

    /// Label used in diagnostics (`uids` / `gids`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Users => "uids",
            Self::Groups => "gids",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
