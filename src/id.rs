//! Numeric account identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A numeric user or group identifier.
///
/// The all-ones value is reserved as [`AccountId::INVALID`], meaning "no id
/// assigned yet". It renders as its raw number so diagnostics show exactly
/// what is stored.
///
/// # Examples
///
/// ```
/// use idremap::AccountId;
///
/// let id = AccountId::new(1000);
/// assert!(id.is_valid());
/// assert!(!AccountId::INVALID.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(u32);

impl AccountId {
    /// Sentinel for "never set".
    pub const INVALID: Self = Self(u32::MAX);

    /// Wraps a raw id.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns true unless this is the sentinel.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }

    /// Parses the id field of an account record.
    ///
    /// Surrounding whitespace is ignored. Anything that is not a base-10
    /// `u32` (empty, negative, overflowing, trailing junk) yields `None`,
    /// as does the sentinel value itself.
    ///
    /// The whole field must be numeric. Stream-style prefix parsing would
    /// read `"12x"` as 12; here it is rejected.
    ///
    /// ```
    /// use idremap::AccountId;
    ///
    /// assert_eq!(AccountId::parse_field(" 100 "), Some(AccountId::new(100)));
    /// assert_eq!(AccountId::parse_field("abc"), None);
    /// ```
    #[must_use]
    pub fn parse_field(field: &str) -> Option<Self> {
        field
            .trim()
            .parse::<u32>()
            .ok()
            .map(Self)
            .filter(|id| id.is_valid())
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for AccountId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<AccountId> for u32 {
    fn from(id: AccountId) -> Self {
        id.0
    }
}
