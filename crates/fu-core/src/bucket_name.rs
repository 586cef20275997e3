//! Strongly-typed bucket basename wrapper.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::path::Path;

/// Basename of a bucket file (`20200101_init.sql`).
///
/// This is the key the ledger matches against and the sort key that fixes
/// apply order, so two buckets with the same basename cannot coexist in one
/// discovery pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketName(String);

impl BucketName {
    /// Try to create a new `BucketName`, returning `None` if the name is empty.
    pub fn try_new(name: impl Into<String>) -> Option<Self> {
        let s = name.into();
        if s.is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    /// Take the final component of `path`.
    ///
    /// Returns `None` for paths without a UTF-8 file name (`/`, `..`).
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_name()
            .and_then(|n| n.to_str())
            .and_then(Self::try_new)
    }

    /// Basename of a script identifier as stored in the ledger.
    ///
    /// Ledger rows may hold a full path or a bare basename; both reduce to
    /// the same key here.
    pub fn of_script(script: &str) -> Option<Self> {
        Self::from_path(Path::new(script))
    }

    /// Return the underlying name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for BucketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BucketName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for BucketName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for BucketName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for BucketName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for BucketName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_from_path_takes_file_name() {
        let name = BucketName::from_path(&PathBuf::from("/srv/migrations/20200101_init.sql"));
        assert_eq!(name.unwrap(), "20200101_init.sql");
    }

    #[test]
    fn test_from_path_rejects_root() {
        assert!(BucketName::from_path(Path::new("/")).is_none());
    }

    #[test]
    fn test_of_script_accepts_bare_basename() {
        assert_eq!(
            BucketName::of_script("20200101_init.sql"),
            BucketName::of_script("/other/root/20200101_init.sql")
        );
    }

    #[test]
    fn test_try_new_empty() {
        assert!(BucketName::try_new("").is_none());
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let a = BucketName::try_new("20200101_init").unwrap();
        let b = BucketName::try_new("20200202_addcol").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_borrow_lookup() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(BucketName::try_new("x.sql").unwrap());
        assert!(set.contains("x.sql"));
    }
}
