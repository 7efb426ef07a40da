//! `/DecodeParms` dictionaries.
//!
//! The object layer resolves a stream's parameter dictionary and hands each
//! filter the integer entries it may need. Absent keys take the filter's
//! defaults.

use std::collections::HashMap;

/// Well-known parameter keys.
pub mod keys {
    /// `/Predictor`
    pub const PREDICTOR: &str = "Predictor";
    /// `/Colors`
    pub const COLORS: &str = "Colors";
    /// `/BitsPerComponent`
    pub const BITS_PER_COMPONENT: &str = "BitsPerComponent";
    /// `/Columns`
    pub const COLUMNS: &str = "Columns";
    /// `/EarlyChange`
    pub const EARLY_CHANGE: &str = "EarlyChange";
}

/// A decode parameter dictionary (key to integer).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeParms {
    entries: HashMap<String, i64>,
}

impl DecodeParms {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl AsRef<str>, value: i64) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace an entry. A leading `/` on the key is ignored.
    pub fn insert(&mut self, key: impl AsRef<str>, value: i64) -> Option<i64> {
        self.entries.insert(normalize(key.as_ref()).to_owned(), value)
    }

    /// Look up an entry.
    pub fn get(&self, key: &str) -> Option<i64> {
        self.entries.get(normalize(key)).copied()
    }

    /// Look up an entry, falling back to `default` when absent.
    pub fn get_or(&self, key: &str, default: i64) -> i64 {
        self.get(key).unwrap_or(default)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: AsRef<str>> FromIterator<(K, i64)> for DecodeParms {
    fn from_iter<I: IntoIterator<Item = (K, i64)>>(iter: I) -> Self {
        let mut parms = Self::new();
        for (key, value) in iter {
            parms.insert(key, value);
        }
        parms
    }
}

fn normalize(key: &str) -> &str {
    key.strip_prefix('/').unwrap_or(key)
}
