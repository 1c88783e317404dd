//! Attendee identity normalization.
//!
//! People register under slightly different names across events ("Jon Doe"
//! one month, "John Doe" the next). An [`AliasMap`] maps every observed
//! variant onto one canonical name, which is then used for display and for
//! grouping attendance.

use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Maps raw attendee names to their canonical spelling.
///
/// Stored as a plain JSON object on disk:
/// ```json
/// {
///   "Jon Doe": "John Doe",
///   "J. Doe": "John Doe"
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    entries: HashMap<String, String>,
}

impl AliasMap {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Loads the alias map from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let entries: HashMap<String, String> = serde_json::from_str(&content)?;
        Ok(Self { entries })
    }

    /// Like [`AliasMap::load`], but a missing or unreadable file yields an
    /// empty map. Aliases are optional, so this never fails the run.
    pub fn load_or_empty(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "No alias file, using empty alias map");
            return Self::default();
        }

        match Self::load(path) {
            Ok(map) => {
                info!(path = %path.display(), aliases = map.len(), "Alias map loaded");
                map
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring malformed alias file");
                Self::default()
            }
        }
    }

    /// Returns the canonical name for `raw_full_name`.
    ///
    /// Exact match only, and never chained: the canonical value is not
    /// looked up again.
    pub fn normalize<'a>(&'a self, raw_full_name: &'a str) -> &'a str {
        self.entries
            .get(raw_full_name)
            .map(String::as_str)
            .unwrap_or(raw_full_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for AliasMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Joins first and last name the way aliases are keyed: `"{first} {last}"`.
pub fn full_name(first: &str, last: &str) -> String {
    format!("{first} {last}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn aliases(pairs: &[(&str, &str)]) -> AliasMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_normalize_maps_known_alias() {
        let map = aliases(&[("Jon Doe", "John Doe")]);
        assert_eq!(map.normalize("Jon Doe"), "John Doe");
    }

    #[test]
    fn test_normalize_passes_through_unknown_name() {
        let map = aliases(&[("Jon Doe", "John Doe")]);
        assert_eq!(map.normalize("Alice Smith"), "Alice Smith");
    }

    #[test]
    fn test_normalize_is_exact_match() {
        let map = aliases(&[("Jon Doe", "John Doe")]);
        assert_eq!(map.normalize("jon doe"), "jon doe");
        assert_eq!(map.normalize("Jon  Doe"), "Jon  Doe");
        assert_eq!(map.normalize(" Jon Doe"), " Jon Doe");
    }

    #[test]
    fn test_normalize_does_not_chain() {
        let map = aliases(&[("A", "B"), ("B", "C")]);
        assert_eq!(map.normalize("A"), "B");
        assert_eq!(map.normalize(map.normalize("A")), "C");
    }

    #[test]
    fn test_full_name_joins_with_single_space() {
        assert_eq!(full_name("Jon", "Doe"), "Jon Doe");
        assert_eq!(full_name("Jon", ""), "Jon ");
    }

    #[test]
    fn test_load_or_empty_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let map = AliasMap::load_or_empty(&dir.path().join("aliases.json"));
        assert!(map.is_empty());
    }

    #[test]
    fn test_load_or_empty_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let map = AliasMap::load_or_empty(file.path());
        assert!(map.is_empty());
    }

    #[test]
    fn test_load_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Jon Doe": "John Doe"}}"#).unwrap();

        let map = AliasMap::load(file.path()).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.normalize("Jon Doe"), "John Doe");
    }
}
