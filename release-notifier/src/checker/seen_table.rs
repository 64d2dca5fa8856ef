//! Last-seen release tags.

use std::collections::HashMap;

/// The last release tag observed per repository.
///
/// Keys compare ASCII case-insensitively, matching how the forge treats
/// repository slugs. The checker is the sole writer; nothing is persisted,
/// so a restart re-primes the table and never replays old releases.
#[derive(Debug, Clone, Default)]
pub struct SeenTable {
    tags: HashMap<(String, String), String>,
}

impl SeenTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last tag recorded for a repository.
    #[must_use]
    pub fn last_seen(&self, owner: &str, name: &str) -> Option<&str> {
        self.tags.get(&Self::key(owner, name)).map(String::as_str)
    }

    /// Records the latest tag for a repository, replacing any previous one.
    pub fn record(&mut self, owner: &str, name: &str, tag: impl Into<String>) {
        self.tags.insert(Self::key(owner, name), tag.into());
    }

    /// Returns the number of repositories with a recorded tag.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns true when no tag has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    fn key(owner: &str, name: &str) -> (String, String) {
        (owner.to_ascii_lowercase(), name.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_recalls_tags() {
        let mut table = SeenTable::new();
        assert!(table.last_seen("foo", "bar").is_none());

        table.record("foo", "bar", "v1.0.0");
        assert_eq!(table.last_seen("foo", "bar"), Some("v1.0.0"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn recording_replaces_the_previous_tag() {
        let mut table = SeenTable::new();
        table.record("foo", "bar", "v1.0.0");
        table.record("foo", "bar", "v1.1.0");
        assert_eq!(table.last_seen("foo", "bar"), Some("v1.1.0"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn keys_are_case_insensitive() {
        let mut table = SeenTable::new();
        table.record("Foo", "Bar", "v1.0.0");
        assert_eq!(table.last_seen("foo", "bar"), Some("v1.0.0"));
        assert_eq!(table.last_seen("FOO", "BAR"), Some("v1.0.0"));

        table.record("fOO", "bAR", "v2.0.0");
        assert_eq!(table.last_seen("Foo", "Bar"), Some("v2.0.0"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn repositories_are_tracked_independently() {
        let mut table = SeenTable::new();
        table.record("foo", "bar", "v1.0.0");
        table.record("foo", "baz", "v9.0.0");
        assert_eq!(table.last_seen("foo", "bar"), Some("v1.0.0"));
        assert_eq!(table.last_seen("foo", "baz"), Some("v9.0.0"));
        assert_eq!(table.len(), 2);
    }
}
