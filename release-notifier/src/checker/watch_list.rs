//! Watch list parsing.

use std::collections::HashSet;

use tracing::{debug, error};

/// A repository coordinate from the watch list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedRepo {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl WatchedRepo {
    /// Returns the `owner/name` form used in logs.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// An ordered, de-duplicated list of repositories to poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchList {
    repos: Vec<WatchedRepo>,
}

impl WatchList {
    /// Parses raw `owner/name` entries.
    ///
    /// Entries are trimmed and must contain exactly one `/` with non-empty
    /// halves. Invalid entries are logged as errors and skipped rather than
    /// failing startup, so one typo cannot take down the watch on every
    /// other repository. Duplicates compare ASCII case-insensitively and
    /// keep the first occurrence.
    pub fn parse<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keys = HashSet::new();
        let mut repos = Vec::new();
        for entry in entries {
            let entry = entry.as_ref().trim();
            let parts = entry
                .split_once('/')
                .map(|(owner, name)| (owner.trim(), name.trim()))
                .filter(|(owner, name)| {
                    !owner.is_empty() && !name.is_empty() && !name.contains('/')
                });
            let Some((owner, name)) = parts else {
                error!(entry, "ignoring invalid watch entry, expected owner/name");
                continue;
            };
            if keys.insert((owner.to_ascii_lowercase(), name.to_ascii_lowercase())) {
                repos.push(WatchedRepo {
                    owner: owner.to_owned(),
                    name: name.to_owned(),
                });
            } else {
                debug!(entry, "ignoring duplicate watch entry");
            }
        }
        Self { repos }
    }

    /// Returns the number of watched repositories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.repos.len()
    }

    /// Returns true when nothing is watched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    /// Iterates the watched repositories in watch-list order.
    pub fn iter(&self) -> std::slice::Iter<'_, WatchedRepo> {
        self.repos.iter()
    }
}
