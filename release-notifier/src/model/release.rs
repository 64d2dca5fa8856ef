//! Release snapshot and stability classification.

use chrono::{DateTime, Utc};

/// Tag markers that classify a release as non-stable.
const NONSTABLE_MARKERS: [&str; 6] = ["rc", "alpha", "beta", "pre", "dev", "snapshot"];

/// A published release of a repository.
///
/// An opaque snapshot of what the forge reported at poll time; never mutated
/// after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Display name, e.g. `v1.4.0`. Falls back to the tag when the forge
    /// reports no name.
    pub name: String,

    /// The underlying git tag string.
    pub tag: String,

    /// When the release was published.
    pub published_at: DateTime<Utc>,

    /// Browser link to the release page.
    pub url: String,
}

impl Release {
    /// Returns true if this release looks like a pre-release.
    ///
    /// Pure function of the tag string; see [`is_nonstable_tag`].
    #[must_use]
    pub fn is_nonstable(&self) -> bool {
        is_nonstable_tag(&self.tag)
    }
}

/// Classifies a release tag as non-stable.
///
/// A tag is non-stable iff, after stripping one leading `v`, it contains any
/// of `rc`, `alpha`, `beta`, `pre`, `dev` or `snapshot`, case-insensitively.
/// Tags that do not parse as semantic versions are still classified; the rule
/// is a substring heuristic, not a structural one.
#[must_use]
pub fn is_nonstable_tag(tag: &str) -> bool {
    let tag = tag.strip_prefix('v').unwrap_or(tag).to_ascii_lowercase();
    NONSTABLE_MARKERS.iter().any(|marker| tag.contains(marker))
}
