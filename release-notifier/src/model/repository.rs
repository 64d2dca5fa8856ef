//! Repository coordinate with its latest known release.

use super::Release;

/// A watched repository together with its latest known release.
///
/// Equality is repository identity: `owner` and `name` compared ASCII
/// case-insensitively, matching how the forge treats repository slugs. The
/// embedded release and URL do not participate in comparisons.
#[derive(Debug, Clone)]
pub struct Repository {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub name: String,

    /// Browser link to the repository.
    pub url: String,

    /// Latest known release.
    pub release: Release,
}

impl Repository {
    /// Returns the `owner/name` form used in messages and logs.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl PartialEq for Repository {
    fn eq(&self, other: &Self) -> bool {
        self.owner.eq_ignore_ascii_case(&other.owner)
            && self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for Repository {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn repository(owner: &str, name: &str) -> Repository {
        Repository {
            owner: owner.to_string(),
            name: name.to_string(),
            url: format!("https://github.com/{owner}/{name}"),
            release: Release {
                name: "v1.0.0".to_string(),
                tag: "v1.0.0".to_string(),
                published_at: Utc::now(),
                url: format!("https://github.com/{owner}/{name}/releases/tag/v1.0.0"),
            },
        }
    }

    #[test]
    fn full_name_joins_owner_and_name() {
        assert_eq!(
            repository("octocat", "hello-world").full_name(),
            "octocat/hello-world"
        );
    }

    #[test]
    fn identity_ignores_case() {
        assert_eq!(
            repository("octocat", "hello-world"),
            repository("Octocat", "Hello-World")
        );
    }

    #[test]
    fn identity_distinguishes_coordinates() {
        assert_ne!(
            repository("octocat", "hello-world"),
            repository("octocat", "hello-earth")
        );
        assert_ne!(
            repository("octocat", "hello-world"),
            repository("monalisa", "hello-world")
        );
    }

    #[test]
    fn identity_ignores_the_release() {
        let mut a = repository("octocat", "hello-world");
        let b = repository("octocat", "hello-world");
        a.release.tag = "v2.0.0".to_string();
        assert_eq!(a, b);
    }
}
