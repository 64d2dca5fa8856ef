//! Upstream query error types.
//!
//! The checker reacts per variant rather than retrying in place:
//!
//! - **NotFound** and **Transient** leave the seen table untouched; the
//!   repository is simply polled again on the next tick.
//! - **Auth** also keeps the daemon alive, but every poll will fail until
//!   the credential is fixed and the process restarted.

use thiserror::Error;

/// Errors from querying the latest release of a repository.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Repository is missing, not visible to the token, or has no
    /// published release.
    #[error("no published release for {owner}/{name}")]
    NotFound { owner: String, name: String },

    /// The forge rejected the credential.
    #[error("GitHub rejected the credential: {message}")]
    Auth {
        message: String,
        #[source]
        source: Option<octocrab::Error>,
    },

    /// Network failure, rate limit or server error.
    #[error("transient GitHub error: {message}")]
    Transient {
        message: String,
        #[source]
        source: Option<octocrab::Error>,
    },
}

impl UpstreamError {
    /// Creates a not-found error for a repository.
    pub fn not_found(owner: &str, name: &str) -> Self {
        Self::NotFound {
            owner: owner.to_owned(),
            name: name.to_owned(),
        }
    }

    /// Creates a credential-rejection error.
    pub fn auth(message: impl Into<String>, source: Option<octocrab::Error>) -> Self {
        Self::Auth {
            message: message.into(),
            source,
        }
    }

    /// Creates a transient error.
    pub fn transient(message: impl Into<String>, source: Option<octocrab::Error>) -> Self {
        Self::Transient {
            message: message.into(),
            source,
        }
    }

    /// Categorizes an octocrab error by HTTP status and message.
    ///
    /// Anything without a GitHub status attached (connect failures, timeouts,
    /// response decoding) is treated as transient; the next tick retries it.
    pub(crate) fn from_octocrab(owner: &str, name: &str, error: octocrab::Error) -> Self {
        match &error {
            octocrab::Error::GitHub { source, .. } => {
                let status = source.status_code.as_u16();
                let message = source.message.clone();
                match status {
                    401 => Self::auth(message, Some(error)),
                    403 if !is_rate_limit_message(&message) => Self::auth(message, Some(error)),
                    404 => Self::not_found(owner, name),
                    _ => Self::transient(message, Some(error)),
                }
            }
            _ => Self::transient(error.to_string(), Some(error)),
        }
    }
}

/// Checks if a 403 message indicates a rate limit rather than a permission
/// problem.
fn is_rate_limit_message(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("rate limit")
        || message.contains("api rate")
        || message.contains("secondary rate")
        || message.contains("abuse detection")
}
