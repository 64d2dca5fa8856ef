//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while assembling the daemon configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An interval string did not parse as a duration.
    #[error("Invalid interval '{value}': {reason}")]
    InvalidInterval { value: String, reason: String },

    /// The GitLab hostname does not form a valid API base URL.
    #[error("Invalid GitLab hostname '{hostname}': {reason}")]
    InvalidGitlabHostname { hostname: String, reason: String },
}
