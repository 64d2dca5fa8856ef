//! Runner error types.

/// Errors that can occur while assembling the daemon.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration errors, e.g. a GitLab hostname that forms no URL.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// HTTP client initialization errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
