//! Daemon configuration.
//!
//! [`Config`] is assembled by the CLI from flags and environment variables
//! and handed to the runner as a plain value. Sinks are enabled by presence:
//! a Slack hook URL turns on the chat sink, a complete [`GitlabConfig`]
//! turns on the issue sink.

mod env_file;
mod error;
mod interval;

pub use env_file::load_env_file;
pub use error::ConfigError;
pub use interval::parse_interval;

use std::time::Duration;

use url::Url;

/// Configuration for the release notifier daemon.
#[derive(Debug, Clone)]
pub struct Config {
    /// GitHub token used for the release queries.
    github_token: String,
    /// Repositories to watch, as `owner/name` entries.
    repositories: Vec<String>,
    /// Time between two poll rounds.
    interval: Duration,
    /// Slack incoming webhook; enables the chat sink when present.
    slack_hook: Option<Url>,
    /// GitLab issue sink settings; enables the sink when present.
    gitlab: Option<GitlabConfig>,
    /// Whether pre-release versions are dropped instead of dispatched.
    ignore_nonstable: bool,
}

impl Config {
    /// Creates a configuration with no sinks enabled.
    pub fn new(github_token: String, repositories: Vec<String>, interval: Duration) -> Self {
        Self {
            github_token,
            repositories,
            interval,
            slack_hook: None,
            gitlab: None,
            ignore_nonstable: false,
        }
    }

    /// Enables the Slack chat sink.
    pub fn with_slack_hook(mut self, hook: Url) -> Self {
        self.slack_hook = Some(hook);
        self
    }

    /// Enables the GitLab issue sink.
    pub fn with_gitlab(mut self, gitlab: GitlabConfig) -> Self {
        self.gitlab = Some(gitlab);
        self
    }

    /// Sets whether pre-release versions are dropped instead of dispatched.
    pub fn with_ignore_nonstable(mut self, ignore_nonstable: bool) -> Self {
        self.ignore_nonstable = ignore_nonstable;
        self
    }

    /// Returns the configured GitHub token.
    pub fn github_token(&self) -> &str {
        &self.github_token
    }

    /// Returns the raw `owner/name` watch entries.
    pub fn repositories(&self) -> &[String] {
        &self.repositories
    }

    /// Returns the time between two poll rounds.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the Slack webhook, if the chat sink is enabled.
    pub fn slack_hook(&self) -> Option<&Url> {
        self.slack_hook.as_ref()
    }

    /// Returns the GitLab sink settings, if the issue sink is enabled.
    pub fn gitlab(&self) -> Option<&GitlabConfig> {
        self.gitlab.as_ref()
    }

    /// Returns whether pre-release versions are dropped.
    pub fn ignore_nonstable(&self) -> bool {
        self.ignore_nonstable
    }
}

/// Settings for the GitLab issue sink.
#[derive(Debug, Clone)]
pub struct GitlabConfig {
    /// Host serving the GitLab API, e.g. `gitlab.example.com`.
    hostname: String,
    /// API token sent as `PRIVATE-TOKEN`.
    api_token: String,
    /// Project receiving the release issues.
    project_id: u64,
    /// Comma-separated labels attached to created issues.
    labels: Option<String>,
}

impl GitlabConfig {
    /// Assembles the sink settings from individually optional parts.
    ///
    /// Returns `None` unless a hostname, a token and a positive project id
    /// are all present; a partially configured sink stays disabled.
    pub fn from_parts(
        hostname: Option<String>,
        api_token: Option<String>,
        project_id: Option<u64>,
        labels: Option<String>,
    ) -> Option<Self> {
        let hostname = hostname
            .map(|h| h.trim().to_owned())
            .filter(|h| !h.is_empty())?;
        let api_token = api_token.filter(|t| !t.trim().is_empty())?;
        let project_id = project_id.filter(|id| *id > 0)?;
        Some(Self {
            hostname,
            api_token,
            project_id,
            labels: labels.filter(|l| !l.trim().is_empty()),
        })
    }

    /// Returns the issue-creation endpoint on this host.
    ///
    /// The hostname may carry a relative install path
    /// (`gitlab.example.com/gitlab`) but no scheme.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidGitlabHostname`] when the hostname does
    /// not form a valid HTTPS base URL.
    pub fn issues_url(&self) -> Result<Url, ConfigError> {
        if self.hostname.contains("://") {
            return Err(ConfigError::InvalidGitlabHostname {
                hostname: self.hostname.clone(),
                reason: "must not include a scheme".to_owned(),
            });
        }
        Url::parse(&format!(
            "https://{}/api/v4/projects/{}/issues",
            self.hostname.trim_end_matches('/'),
            self.project_id
        ))
        .map_err(|source| ConfigError::InvalidGitlabHostname {
            hostname: self.hostname.clone(),
            reason: source.to_string(),
        })
    }

    /// Returns the API token.
    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    /// Returns the project id receiving release issues.
    pub fn project_id(&self) -> u64 {
        self.project_id
    }

    /// Returns the labels for created issues, if any.
    pub fn labels(&self) -> Option<&str> {
        self.labels.as_deref()
    }
}
