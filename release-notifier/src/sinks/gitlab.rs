//! GitLab issue sink.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::{ConfigError, GitlabConfig};
use crate::model::Repository;

use super::{Sink, SinkError};

/// Opens an issue in a GitLab project for every release notification.
pub struct GitlabSink {
    issues_url: Url,
    api_token: String,
    labels: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct CreateIssue<'a> {
    title: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CreatedIssue {
    iid: u64,
}

impl GitlabSink {
    /// Creates a sink posting to an explicit issues endpoint.
    pub fn new(
        issues_url: Url,
        api_token: impl Into<String>,
        labels: Option<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            issues_url,
            api_token: api_token.into(),
            labels,
            client,
        }
    }

    /// Creates a sink for the configured project.
    ///
    /// # Errors
    ///
    /// Fails when the configured hostname cannot form an issues endpoint.
    pub fn from_config(
        config: &GitlabConfig,
        client: reqwest::Client,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.issues_url()?,
            config.api_token(),
            config.labels().map(str::to_owned),
            client,
        ))
    }

    fn issue_title(repository: &Repository) -> String {
        format!(
            "New release: {} {}",
            repository.full_name(),
            repository.release.name
        )
    }

    fn issue_description(repository: &Repository) -> String {
        let release = &repository.release;
        format!(
            "[{repo}]({repo_url}) published [{name}]({url}) at {published}.",
            repo = repository.full_name(),
            repo_url = repository.url,
            name = release.name,
            url = release.url,
            published = release.published_at.format("%Y-%m-%d %H:%M UTC"),
        )
    }
}

#[async_trait]
impl Sink for GitlabSink {
    fn name(&self) -> &'static str {
        "gitlab"
    }

    async fn send(&self, repository: &Repository) -> Result<(), SinkError> {
        let issue = CreateIssue {
            title: Self::issue_title(repository),
            description: Self::issue_description(repository),
            labels: self.labels.as_deref(),
        };
        let response = self
            .client
            .post(self.issues_url.clone())
            .header("PRIVATE-TOKEN", &self.api_token)
            .json(&issue)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }
        let created: CreatedIssue = response
            .json()
            .await
            .map_err(|error| SinkError::Response(error.to_string()))?;
        debug!(issue = created.iid, repo = %repository.full_name(), "created release issue");
        Ok(())
    }
}
