//! Slack incoming-webhook sink.

use async_trait::async_trait;
use serde::Serialize;
use url::Url;

use crate::model::Repository;

use super::{Sink, SinkError};

/// Posts release notifications to a Slack incoming webhook.
pub struct SlackSink {
    hook: Url,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct SlackMessage {
    text: String,
}

impl SlackSink {
    /// Creates a sink posting to the given webhook.
    pub fn new(hook: Url, client: reqwest::Client) -> Self {
        Self { hook, client }
    }

    fn format_message(repository: &Repository) -> String {
        let release = &repository.release;
        format!(
            "New release {} for <{}|{}>, published {}",
            release.name,
            release.url,
            repository.full_name(),
            release.published_at.format("%Y-%m-%d %H:%M UTC"),
        )
    }
}

#[async_trait]
impl Sink for SlackSink {
    fn name(&self) -> &'static str {
        "slack"
    }

    async fn send(&self, repository: &Repository) -> Result<(), SinkError> {
        let message = SlackMessage {
            text: Self::format_message(repository),
        };
        let response = self
            .client
            .post(self.hook.clone())
            .json(&message)
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
        Ok(())
    }
}
