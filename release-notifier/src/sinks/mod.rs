//! Notification sinks.
//!
//! A [`Sink`] delivers one release event to one destination. The dispatcher
//! holds sinks as trait objects, so supporting another messenger means
//! implementing the trait and adding the sink to the chain at startup.

mod error;
mod gitlab;
mod slack;

pub use error::SinkError;
pub use gitlab::GitlabSink;
pub use slack::SlackSink;

use async_trait::async_trait;

use crate::model::Repository;

/// Delivers a release event to a single destination.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Stable name used in logs, e.g. `slack`.
    fn name(&self) -> &'static str;

    /// Sends one release notification.
    async fn send(&self, repository: &Repository) -> Result<(), SinkError>;
}
