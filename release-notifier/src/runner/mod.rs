//! Daemon assembly and lifecycle.
//!
//! The [`Runner`] turns a [`Config`] into running machinery: an
//! authenticated GitHub client feeding the checker, and the enabled sinks
//! behind the dispatcher. The checker runs as its own task; the dispatcher
//! runs on the caller's, so `run` returns once the daemon has wound down.

mod error;

pub use error::RunnerError;

use std::time::Duration;

use octocrab::Octocrab;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::checker::{Checker, WatchList};
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::sinks::{GitlabSink, Sink, SlackSink};
use crate::upstream::GithubReleases;

/// Request timeout for sink deliveries.
const SINK_TIMEOUT: Duration = Duration::from_secs(30);

/// Assembles and runs the release watch.
pub struct Runner {
    config: Config,
    source: GithubReleases,
    sinks: Vec<Box<dyn Sink>>,
}

impl Runner {
    /// Builds the API clients and the enabled sink chain.
    pub fn new(config: Config) -> Result<Self, RunnerError> {
        let octocrab = Octocrab::builder()
            .personal_token(config.github_token().to_owned())
            .build()?;
        let http = reqwest::Client::builder().timeout(SINK_TIMEOUT).build()?;

        let mut sinks: Vec<Box<dyn Sink>> = Vec::new();
        if let Some(hook) = config.slack_hook() {
            info!(sink = "slack", "sink enabled");
            sinks.push(Box::new(SlackSink::new(hook.clone(), http.clone())));
        }
        if let Some(gitlab) = config.gitlab() {
            info!(
                sink = "gitlab",
                project_id = gitlab.project_id(),
                "sink enabled"
            );
            sinks.push(Box::new(GitlabSink::from_config(gitlab, http.clone())?));
        }
        if sinks.is_empty() {
            warn!("no sinks enabled, new releases will only be logged");
        }

        Ok(Self {
            config,
            source: GithubReleases::new(octocrab),
            sinks,
        })
    }

    /// Runs the daemon until `shutdown` fires.
    pub async fn run(self, shutdown: CancellationToken) {
        let Self {
            config,
            source,
            sinks,
        } = self;

        let watch_list = WatchList::parse(config.repositories());
        if watch_list.is_empty() {
            warn!("watch list is empty after parsing, nothing will be polled");
        }
        info!(
            repositories = watch_list.len(),
            interval = ?config.interval(),
            "starting release watch"
        );

        let (events_tx, events_rx) = mpsc::channel(watch_list.len().max(1));
        let checker_task = tokio::spawn(Checker::new(source).run(
            config.interval(),
            watch_list,
            events_tx,
            shutdown.clone(),
        ));

        Dispatcher::new(sinks, config.ignore_nonstable())
            .run(events_rx, shutdown.clone())
            .await;

        // The dispatcher returning means shutdown or a closed channel;
        // either way the checker must stop too.
        shutdown.cancel();
        if let Err(join_error) = checker_task.await {
            if join_error.is_panic() {
                error!("checker task panicked");
            }
        }
        info!("shut down cleanly");
    }
}
