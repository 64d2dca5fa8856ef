//! Release event fan-out.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::model::Repository;
use crate::sinks::Sink;

/// Consumes release events and fans each one out to the configured sinks.
///
/// Sinks run in a fixed order and the first failure stops the chain for
/// that event; later sinks never announce a release an earlier one missed.
/// The next event starts fresh with the full chain, and a failing or
/// panicking sink never takes the loop down.
pub struct Dispatcher {
    sinks: Vec<Box<dyn Sink>>,
    ignore_nonstable: bool,
}

impl Dispatcher {
    /// Creates a dispatcher over an ordered sink chain.
    pub fn new(sinks: Vec<Box<dyn Sink>>, ignore_nonstable: bool) -> Self {
        Self {
            sinks,
            ignore_nonstable,
        }
    }

    /// Consumes events until `shutdown` fires or the channel closes.
    pub async fn run(self, mut events: mpsc::Receiver<Repository>, shutdown: CancellationToken) {
        info!("waiting for new releases");
        loop {
            let repository = tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("dispatcher shutting down");
                    return;
                }
                event = events.recv() => match event {
                    Some(repository) => repository,
                    None => {
                        debug!("event channel closed, stopping dispatcher");
                        return;
                    }
                },
            };
            self.dispatch(&repository).await;
        }
    }

    /// Sends one event through the sink chain.
    async fn dispatch(&self, repository: &Repository) {
        if self.ignore_nonstable && repository.release.is_nonstable() {
            debug!(
                version = %repository.release.name,
                repo = %repository.full_name(),
                "not notifying about non-stable version"
            );
            return;
        }
        for sink in &self.sinks {
            let send = AssertUnwindSafe(sink.send(repository)).catch_unwind();
            match send.await {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    warn!(
                        sink = sink.name(),
                        repo = %repository.full_name(),
                        error = %error,
                        "failed to send release to messenger"
                    );
                    break;
                }
                Err(_panic) => {
                    error!(
                        sink = sink.name(),
                        repo = %repository.full_name(),
                        "sink panicked while sending"
                    );
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::Utc;

    use crate::model::Release;
    use crate::sinks::SinkError;

    enum Outcome {
        Deliver,
        Fail,
        Panic,
    }

    /// Records every attempted send as `name:tag`; outcomes are scripted
    /// per call and default to delivery.
    struct TestSink {
        name: &'static str,
        journal: Arc<Mutex<Vec<String>>>,
        script: Mutex<VecDeque<Outcome>>,
    }

    impl TestSink {
        fn new(name: &'static str, journal: Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                name,
                journal,
                script: Mutex::new(VecDeque::new()),
            }
        }

        fn scripted(self, outcomes: Vec<Outcome>) -> Self {
            *self.script.lock().unwrap() = outcomes.into();
            self
        }
    }

    #[async_trait]
    impl Sink for TestSink {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn send(&self, repository: &Repository) -> Result<(), SinkError> {
            self.journal
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.name, repository.release.tag));
            // Drop the lock guard before a scripted panic unwinds, or the
            // poisoned mutex would fail every later call instead of
            // defaulting to delivery.
            let outcome = self.script.lock().unwrap().pop_front();
            match outcome {
                None | Some(Outcome::Deliver) => Ok(()),
                Some(Outcome::Fail) => Err(SinkError::Endpoint {
                    status: 500,
                    body: "scripted failure".to_string(),
                }),
                Some(Outcome::Panic) => panic!("scripted sink panic"),
            }
        }
    }

    fn event(tag: &str) -> Repository {
        Repository {
            owner: "foo".to_string(),
            name: "bar".to_string(),
            url: "https://github.com/foo/bar".to_string(),
            release: Release {
                name: tag.to_string(),
                tag: tag.to_string(),
                published_at: Utc::now(),
                url: format!("https://github.com/foo/bar/releases/tag/{tag}"),
            },
        }
    }

    fn chain(sinks: Vec<TestSink>, ignore_nonstable: bool) -> Dispatcher {
        let sinks = sinks
            .into_iter()
            .map(|sink| Box::new(sink) as Box<dyn Sink>)
            .collect();
        Dispatcher::new(sinks, ignore_nonstable)
    }

    #[tokio::test]
    async fn fans_out_to_all_sinks_in_order() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = chain(
            vec![
                TestSink::new("slack", journal.clone()),
                TestSink::new("gitlab", journal.clone()),
            ],
            false,
        );

        dispatcher.dispatch(&event("v1.1.0")).await;

        assert_eq!(
            *journal.lock().unwrap(),
            vec!["slack:v1.1.0", "gitlab:v1.1.0"]
        );
    }

    #[tokio::test]
    async fn first_failure_stops_the_chain_for_that_event_only() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = chain(
            vec![
                TestSink::new("slack", journal.clone()).scripted(vec![Outcome::Fail]),
                TestSink::new("gitlab", journal.clone()),
            ],
            false,
        );

        dispatcher.dispatch(&event("v1.1.0")).await;
        dispatcher.dispatch(&event("v1.2.0")).await;

        assert_eq!(
            *journal.lock().unwrap(),
            vec!["slack:v1.1.0", "slack:v1.2.0", "gitlab:v1.2.0"]
        );
    }

    #[tokio::test]
    async fn a_panicking_sink_stops_the_chain_but_not_the_loop() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = chain(
            vec![
                TestSink::new("slack", journal.clone()).scripted(vec![Outcome::Panic]),
                TestSink::new("gitlab", journal.clone()),
            ],
            false,
        );

        dispatcher.dispatch(&event("v1.1.0")).await;
        dispatcher.dispatch(&event("v1.2.0")).await;

        assert_eq!(
            *journal.lock().unwrap(),
            vec!["slack:v1.1.0", "slack:v1.2.0", "gitlab:v1.2.0"]
        );
    }

    #[tokio::test]
    async fn nonstable_releases_are_dropped_when_configured() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = chain(vec![TestSink::new("slack", journal.clone())], true);

        dispatcher.dispatch(&event("v1.1.0-rc.1")).await;
        dispatcher.dispatch(&event("v1.1.0")).await;

        assert_eq!(*journal.lock().unwrap(), vec!["slack:v1.1.0"]);
    }

    #[tokio::test]
    async fn nonstable_releases_flow_by_default() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = chain(vec![TestSink::new("slack", journal.clone())], false);

        dispatcher.dispatch(&event("v1.1.0-rc.1")).await;

        assert_eq!(*journal.lock().unwrap(), vec!["slack:v1.1.0-rc.1"]);
    }

    #[tokio::test]
    async fn run_drains_events_until_the_channel_closes() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = chain(vec![TestSink::new("slack", journal.clone())], false);
        let (tx, rx) = mpsc::channel(4);
        let shutdown = CancellationToken::new();

        let handle = tokio::spawn(dispatcher.run(rx, shutdown));
        tx.send(event("v1.1.0")).await.unwrap();
        tx.send(event("v1.2.0")).await.unwrap();
        drop(tx);

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("dispatcher should stop when the channel closes")
            .unwrap();
        assert_eq!(
            *journal.lock().unwrap(),
            vec!["slack:v1.1.0", "slack:v1.2.0"]
        );
    }

    #[tokio::test]
    async fn run_stops_on_cancellation() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = chain(vec![TestSink::new("slack", journal)], false);
        let (tx, rx) = mpsc::channel::<Repository>(4);
        let shutdown = CancellationToken::new();

        let handle = tokio::spawn(dispatcher.run(rx, shutdown.clone()));
        shutdown.cancel();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("dispatcher should stop after cancellation")
            .unwrap();
        drop(tx);
    }
}
