//! Edge-triggered release detection.
//!
//! The [`Checker`] polls every watched repository on a fixed interval,
//! remembers the last tag it saw per repository in a [`SeenTable`], and
//! emits the repository as an event whenever that tag changes. The first
//! observation of a repository only records a baseline, so a fresh start
//! never replays history.

mod seen_table;
mod watch_list;

pub use seen_table::SeenTable;
pub use watch_list::{WatchList, WatchedRepo};

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::model::Repository;
use crate::upstream::{ReleaseSource, UpstreamError};

/// Polls an upstream source and emits release-change events.
pub struct Checker<S> {
    source: S,
    seen: SeenTable,
}

impl<S: ReleaseSource> Checker<S> {
    /// Creates a checker with an empty seen table.
    pub fn new(source: S) -> Self {
        Self {
            source,
            seen: SeenTable::new(),
        }
    }

    /// Runs the poll loop until `shutdown` fires or the receiving side of
    /// `events` is dropped.
    ///
    /// The first round starts immediately; later rounds follow at
    /// `interval`. Repositories are polled one at a time, so a round takes
    /// up to the watch-list length times the per-query latency; a round
    /// that overruns the interval delays the next tick instead of bursting
    /// to catch up.
    pub async fn run(
        mut self,
        interval: Duration,
        watch_list: WatchList,
        events: mpsc::Sender<Repository>,
        shutdown: CancellationToken,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("checker shutting down");
                    return;
                }
                _ = ticker.tick() => {}
            }
            if !self.poll_round(&watch_list, &events, &shutdown).await {
                return;
            }
        }
    }

    /// Polls every watched repository once, in watch-list order.
    ///
    /// A failing or panicking poll only skips that repository; the round
    /// carries on. Returns false when the loop should stop because the
    /// event channel closed or shutdown fired mid-round.
    async fn poll_round(
        &mut self,
        watch_list: &WatchList,
        events: &mpsc::Sender<Repository>,
        shutdown: &CancellationToken,
    ) -> bool {
        for repo in watch_list.iter() {
            let poll = AssertUnwindSafe(self.source.latest_release(&repo.owner, &repo.name))
                .catch_unwind();
            let repository = match poll.await {
                Err(_panic) => {
                    error!(repo = %repo.full_name(), "release query panicked");
                    continue;
                }
                Ok(Err(UpstreamError::NotFound { .. })) => {
                    debug!(repo = %repo.full_name(), "no published release");
                    continue;
                }
                Ok(Err(error @ UpstreamError::Auth { .. })) => {
                    error!(
                        repo = %repo.full_name(),
                        error = %error,
                        "GitHub rejected the credential"
                    );
                    continue;
                }
                Ok(Err(error)) => {
                    warn!(
                        repo = %repo.full_name(),
                        error = %error,
                        "failed to query latest release"
                    );
                    continue;
                }
                Ok(Ok(repository)) => repository,
            };

            let tag = repository.release.tag.clone();
            match self.seen.last_seen(&repo.owner, &repo.name) {
                None => {
                    debug!(repo = %repository.full_name(), %tag, "recorded baseline release");
                    self.seen.record(&repo.owner, &repo.name, tag);
                }
                Some(last) if last == tag => {}
                Some(_) => {
                    info!(repo = %repository.full_name(), %tag, "new release detected");
                    // Record before emitting so a slow consumer cannot see
                    // the same release twice.
                    self.seen.record(&repo.owner, &repo.name, tag);
                    tokio::select! {
                        _ = shutdown.cancelled() => return false,
                        sent = events.send(repository) => {
                            if sent.is_err() {
                                debug!("event channel closed, stopping checker");
                                return false;
                            }
                        }
                    }
                }
            }
        }
        true
    }
}
