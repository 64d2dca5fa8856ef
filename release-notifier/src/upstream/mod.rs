//! Upstream release sources.
//!
//! [`ReleaseSource`] is the seam between the polling loop and the forge.
//! The production implementation is [`GithubReleases`]; tests script a
//! source of their own to drive the checker without a network.

mod error;
mod github;

pub use error::UpstreamError;
pub use github::GithubReleases;

use std::future::Future;

use crate::model::Repository;

/// Looks up the most recently created release of a repository.
pub trait ReleaseSource {
    /// Fetches the repository and its latest release.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::NotFound`] when the repository is missing or has
    ///   no published release.
    /// - [`UpstreamError::Transient`] for failures worth retrying on the
    ///   next tick.
    /// - [`UpstreamError::Auth`] when the credential is rejected.
    fn latest_release(
        &self,
        owner: &str,
        name: &str,
    ) -> impl Future<Output = Result<Repository, UpstreamError>> + Send;
}
