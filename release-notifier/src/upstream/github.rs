//! GitHub GraphQL release queries.

use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::Deserialize;
use tracing::{debug_span, Instrument};

use crate::model::{Release, Repository};

use super::{ReleaseSource, UpstreamError};

/// Fetches the single most recently created release of a repository.
///
/// Ordering by creation rather than publish date matches the release list on
/// the repository page, so the daemon reports what a human watching that page
/// would see first.
const LATEST_RELEASE_QUERY: &str = r#"
query($owner: String!, $name: String!) {
    repository(owner: $owner, name: $name) {
        nameWithOwner
        url
        releases(first: 1, orderBy: {field: CREATED_AT, direction: DESC}) {
            nodes {
                name
                tagName
                publishedAt
                url
            }
        }
    }
}"#;

/// [`ReleaseSource`] backed by the GitHub GraphQL API.
#[derive(Debug, Clone)]
pub struct GithubReleases {
    client: Octocrab,
}

impl GithubReleases {
    /// Creates a source on top of an authenticated octocrab client.
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }
}

impl ReleaseSource for GithubReleases {
    async fn latest_release(&self, owner: &str, name: &str) -> Result<Repository, UpstreamError> {
        let payload = serde_json::json!({
            "query": LATEST_RELEASE_QUERY,
            "variables": { "owner": owner, "name": name },
        });
        let span = debug_span!("latest_release", %owner, %name);
        async {
            let response: QueryResponse = self
                .client
                .graphql(&payload)
                .await
                .map_err(|error| UpstreamError::from_octocrab(owner, name, error))?;
            into_repository(owner, name, response)
        }
        .instrument(span)
        .await
    }
}

fn into_repository(
    owner: &str,
    name: &str,
    response: QueryResponse,
) -> Result<Repository, UpstreamError> {
    let Some(node) = response.data.and_then(|data| data.repository) else {
        return Err(classify_graphql_errors(owner, name, response.errors));
    };

    let Some(release) = node.releases.nodes.into_iter().next() else {
        return Err(UpstreamError::not_found(owner, name));
    };
    // Drafts carry no publish date and are not releases yet.
    let Some(published_at) = release.published_at else {
        return Err(UpstreamError::not_found(owner, name));
    };

    // Prefer the canonical casing the forge reports over the watch entry.
    let (owner, name) = node
        .name_with_owner
        .split_once('/')
        .map(|(o, n)| (o.to_owned(), n.to_owned()))
        .unwrap_or_else(|| (owner.to_owned(), name.to_owned()));
    let tag = release.tag_name;
    let release_name = release
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| tag.clone());

    Ok(Repository {
        owner,
        name,
        url: node.url,
        release: Release {
            name: release_name,
            tag,
            published_at,
            url: release.url,
        },
    })
}

/// Maps a null `repository` to an error using the GraphQL `errors` array.
///
/// GitHub reports a missing repository as `data.repository = null` plus a
/// `NOT_FOUND` entry; scope problems surface the same way with `FORBIDDEN`.
fn classify_graphql_errors(owner: &str, name: &str, errors: Vec<GraphqlError>) -> UpstreamError {
    if errors.is_empty()
        || errors
            .iter()
            .any(|error| error.kind.as_deref() == Some("NOT_FOUND"))
    {
        return UpstreamError::not_found(owner, name);
    }
    let message = errors
        .iter()
        .map(|error| error.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    if errors
        .iter()
        .any(|error| error.kind.as_deref() == Some("FORBIDDEN"))
    {
        return UpstreamError::auth(message, None);
    }
    UpstreamError::transient(message, None)
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    data: Option<QueryData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    name_with_owner: String,
    url: String,
    releases: ReleaseConnection,
}

#[derive(Debug, Deserialize)]
struct ReleaseConnection {
    #[serde(default)]
    nodes: Vec<ReleaseNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReleaseNode {
    name: Option<String>,
    tag_name: String,
    published_at: Option<DateTime<Utc>>,
    url: String,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
    #[serde(rename = "type")]
    kind: Option<String>,
}
