//! Sink error types.

use thiserror::Error;

/// Errors from delivering a notification to a sink.
///
/// Opaque to the dispatcher: it logs the error under the sink's name and
/// decides what happens to the rest of the chain.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The endpoint replied with a non-success status.
    #[error("endpoint returned HTTP {status}: {body}")]
    Endpoint { status: u16, body: String },

    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// A success response could not be interpreted.
    #[error("unexpected response body: {0}")]
    Response(String),
}
