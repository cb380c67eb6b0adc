use shared::models::api::EnvelopeError;
use thiserror::Error;

/// Failures of the required upstream endpoints (node list, node detail, task stats).
/// Fatal to the view that needed the data, never to its siblings.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("{0}")]
    InvalidResponse(#[from] EnvelopeError),
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
