use thiserror::Error;

/// Failures surfaced by the Gerrit REST client.
///
/// The `Display` output is shown to users verbatim, so each variant renders
/// as a self-contained sentence.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid server URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}
