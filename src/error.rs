// Error types shared by the API client, the paginator and the writer.
// The binary wraps these in `anyhow` at the UI boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Why the token exchange failed. Every variant is fatal for the run.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The request never got a response (DNS, connect, TLS, ...).
    #[error("token request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("token request rejected: {status} - {body}")]
    Status { status: u16, body: String },

    /// The response body was not the JSON we expected.
    #[error("token response could not be parsed: {0}")]
    InvalidResponse(#[source] reqwest::Error),

    /// Authentication succeeded but the response carried no usable token.
    #[error("authentication succeeded, but no token was returned")]
    EmptyToken,
}

/// Why a single page could not be fetched. Any of these ends the sweep.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response could not be parsed: {0}")]
    InvalidResponse(#[source] reqwest::Error),

    /// The stored token cannot be sent as a header value.
    #[error("token contains characters that are not valid in a header")]
    InvalidToken,
}

impl FetchError {
    /// HTTP status of the failed page, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Rejected `--page` / `--page_range` input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageRangeError {
    #[error("invalid page range format '{0}', use e.g. --page_range 2-5")]
    Format(String),

    #[error("invalid page range {start}-{end}: start is after end")]
    Reversed { start: u32, end: u32 },

    #[error("page numbers start at 1")]
    ZeroPage,
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize products: {0}")]
    Serialize(#[from] serde_json::Error),
}
