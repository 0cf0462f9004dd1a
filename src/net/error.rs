//! Failure taxonomy for backend calls.
//!
//! Only [`ApiError::Unauthorized`] has a side effect (forced logout); every
//! other variant is handed back to the caller untouched.

/// Errors produced by [`super::ApiClient`] and the API helpers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),

    /// The cached anti-forgery token cannot be carried in a header.
    #[error("invalid X-CSRFToken header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// The request never produced a response (connect, timeout, body read).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered 401; local auth flags were cleared.
    #[error("unauthenticated (HTTP 401): session cleared, redirect to {redirect}")]
    Unauthorized { redirect: &'static str, body: String },

    /// The server answered with any other non-success status.
    #[error("server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// A success body did not match the expected schema.
    #[error("response decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status carried by the error, if a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::ClientBuild(_) | Self::InvalidHeader(_) | Self::Decode(_) => None,
        }
    }

    /// Server-provided `message` field of a JSON error body, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<String> {
        let body = match self {
            Self::Unauthorized { body, .. } | Self::Status { body, .. } => body,
            _ => return None,
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        value.get("message")?.as_str().map(str::to_owned)
    }
}
