use thiserror::Error;

use crate::policy::InvalidFlags;

/// Failures that prevent the API from producing a verdict.
///
/// None of these is a validation result: a value rejected by the block policy
/// comes back as an invalid [`VerificationOutcome`](crate::VerificationOutcome).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("UserCheck API key is not set")]
    MissingApiKey,
    #[error("HTTP client initialization failed: {source}")]
    HttpInit {
        #[source]
        source: reqwest::Error,
    },
    #[error("request to the {endpoint} endpoint failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("unable to verify {endpoint} (HTTP {status}): {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },
    #[error("invalid response format from the {endpoint} endpoint: {body}")]
    InvalidBody {
        endpoint: &'static str,
        body: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid response format from the {endpoint} endpoint: {body}")]
    InvalidFlags {
        endpoint: &'static str,
        body: String,
        #[source]
        source: InvalidFlags,
    },
}

impl ClientError {
    pub(crate) fn http_init(source: reqwest::Error) -> Self {
        Self::HttpInit { source }
    }

    pub(crate) fn request(endpoint: &'static str, source: reqwest::Error) -> Self {
        Self::Request { endpoint, source }
    }

    pub(crate) fn status(endpoint: &'static str, status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            endpoint,
            status,
            body: body.into(),
        }
    }

    pub(crate) fn invalid_body(
        endpoint: &'static str,
        body: impl Into<String>,
        source: serde_json::Error,
    ) -> Self {
        Self::InvalidBody {
            endpoint,
            body: body.into(),
            source,
        }
    }

    pub(crate) fn invalid_flags(
        endpoint: &'static str,
        body: impl Into<String>,
        source: InvalidFlags,
    ) -> Self {
        Self::InvalidFlags {
            endpoint,
            body: body.into(),
            source,
        }
    }

    /// Endpoint name (`email` or `domain`) for failures raised by a request.
    pub fn endpoint(&self) -> Option<&'static str> {
        match self {
            Self::Request { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::InvalidBody { endpoint, .. }
            | Self::InvalidFlags { endpoint, .. } => Some(*endpoint),
            Self::MissingApiKey | Self::HttpInit { .. } => None,
        }
    }

    /// Raw response body, when the API answered at all.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. }
            | Self::InvalidBody { body, .. }
            | Self::InvalidFlags { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }
}
