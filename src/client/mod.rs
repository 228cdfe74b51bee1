//! Blocking client for the UserCheck verification API.
//!
//! One `GET {base}/email/{value}` or `GET {base}/domain/{value}` per call, no
//! retries and no caching. A `400` answer means the value is malformed and is
//! reported as [`VerificationOutcome::malformed`]; every other failure is a
//! [`ClientError`] so callers can tell "the API said no" apart from "the API
//! could not be asked".

mod config;
mod error;
mod transport;

pub use config::{API_KEY_ENV, BASE_URL_ENV, ClientConfig, DEFAULT_BASE_URL};
pub use error::ClientError;
pub use transport::{RawResponse, Transport};

use reqwest::blocking::Client as HttpClient;
use url::form_urlencoded;

use crate::policy::{BlockOptions, RemoteFlags, VerificationOutcome, decide};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Email,
    Domain,
}

impl Endpoint {
    pub fn for_mode(domain_only: bool) -> Self {
        if domain_only { Self::Domain } else { Self::Email }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Domain => "domain",
        }
    }
}

/// What the API said about a value, before the block policy is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckResponse {
    Flags(RemoteFlags),
    Malformed,
}

pub struct UserCheckClient<T = HttpClient> {
    config: ClientConfig,
    transport: T,
}

impl UserCheckClient {
    /// Builds a client backed by `reqwest`. Fails with
    /// [`ClientError::MissingApiKey`] when no key is configured.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        ensure_api_key(&config)?;
        let transport = transport::build_http_client(config.timeout)?;
        Ok(Self { config, transport })
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_env()?)
    }
}

impl<T: Transport> UserCheckClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self, ClientError> {
        ensure_api_key(&config)?;
        Ok(Self { config, transport })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetches the raw flags for `value` from the endpoint picked by `domain_only`.
    pub fn check(&self, value: &str, domain_only: bool) -> Result<CheckResponse, ClientError> {
        self.fetch(Endpoint::for_mode(domain_only), value)
    }

    /// Checks `value` against the endpoint selected by `options.domain_only`.
    pub fn validate(
        &self,
        value: &str,
        options: &BlockOptions,
    ) -> Result<VerificationOutcome, ClientError> {
        self.validate_at(Endpoint::for_mode(options.domain_only), value, options)
    }

    pub fn validate_email(
        &self,
        email: &str,
        options: &BlockOptions,
    ) -> Result<VerificationOutcome, ClientError> {
        self.validate_at(Endpoint::Email, email, options)
    }

    pub fn validate_domain(
        &self,
        domain: &str,
        options: &BlockOptions,
    ) -> Result<VerificationOutcome, ClientError> {
        self.validate_at(Endpoint::Domain, domain, options)
    }

    fn validate_at(
        &self,
        endpoint: Endpoint,
        value: &str,
        options: &BlockOptions,
    ) -> Result<VerificationOutcome, ClientError> {
        let outcome = match self.fetch(endpoint, value)? {
            CheckResponse::Malformed => VerificationOutcome::malformed(),
            CheckResponse::Flags(flags) => decide(&flags, options),
        };

        #[cfg(feature = "with-tracing")]
        tracing::debug!(
            endpoint = endpoint.as_str(),
            is_valid = outcome.is_valid(),
            error_code = ?outcome.error_code(),
            "verification finished"
        );

        Ok(outcome)
    }

    fn fetch(&self, endpoint: Endpoint, value: &str) -> Result<CheckResponse, ClientError> {
        let name = endpoint.as_str();
        if is_dot_segment(value) {
            return Ok(CheckResponse::Malformed);
        }
        let url = endpoint_url(self.config.base_url(), endpoint, value);

        #[cfg(feature = "with-tracing")]
        tracing::debug!(endpoint = name, %url, "querying UserCheck");

        let response =
            self.transport
                .get(name, &url, &self.config.api_key, &self.config.user_agent)?;
        interpret(endpoint, response)
    }
}

fn ensure_api_key(config: &ClientConfig) -> Result<(), ClientError> {
    if config.has_api_key() {
        Ok(())
    } else {
        Err(ClientError::MissingApiKey)
    }
}

/// `.` and `..` are dot segments: the URL parser removes them, and their
/// percent-encoded forms `%2E`/`%2E%2E` as well, so the request would reach
/// another resource. Neither is an email address or a domain.
fn is_dot_segment(value: &str) -> bool {
    matches!(value, "." | "..")
}

pub(crate) fn endpoint_url(base_url: &str, endpoint: Endpoint, value: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
    format!("{}/{}/{}", base_url, endpoint.as_str(), encoded)
}

fn interpret(
    endpoint: Endpoint,
    response: RawResponse,
) -> Result<CheckResponse, ClientError> {
    let name = endpoint.as_str();
    let RawResponse { status, body } = response;

    if status == 400 {
        return Ok(CheckResponse::Malformed);
    }
    if !(200..300).contains(&status) {
        #[cfg(feature = "with-tracing")]
        tracing::warn!(endpoint = name, status, "UserCheck answered with an error status");
        return Err(ClientError::status(name, status, body));
    }

    let json: serde_json::Value = match serde_json::from_str(&body) {
        Ok(json) => json,
        Err(err) => return Err(ClientError::invalid_body(name, body, err)),
    };
    match RemoteFlags::from_json(&json) {
        Ok(flags) => Ok(CheckResponse::Flags(flags)),
        Err(err) => Err(ClientError::invalid_flags(name, body, err)),
    }
}

#[cfg(test)]
pub(crate) mod tests;
