use std::time::Duration;

use reqwest::blocking::Client as HttpClient;
use reqwest::header::USER_AGENT;

use super::ClientError;

/// Status line and body of an API answer, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// One authenticated GET against the verification API.
///
/// `endpoint` is only used to label errors.
pub trait Transport {
    fn get(
        &self,
        endpoint: &'static str,
        url: &str,
        api_key: &str,
        user_agent: &str,
    ) -> Result<RawResponse, ClientError>;
}

impl Transport for HttpClient {
    fn get(
        &self,
        endpoint: &'static str,
        url: &str,
        api_key: &str,
        user_agent: &str,
    ) -> Result<RawResponse, ClientError> {
        let response = HttpClient::get(self, url)
            .bearer_auth(api_key)
            .header(USER_AGENT, user_agent)
            .send()
            .map_err(|err| ClientError::request(endpoint, err))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|err| ClientError::request(endpoint, err))?;
        Ok(RawResponse { status, body })
    }
}

pub(crate) fn build_http_client(timeout: Option<Duration>) -> Result<HttpClient, ClientError> {
    let mut builder = HttpClient::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(ClientError::http_init)
}
