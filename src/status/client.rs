use reqwest::header::{ETAG, IF_NONE_MATCH, USER_AGENT};
use reqwest::{Client, RequestBuilder, StatusCode};
use thiserror::Error;

use super::models::SystemStatus;
use crate::constants::USER_AGENT_PRODUCT;

/// Why a poll produced no data.
#[derive(Debug, Error)]
pub enum StatusError {
    /// DNS, connect, TLS or body read failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Anything other than 200 or 304.
    #[error("unexpected http status code, expected 200 or 304, but got {0}")]
    UnexpectedStatus(u16),
    /// The 200 body was not a status document.
    #[error("invalid status document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result of one conditional fetch.
#[derive(Debug)]
pub enum PollOutcome {
    /// 200 with a parsed body.
    Fresh(SystemStatus),
    /// 304, the previously fetched snapshot is still current.
    Unchanged,
    Failure(StatusError),
}

/// Conditional-GET client for the status summary endpoint.
///
/// Keep one instance for the whole process: the ETag it remembers is what
/// lets the server answer 304 instead of resending the document.
pub struct StatusClient {
    client: Client,
    api_url: String,
    user_agent: String,
    etag: Option<String>,
}

impl StatusClient {
    pub fn new(api_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.to_string(),
            user_agent: format!("{}/{}", USER_AGENT_PRODUCT, env!("CARGO_PKG_VERSION")),
            etag: None,
        }
    }

    /// The cache validator sent with the next request, if any.
    #[cfg(test)]
    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    /// Fetch the summary once. Never retries; the caller's timer does that.
    pub async fn poll(&mut self) -> PollOutcome {
        match self.fetch().await {
            Ok(outcome) => outcome,
            Err(e) => PollOutcome::Failure(e),
        }
    }

    async fn fetch(&mut self) -> Result<PollOutcome, StatusError> {
        let response = self.request().send().await?;

        match response.status() {
            StatusCode::OK => {
                let etag = response
                    .headers()
                    .get(ETAG)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                let body = response.text().await?;
                let status: SystemStatus = serde_json::from_str(&body)?;
                self.etag = etag;
                Ok(PollOutcome::Fresh(status))
            }
            StatusCode::NOT_MODIFIED => Ok(PollOutcome::Unchanged),
            other => Err(StatusError::UnexpectedStatus(other.as_u16())),
        }
    }

    fn request(&self) -> RequestBuilder {
        let request = self
            .client
            .get(&self.api_url)
            .header(USER_AGENT, &self.user_agent);

        match &self.etag {
            Some(etag) => request.header(IF_NONE_MATCH, etag),
            None => request,
        }
    }
}
