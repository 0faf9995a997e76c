//! HTTP transport for the documentation site and the Perfecto REST API.

use crate::config::PerfectoToken;
use anyhow::Context as AnyhowContext;
use async_trait::async_trait;
use perfecto_help_index::{HelpIndexError, HelpSource};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const READ_TIMEOUT: Duration = Duration::from_secs(60);
const AUTH_HEADER: &str = "Perfecto-Authorization";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(
        "No API token. Set PERFECTO_SECURITY_TOKEN or PERFECTO_SECURITY_TOKEN_FILE env var with security token."
    )]
    MissingToken,
    #[error("No cloud name. Set PERFECTO_CLOUD_NAME env var with the Perfecto cloud name.")]
    MissingCloudName,
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// The API answered with its own error payload.
    #[error("{0}")]
    Rejected(String),
    #[error("HTTP {status} for {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// Faults reported back to the caller as-is, without the support footer.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::MissingToken | Self::MissingCloudName | Self::InvalidCredentials | Self::Rejected(_)
        )
    }

    pub fn is_http(&self) -> bool {
        matches!(self, Self::Status { .. } | Self::Transport { .. })
    }
}

pub fn user_agent() -> String {
    format!(
        "perfecto-mcp/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Shared client; cheap to clone.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .read_timeout(READ_TIMEOUT)
            .user_agent(user_agent())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    /// Authenticated JSON request against the Perfecto API.
    pub async fn api_request(
        &self,
        token: Option<&PerfectoToken>,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let token = token.ok_or(ApiError::MissingToken)?;

        log::debug!("{method} {url}");
        let mut request = self
            .client
            .request(method, url)
            .header(AUTH_HEADER, &token.token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let transport = |source: reqwest::Error| ApiError::Transport {
            url: url.to_string(),
            source,
        };
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(ApiError::InvalidCredentials);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response.json().await.map_err(transport)?;
        match rejection_message(&payload) {
            Some(message) => Err(ApiError::Rejected(message)),
            None => Ok(payload),
        }
    }
}

/// Error payloads are arrays whose first element carries a `userMessage`.
fn rejection_message(payload: &Value) -> Option<String> {
    let first = payload.as_array()?.first()?;
    let message = first.get("userMessage")?;
    Some(match message {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    })
}

#[async_trait]
impl HelpSource for HttpClient {
    async fn fetch_text(&self, url: &str) -> perfecto_help_index::Result<String> {
        let fetch_error = |err: reqwest::Error| HelpIndexError::Fetch {
            url: url.to_string(),
            message: err.to_string(),
        };

        log::debug!("GET {url}");
        let response = self.client.get(url).send().await.map_err(fetch_error)?;
        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(HelpIndexError::InvalidCredentials);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HelpIndexError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        response.text().await.map_err(fetch_error)
    }
}
