use async_trait::async_trait;
use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use secrecy::ExposeSecret;
use url::Url;

use crate::config::{ApiType, ClientConfig};
use crate::error::TransportError;

/// Azure key authentication header
const API_KEY: HeaderName = HeaderName::from_static("api-key");

/// `OpenAI` organization header
const OPENAI_ORGANIZATION: HeaderName = HeaderName::from_static("openai-organization");

/// Raw HTTP response handed back by a [`Transport`]
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: Bytes,
}

/// Sends one HTTP request and returns the response
///
/// Implementations return `Err` for non-success statuses so callers only
/// ever decode successful bodies.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request with a JSON body
    async fn send(&self, method: Method, url: &Url, body: Bytes) -> Result<TransportResponse, TransportError>;
}

/// [`Transport`] backed by a pooled `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    headers: HeaderMap,
}

impl HttpTransport {
    /// Build a transport with the authentication headers and timeout of a config
    ///
    /// # Errors
    ///
    /// Returns an error if a credential is not a valid header value or the
    /// HTTP client cannot be built
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            headers: auth_headers(config)?,
        })
    }
}

fn auth_headers(config: &ClientConfig) -> Result<HeaderMap, TransportError> {
    let mut headers = HeaderMap::new();

    if let Some(key) = &config.api_key {
        let (name, value) = match config.api_type {
            ApiType::Azure => (API_KEY, key.expose_secret().to_owned()),
            ApiType::Openai | ApiType::AzureAd => (AUTHORIZATION, format!("Bearer {}", key.expose_secret())),
        };

        let mut value = HeaderValue::from_str(&value)
            .map_err(|_| TransportError::InvalidRequest("API key is not a valid header value".to_owned()))?;
        value.set_sensitive(true);
        headers.insert(name, value);
    }

    if let Some(org) = config.organization.as_deref().filter(|_| config.api_type == ApiType::Openai) {
        let value = HeaderValue::from_str(org)
            .map_err(|e| TransportError::InvalidRequest(format!("invalid organization header: {e}")))?;
        headers.insert(OPENAI_ORGANIZATION, value);
    }

    Ok(headers)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, method: Method, url: &Url, body: Bytes) -> Result<TransportResponse, TransportError> {
        let response = self
            .http
            .request(method, url.clone())
            .headers(self.headers.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "Chat completion request failed");
                TransportError::Http(e)
            })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            tracing::warn!(url = %url, status = %status, body = %text, "Upstream returned non-success status");
            return Err(TransportError::from_error_body(status, &text));
        }

        Ok(TransportResponse { status, headers, body })
    }
}
