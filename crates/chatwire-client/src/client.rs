use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use bytes::Bytes;
use chatwire_types::{ChatCompletionRequest, ChatCompletionResponse};
use http::{HeaderMap, Method, StatusCode};

use crate::compat::{CHAT_COMPLETIONS_PATH, DisabledModels, ModelCompatibility};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::transport::{HttpTransport, Transport};

/// Decoded response body together with the HTTP metadata it arrived with
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    /// Decoded body
    pub body: T,
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers (rate limits, request IDs)
    pub headers: HeaderMap,
}

impl<T> ApiResponse<T> {
    /// Discard the HTTP metadata
    pub fn into_inner(self) -> T {
        self.body
    }

    /// Header value as a string, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

impl<T> Deref for ApiResponse<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.body
    }
}

/// Client for the chat completions endpoint of an `OpenAI`-compatible API
#[derive(Clone)]
pub struct ChatClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    compatibility: Arc<dyn ModelCompatibility>,
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("api_type", &self.config.api_type)
            .field("base_url", &self.config.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ChatClient {
    /// Create a client that talks HTTP using the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be built from the config
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client with a caller-supplied transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            compatibility: Arc::new(DisabledModels),
        }
    }

    /// Replace the model compatibility check
    #[must_use]
    pub fn with_model_compatibility(mut self, compatibility: Arc<dyn ModelCompatibility>) -> Self {
        self.compatibility = compatibility;
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // -- LLM --

    /// Send a non-streaming chat completion request
    ///
    /// The request is validated before anything is sent: streaming is
    /// rejected, the model must pass the compatibility check, and every
    /// message must have consistent text and parts.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the transport fails, or the
    /// response body cannot be decoded
    pub async fn create_chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ApiResponse<ChatCompletionResponse>> {
        if request.stream {
            return Err(ClientError::StreamNotSupported);
        }

        if !self.compatibility.supports_model(CHAT_COMPLETIONS_PATH, &request.model) {
            return Err(ClientError::UnsupportedModel {
                model: request.model.clone(),
            });
        }

        for (index, message) in request.messages.iter().enumerate() {
            message
                .wire_parts()
                .map_err(|source| ClientError::InvalidMessage { index, source })?;
        }

        let body = serde_json::to_vec(request).map_err(ClientError::Encode)?;
        let url = self.config.chat_completions_url(&request.model)?;

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            url = %url,
            "Sending chat completion request"
        );

        let response = self.transport.send(Method::POST, &url, Bytes::from(body)).await?;
        let body = serde_json::from_slice(&response.body).map_err(ClientError::Decode)?;

        Ok(ApiResponse {
            body,
            status: response.status,
            headers: response.headers,
        })
    }
}
