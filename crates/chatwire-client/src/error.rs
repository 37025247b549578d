use chatwire_types::CodecError;
use http::StatusCode;

/// Client-specific result type
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors from a chat completion call
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Streaming was requested through the non-streaming call
    #[error("streaming is not supported by create_chat_completion")]
    StreamNotSupported,

    /// The model cannot be used with the chat completions endpoint
    #[error("model {model} is not supported by the chat completions endpoint")]
    UnsupportedModel {
        /// Requested model
        model: String,
    },

    /// A message set both flat text and conflicting parts
    #[error("invalid message at index {index}: {source}")]
    InvalidMessage {
        /// Position of the message in the request
        index: usize,
        /// Reconciliation failure
        source: CodecError,
    },

    /// Request body could not be serialized
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// Response body or message content had an unexpected shape
    #[error("failed to parse response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The transport failed to deliver the request
    #[error("chat completion request failed: {0}")]
    Transport(#[from] TransportError),
}

/// Errors raised by a [`Transport`](crate::Transport)
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-success status
    #[error("{status} {error_type}: {message}")]
    Api {
        /// HTTP status code
        status: StatusCode,
        /// Error type identifier
        error_type: String,
        /// Human-readable error message
        message: String,
        /// Machine-readable error code, when provided
        code: Option<String>,
        /// Request parameter the error refers to, when provided
        param: Option<String>,
    },

    /// Request could not be built (bad header value, unusable URL)
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// Build an API error from a non-success status and its response body
    ///
    /// Bodies shaped like `{"error": {"message": ..., "type": ...}}` are
    /// unpacked; anything else is kept verbatim as the message.
    pub fn from_error_body(status: StatusCode, body: &str) -> Self {
        let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
        let error = parsed.as_ref().map(|json| &json["error"]).filter(|error| error.is_object());

        let Some(error) = error else {
            return Self::Api {
                status,
                error_type: "unknown".to_owned(),
                message: body.to_owned(),
                code: None,
                param: None,
            };
        };

        let field = |name: &str| match &error[name] {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        };

        Self::Api {
            status,
            error_type: field("type").unwrap_or_else(|| "unknown".to_owned()),
            message: field("message").unwrap_or_else(|| body.to_owned()),
            code: field("code"),
            param: field("param"),
        }
    }

    /// HTTP status of the failure, when the server answered
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            Self::InvalidRequest(_) => None,
        }
    }
}
