//! Mock chat completions backend for integration tests
//!
//! Serves the `OpenAI` and Azure chat completion routes, records every
//! request it sees, and answers with a canned reply

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Request as seen by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request path
    pub path: String,
    /// Raw query string, if any
    pub query: Option<String>,
    /// Azure deployment from the path, if any
    pub deployment: Option<String>,
    /// Request headers
    pub headers: HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

impl RecordedRequest {
    /// Header value as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

/// What the mock answers with
#[derive(Debug, Clone)]
enum Reply {
    /// Assistant message whose `content` is the given JSON value
    Content(Value),
    /// Error status with an `OpenAI`-style error body
    Error(StatusCode, Value),
    /// 200 with a raw, possibly malformed body
    Raw(String),
}

/// Mock backend bound to an ephemeral port
pub struct MockLlm {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockLlmState>,
}

struct MockLlmState {
    reply: Reply,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockLlm {
    /// Start a mock answering with a plain text message
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(Reply::Content(json!("Hello from mock LLM"))).await
    }

    /// Start a mock answering with custom `content` (string or parts array)
    pub async fn start_with_content(content: Value) -> anyhow::Result<Self> {
        Self::start_inner(Reply::Content(content)).await
    }

    /// Start a mock that fails every request
    pub async fn start_failing(status: StatusCode, error: Value) -> anyhow::Result<Self> {
        Self::start_inner(Reply::Error(status, error)).await
    }

    /// Start a mock answering 200 with a raw body
    pub async fn start_with_raw_body(body: &str) -> anyhow::Result<Self> {
        Self::start_inner(Reply::Raw(body.to_owned())).await
    }

    async fn start_inner(reply: Reply) -> anyhow::Result<Self> {
        let state = Arc::new(MockLlmState {
            reply,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(handle_openai))
            .route(
                "/openai/deployments/{deployment}/chat/completions",
                routing::post(handle_azure),
            )
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// `OpenAI`-style base URL, including `/v1`
    pub fn base_url(&self) -> url::Url {
        url::Url::parse(&format!("http://{}/v1", self.addr)).expect("valid mock URL")
    }

    /// Azure-style resource URL, without any path
    pub fn azure_url(&self) -> url::Url {
        url::Url::parse(&format!("http://{}", self.addr)).expect("valid mock URL")
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().expect("mock state poisoned").clone()
    }
}

impl Drop for MockLlm {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

// -- Handlers --

async fn handle_openai(
    State(state): State<Arc<MockLlmState>>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, &uri, None, headers, body)
}

async fn handle_azure(
    State(state): State<Arc<MockLlmState>>,
    Path(deployment): Path<String>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, &uri, Some(deployment), headers, body)
}

fn record(state: &MockLlmState, uri: &Uri, deployment: Option<String>, headers: HeaderMap, body: Value) -> Response {
    let model = body["model"].as_str().unwrap_or("unknown").to_owned();

    state.requests.lock().expect("mock state poisoned").push(RecordedRequest {
        path: uri.path().to_owned(),
        query: uri.query().map(str::to_owned),
        deployment,
        headers,
        body,
    });

    match &state.reply {
        Reply::Content(content) => {
            let response = json!({
                "id": "chatcmpl-test-123",
                "object": "chat.completion",
                "created": 1_700_000_000,
                "model": model,
                "system_fingerprint": "fp_mock",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": content},
                    "finish_reason": "stop",
                }],
                "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15},
            });

            ([("x-request-id", "mock-req-1")], Json(response)).into_response()
        }
        Reply::Error(status, error) => (*status, Json(json!({ "error": error }))).into_response(),
        Reply::Raw(body) => ([("content-type", "application/json")], body.clone()).into_response(),
    }
}
