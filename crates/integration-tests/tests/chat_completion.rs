mod harness;

use axum::http::StatusCode;
use chatwire_client::{ChatClient, ClientConfig, ClientError, TransportError};
use chatwire_types::{ChatCompletionRequest, ChatMessage, ContentPart, FinishReason, Role};
use harness::mock_llm::MockLlm;
use serde_json::json;

fn client_for(mock: &MockLlm) -> ChatClient {
    let config = ClientConfig::new("sk-test")
        .with_base_url(mock.base_url())
        .with_organization("org-test");
    ChatClient::new(config).unwrap()
}

#[tokio::test]
async fn chat_completion_returns_response() {
    let mock = MockLlm::start().await.unwrap();
    let request = ChatCompletionRequest::new("mock-model-1", vec![ChatMessage::user("Hello")]);

    let response = client_for(&mock).create_chat_completion(&request).await.unwrap();

    assert_eq!(response.object, "chat.completion");
    assert_eq!(response.model, "mock-model-1");
    assert_eq!(response.system_fingerprint.as_deref(), Some("fp_mock"));
    assert_eq!(response.choices[0].finish_reason, FinishReason::Stop);

    let message = response.first_message().unwrap();
    assert_eq!(message.role, Role::Assistant);
    assert_eq!(message.content, "Hello from mock LLM");
    assert_eq!(message.parts[..], [ContentPart::text("Hello from mock LLM")]);

    assert_eq!(response.header("x-request-id"), Some("mock-req-1"));
}

#[tokio::test]
async fn request_body_uses_string_content() {
    let mock = MockLlm::start().await.unwrap();
    let request = ChatCompletionRequest::new(
        "mock-model-1",
        vec![ChatMessage::system("Be brief."), ChatMessage::user("Hello")],
    )
    .with_temperature(0.5);

    client_for(&mock).create_chat_completion(&request).await.unwrap();

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/v1/chat/completions");
    assert_eq!(
        requests[0].body["messages"],
        json!([
            {"role": "system", "content": "Be brief."},
            {"role": "user", "content": "Hello"},
        ])
    );
    assert_eq!(requests[0].body["temperature"], 0.5);
    assert!(requests[0].body.get("stream").is_none());
}

#[tokio::test]
async fn image_parts_are_sent_as_an_array() {
    let mock = MockLlm::start().await.unwrap();
    let message = ChatMessage::with_parts(
        Role::User,
        vec![
            ContentPart::image_url("https://example.com/cat.png"),
            ContentPart::text("What is this?"),
        ],
    );
    let request = ChatCompletionRequest::new("gpt-4o", vec![message]);

    client_for(&mock).create_chat_completion(&request).await.unwrap();

    assert_eq!(
        mock.requests()[0].body["messages"][0]["content"],
        json!([
            {"type": "image_url", "image_url": "https://example.com/cat.png"},
            {"type": "text", "text": "What is this?"},
        ])
    );
}

#[tokio::test]
async fn array_content_in_reply_is_decoded_into_parts() {
    let mock = MockLlm::start_with_content(json!([
        {"type": "text", "text": "first"},
        {"type": "text", "text": "second"},
    ]))
    .await
    .unwrap();
    let request = ChatCompletionRequest::new("mock-model-1", vec![ChatMessage::user("Hello")]);

    let response = client_for(&mock).create_chat_completion(&request).await.unwrap();

    let message = response.first_message().unwrap();
    assert!(message.content.is_empty());
    assert_eq!(message.parts[..], [ContentPart::text("first"), ContentPart::text("second")]);
}

#[tokio::test]
async fn empty_reply_content_decodes_to_empty_message() {
    let mock = MockLlm::start_with_content(json!("")).await.unwrap();
    let request = ChatCompletionRequest::new("mock-model-1", vec![ChatMessage::user("Hello")]);

    let response = client_for(&mock).create_chat_completion(&request).await.unwrap();

    let message = response.first_message().unwrap();
    assert!(message.content.is_empty());
    assert!(message.parts.is_empty());
}

#[tokio::test]
async fn malformed_reply_content_is_a_decode_error() {
    let mock = MockLlm::start_with_content(json!(42)).await.unwrap();
    let request = ChatCompletionRequest::new("mock-model-1", vec![ChatMessage::user("Hello")]);

    let err = client_for(&mock).create_chat_completion(&request).await.unwrap_err();

    assert!(matches!(err, ClientError::Decode(_)), "{err}");
}

#[tokio::test]
async fn non_json_reply_is_a_decode_error() {
    let mock = MockLlm::start_with_raw_body("not json").await.unwrap();
    let request = ChatCompletionRequest::new("mock-model-1", vec![ChatMessage::user("Hello")]);

    let err = client_for(&mock).create_chat_completion(&request).await.unwrap_err();

    assert!(matches!(err, ClientError::Decode(_)), "{err}");
}

#[tokio::test]
async fn error_status_carries_api_message() {
    let mock = MockLlm::start_failing(
        StatusCode::UNAUTHORIZED,
        json!({"message": "Incorrect API key provided", "type": "invalid_request_error", "code": "invalid_api_key"}),
    )
    .await
    .unwrap();
    let request = ChatCompletionRequest::new("mock-model-1", vec![ChatMessage::user("Hello")]);

    let err = client_for(&mock).create_chat_completion(&request).await.unwrap_err();

    let ClientError::Transport(TransportError::Api {
        status,
        error_type,
        message,
        code,
        ..
    }) = &err
    else {
        panic!("expected API error, got {err:?}");
    };
    assert_eq!(*status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_type, "invalid_request_error");
    assert_eq!(message, "Incorrect API key provided");
    assert_eq!(code.as_deref(), Some("invalid_api_key"));
    assert_eq!(mock.requests().len(), 1);
}

#[tokio::test]
async fn rejected_requests_never_reach_the_server() {
    let mock = MockLlm::start().await.unwrap();
    let client = client_for(&mock);

    let streaming = ChatCompletionRequest {
        stream: true,
        ..ChatCompletionRequest::new("mock-model-1", vec![ChatMessage::user("Hello")])
    };
    let err = client.create_chat_completion(&streaming).await.unwrap_err();
    assert!(matches!(err, ClientError::StreamNotSupported));

    let legacy = ChatCompletionRequest::new("gpt-3.5-turbo-instruct", vec![ChatMessage::user("Hello")]);
    let err = client.create_chat_completion(&legacy).await.unwrap_err();
    assert!(matches!(err, ClientError::UnsupportedModel { .. }));

    let mut conflicting = ChatMessage::user("a");
    conflicting.parts = vec![ContentPart::text("b")].into();
    let conflict = ChatCompletionRequest::new("mock-model-1", vec![conflicting]);
    let err = client.create_chat_completion(&conflict).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidMessage { index: 0, .. }));

    assert!(mock.requests().is_empty());
}

