//! Wire types for `OpenAI`-compatible chat completions
//!
//! The interesting part is message content: the API sends it either as a
//! bare string or as an array of typed parts. [`Parts`] is the single
//! in-memory form and owns the string/array codec, while [`ChatMessage`]
//! keeps its flat `content` view and its `parts` view consistent.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod content;
pub mod error;
pub mod message;
pub mod request;
pub mod response;
pub mod tool;

pub use content::{ContentPart, ContentType, Parts};
pub use error::CodecError;
pub use message::{ChatMessage, FunctionCall, Role, ToolCall};
pub use request::{ChatCompletionRequest, ResponseFormat, ResponseFormatType};
pub use response::{
    ChatCompletionChoice, ChatCompletionResponse, ContentFilterResults, FilterVerdict, FinishReason, PromptAnnotation,
    Usage,
};
pub use tool::{
    FunctionCallChoice, FunctionCallMode, FunctionDefinition, FunctionName, Tool, ToolChoice, ToolChoiceFunction,
    ToolChoiceMode, ToolType,
};
