use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::message::ChatMessage;

/// Reason the model stopped generating
///
/// Unknown values are kept verbatim so a newer server does not break
/// decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FinishReason {
    /// Natural end of generation or a stop sequence was hit
    Stop,
    /// Hit the `max_tokens` limit
    Length,
    /// Model decided to call a legacy function
    FunctionCall,
    /// Model decided to call one or more tools
    ToolCalls,
    /// Content was omitted by the content filter
    ContentFilter,
    /// Response still in progress or incomplete
    #[default]
    Null,
    /// Reason not known to this client
    Other(String),
}

impl FinishReason {
    /// Wire value, `None` for [`FinishReason::Null`]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Stop => Some("stop"),
            Self::Length => Some("length"),
            Self::FunctionCall => Some("function_call"),
            Self::ToolCalls => Some("tool_calls"),
            Self::ContentFilter => Some("content_filter"),
            Self::Null => None,
            Self::Other(reason) => Some(reason),
        }
    }
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or("null"))
    }
}

impl From<&str> for FinishReason {
    fn from(value: &str) -> Self {
        match value {
            "stop" => Self::Stop,
            "length" => Self::Length,
            "function_call" => Self::FunctionCall,
            "tool_calls" => Self::ToolCalls,
            "content_filter" => Self::ContentFilter,
            "" | "null" => Self::Null,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl Serialize for FinishReason {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.as_str() {
            Some(reason) if !reason.is_empty() => serializer.serialize_str(reason),
            _ => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for FinishReason {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let reason = Option::<String>::deserialize(deserializer)?;
        Ok(reason.as_deref().map(Self::from).unwrap_or_default())
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the prompt
    pub prompt_tokens: u32,
    /// Tokens generated in the completion
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion)
    pub total_tokens: u32,
}

/// A single completion choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionChoice {
    /// Index of this choice
    pub index: u32,
    /// Generated message
    pub message: ChatMessage,
    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: FinishReason,
    /// Content filter verdicts for the generated message (Azure)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_filter_results: Option<ContentFilterResults>,
}

/// Chat completion response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    /// Unique response identifier
    pub id: String,
    /// Object type (e.g. "chat.completion")
    pub object: String,
    /// Unix timestamp of creation
    pub created: i64,
    /// Model used for generation
    pub model: String,
    /// Generated choices
    pub choices: Vec<ChatCompletionChoice>,
    /// Token usage statistics
    #[serde(default)]
    pub usage: Usage,
    /// Backend configuration fingerprint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_fingerprint: Option<String>,
    /// Content filter verdicts for the prompt (Azure)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_filter_results: Option<Vec<PromptAnnotation>>,
}

impl ChatCompletionResponse {
    /// Message of the first choice, if any
    pub fn first_message(&self) -> Option<&ChatMessage> {
        self.choices.first().map(|choice| &choice.message)
    }
}

/// Verdict of a single content filter category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterVerdict {
    /// Whether the content was filtered
    #[serde(default)]
    pub filtered: bool,
    /// Severity level (e.g. "safe", "low", "medium", "high")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}

/// Content filter verdicts by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentFilterResults {
    /// Hate speech
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hate: Option<FilterVerdict>,
    /// Self-harm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_harm: Option<FilterVerdict>,
    /// Sexual content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sexual: Option<FilterVerdict>,
    /// Violence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violence: Option<FilterVerdict>,
}

impl ContentFilterResults {
    /// Whether any category was filtered
    pub fn any_filtered(&self) -> bool {
        [&self.hate, &self.self_harm, &self.sexual, &self.violence]
            .into_iter()
            .flatten()
            .any(|verdict| verdict.filtered)
    }
}

/// Content filter verdicts for one prompt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptAnnotation {
    /// Index of the prompt the verdicts apply to
    #[serde(default)]
    pub prompt_index: u32,
    /// Verdicts by category
    #[serde(default)]
    pub content_filter_results: ContentFilterResults,
}
