use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::content::{ContentPart, Parts};
use crate::error::CodecError;
use crate::tool::ToolType;

/// Role of a message participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instruction
    System,
    /// User message
    User,
    /// Assistant response
    Assistant,
    /// Function result (legacy function calling)
    Function,
    /// Tool result
    Tool,
}

/// Message in a conversation
///
/// `content` and `parts` are two views of the single `content` slot on the
/// wire. Set one of them: `content` for plain text, `parts` for anything
/// else. Decoding fills `parts` from whatever the server sent and mirrors
/// it into `content` when it is a single text part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Role of the message author
    pub role: Role,
    /// Flat text view of the content
    pub content: String,
    /// Structured view of the content
    pub parts: Parts,
    /// Optional participant name
    pub name: Option<String>,
    /// Legacy function call made by the assistant
    pub function_call: Option<FunctionCall>,
    /// Tool calls made by the assistant
    pub tool_calls: Vec<ToolCall>,
    /// ID of the tool call this message responds to
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    /// Create an empty message with the given role
    pub const fn new(role: Role) -> Self {
        Self {
            role,
            content: String::new(),
            parts: Parts::new(),
            name: None,
            function_call: None,
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// Create a plain-text message
    pub fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::new(role)
        }
    }

    /// Create a message from structured parts
    pub fn with_parts(role: Role, parts: impl Into<Parts>) -> Self {
        Self {
            parts: parts.into(),
            ..Self::new(role)
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::text(Role::System, content)
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::text(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text(Role::Assistant, content)
    }

    /// Create a tool result message
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::text(Role::Tool, content)
        }
    }

    /// Set the participant name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Flat text of the message, empty unless the content is a single text part
    pub fn text_content(&self) -> &str {
        if self.content.is_empty() {
            self.parts.single_text().unwrap_or_default()
        } else {
            &self.content
        }
    }

    /// Reconcile the two content views into the parts that go on the wire
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::ContentConflict`] when `content` is set and
    /// `parts` holds anything other than that same text as a single part.
    pub fn wire_parts(&self) -> Result<Cow<'_, Parts>, CodecError> {
        if self.content.is_empty() {
            return Ok(Cow::Borrowed(&self.parts));
        }

        // Mirrored views must be checked before the conflict rule, otherwise
        // a decoded message could not be sent back as-is
        if self.parts.single_text() == Some(self.content.as_str()) {
            return Ok(Cow::Borrowed(&self.parts));
        }

        if !self.parts.is_empty() {
            return Err(CodecError::ContentConflict);
        }

        Ok(Cow::Owned(Parts::from(vec![ContentPart::text(self.content.clone())])))
    }
}

/// Borrowed wire shape used for encoding
#[derive(Serialize)]
struct WireMessageRef<'a> {
    role: Role,
    content: Cow<'a, Parts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<&'a FunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<&'a [ToolCall]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<&'a str>,
}

/// Owned wire shape used for decoding
#[derive(Deserialize)]
struct WireMessage {
    role: Role,
    #[serde(default)]
    content: Parts,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    function_call: Option<FunctionCall>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
    #[serde(default)]
    tool_call_id: Option<String>,
}

impl Serialize for ChatMessage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let content = self.wire_parts().map_err(serde::ser::Error::custom)?;

        WireMessageRef {
            role: self.role,
            content,
            name: self.name.as_deref(),
            function_call: self.function_call.as_ref(),
            tool_calls: (!self.tool_calls.is_empty()).then_some(self.tool_calls.as_slice()),
            tool_call_id: self.tool_call_id.as_deref(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ChatMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = WireMessage::deserialize(deserializer)?;
        let content = wire.content.single_text().map(ToOwned::to_owned).unwrap_or_default();

        Ok(Self {
            role: wire.role,
            content,
            parts: wire.content,
            name: wire.name,
            function_call: wire.function_call,
            tool_calls: wire.tool_calls.unwrap_or_default(),
            tool_call_id: wire.tool_call_id,
        })
    }
}

/// A tool call requested by the assistant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call
    pub id: String,
    /// Tool type (always "function")
    #[serde(rename = "type", default)]
    pub tool_type: ToolType,
    /// Function name and arguments
    pub function: FunctionCall,
}

impl ToolCall {
    /// Create a function tool call
    pub fn function(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tool_type: ToolType::Function,
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }
}

/// Function name and arguments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Function name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// JSON-encoded arguments
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub arguments: String,
}
