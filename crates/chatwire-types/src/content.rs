//! Message content parts and the string-or-array `content` codec
//!
//! The API accepts (and returns) a message's `content` either as a bare
//! string or as an array of typed parts. In memory it is always a [`Parts`]
//! list; the string form only exists at the serde boundary.

use std::fmt;
use std::ops::Deref;

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Discriminator of a content part (`type` on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Plain text
    Text,
    /// Image referenced by URL or data URI
    ImageUrl,
}

impl ContentType {
    /// Wire name of the discriminator
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::ImageUrl => "image_url",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single unit of message content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Text content block
    Text {
        /// The text string
        text: String,
    },
    /// Image reference
    ImageUrl {
        /// URL or base64 data URI for the image
        image_url: String,
    },
}

impl ContentPart {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create an image part from a URL or data URI
    pub fn image_url(url: impl Into<String>) -> Self {
        Self::ImageUrl { image_url: url.into() }
    }

    /// Discriminator of this part
    pub const fn kind(&self) -> ContentType {
        match self {
            Self::Text { .. } => ContentType::Text,
            Self::ImageUrl { .. } => ContentType::ImageUrl,
        }
    }

    /// Text payload, if this is a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::ImageUrl { .. } => None,
        }
    }

    /// Image reference, if this is an image part
    pub fn as_image_url(&self) -> Option<&str> {
        match self {
            Self::ImageUrl { image_url } => Some(image_url),
            Self::Text { .. } => None,
        }
    }
}

/// Ordered list of content parts, in presentation order
///
/// Encodes as:
/// - `""` when empty
/// - a bare string when it holds exactly one text part
/// - an array of part objects otherwise
///
/// Decodes `""` to an empty list and any other string to a single text
/// part; arrays are decoded element by element. Every other JSON shape,
/// `null` included, is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parts(Vec<ContentPart>);

impl Parts {
    /// Create an empty list
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Text of the only part, when the list collapses to a bare string
    pub fn single_text(&self) -> Option<&str> {
        match self.0.as_slice() {
            [part] => part.as_text(),
            _ => None,
        }
    }

    /// Consume the list, returning the underlying parts
    pub fn into_inner(self) -> Vec<ContentPart> {
        self.0
    }
}

impl Deref for Parts {
    type Target = [ContentPart];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<ContentPart>> for Parts {
    fn from(parts: Vec<ContentPart>) -> Self {
        Self(parts)
    }
}

impl FromIterator<ContentPart> for Parts {
    fn from_iter<I: IntoIterator<Item = ContentPart>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Parts {
    type Item = ContentPart;
    type IntoIter = std::vec::IntoIter<ContentPart>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Parts {
    type Item = &'a ContentPart;
    type IntoIter = std::slice::Iter<'a, ContentPart>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for Parts {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0.as_slice() {
            [] => serializer.serialize_str(""),
            // An empty text part collapses to "" as well
            [ContentPart::Text { text }] => serializer.serialize_str(text),
            parts => parts.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Parts {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(PartsVisitor)
    }
}

struct PartsVisitor;

impl<'de> Visitor<'de> for PartsVisitor {
    type Value = Parts;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or an array of content parts")
    }

    fn visit_str<E>(self, value: &str) -> Result<Parts, E>
    where
        E: de::Error,
    {
        self.visit_string(value.to_owned())
    }

    fn visit_string<E>(self, value: String) -> Result<Parts, E>
    where
        E: de::Error,
    {
        if value.is_empty() {
            return Ok(Parts::new());
        }
        Ok(Parts(vec![ContentPart::Text { text: value }]))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Parts, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut parts = Vec::new();
        while let Some(part) = seq.next_element::<ContentPart>()? {
            parts.push(part);
        }
        Ok(Parts(parts))
    }
}
