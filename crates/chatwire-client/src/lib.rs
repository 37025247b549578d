//! Typed client for `OpenAI`-compatible chat completions
//!
//! ```no_run
//! use chatwire_client::{ChatClient, ClientConfig};
//! use chatwire_types::{ChatCompletionRequest, ChatMessage};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ChatClient::new(ClientConfig::from_env()?)?;
//!
//! let request = ChatCompletionRequest::new("gpt-4o-mini", vec![ChatMessage::user("Hello!")]);
//! let response = client.create_chat_completion(&request).await?;
//!
//! if let Some(message) = response.first_message() {
//!     println!("{}", message.content);
//! }
//! # Ok(())
//! # }
//! ```

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod client;
pub mod compat;
pub mod config;
pub mod error;
pub mod transport;

pub use chatwire_types as types;
pub use client::{ApiResponse, ChatClient};
pub use compat::{CHAT_COMPLETIONS_PATH, DisabledModels, ModelCompatibility};
pub use config::{ApiType, ClientConfig, ConfigError};
pub use error::{ClientError, Result, TransportError};
pub use transport::{HttpTransport, Transport, TransportResponse};
