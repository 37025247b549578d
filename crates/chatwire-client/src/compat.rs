/// Path of the chat completions endpoint, relative to the API base
pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Decides whether a model may be used with an endpoint
pub trait ModelCompatibility: Send + Sync {
    /// Whether `model` can be sent to `endpoint` (e.g. "/chat/completions")
    fn supports_model(&self, endpoint: &str, model: &str) -> bool;
}

/// Completion-only models that the chat endpoint rejects
const COMPLETION_ONLY_MODELS: &[&str] = &[
    "gpt-3.5-turbo-instruct",
    "babbage-002",
    "davinci-002",
    "text-davinci-003",
    "text-davinci-002",
    "text-curie-001",
    "text-babbage-001",
    "text-ada-001",
    "davinci",
    "curie",
    "ada",
    "babbage",
];

/// Default [`ModelCompatibility`]: blocks legacy completion models on the chat endpoint
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledModels;

impl ModelCompatibility for DisabledModels {
    fn supports_model(&self, endpoint: &str, model: &str) -> bool {
        endpoint != CHAT_COMPLETIONS_PATH || !COMPLETION_ONLY_MODELS.contains(&model)
    }
}
