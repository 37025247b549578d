//! Client configuration
//!
//! A [`ClientConfig`] can be built in code, read from the environment, or
//! loaded from a TOML file:
//!
//! ```toml
//! api_type = "azure"
//! api_key = "..."
//! base_url = "https://my-resource.openai.azure.com"
//! api_version = "2024-02-01"
//! timeout = "30s"
//!
//! [deployments]
//! "gpt-4o" = "prod-gpt4o"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use url::Url;

use crate::error::TransportError;

/// Default `OpenAI` API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Azure API version used when none is configured
pub const DEFAULT_AZURE_API_VERSION: &str = "2023-05-15";

/// Default whole-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Errors raised while building a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        /// File that was read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values are present but inconsistent
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Flavour of the remote API, which decides URL layout and authentication
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiType {
    /// `OpenAI` or a compatible server, bearer token auth
    #[default]
    Openai,
    /// Azure `OpenAI` with an `api-key` header
    Azure,
    /// Azure `OpenAI` with an Entra ID (Azure AD) bearer token
    AzureAd,
}

impl ApiType {
    /// Whether requests use the Azure deployment URL layout
    pub const fn is_azure(self) -> bool {
        matches!(self, Self::Azure | Self::AzureAd)
    }
}

/// Configuration for a [`ChatClient`](crate::ChatClient)
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// API flavour
    #[serde(default)]
    pub api_type: ApiType,
    /// API key or bearer token
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL of the API
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// `OpenAI` organization sent as `OpenAI-Organization`
    #[serde(default)]
    pub organization: Option<String>,
    /// Azure API version query parameter
    #[serde(default)]
    pub api_version: Option<String>,
    /// Azure model name to deployment name overrides
    #[serde(default)]
    pub deployments: HashMap<String, String>,
    /// Whole-request timeout (e.g. "30s", "2m")
    #[serde(default = "default_timeout", deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("valid default URL")
}

const fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    duration_str::parse(&s).map_err(|e| serde::de::Error::custom(format!("invalid duration '{s}': {e}")))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_type: ApiType::default(),
            api_key: None,
            base_url: default_base_url(),
            organization: None,
            api_version: None,
            deployments: HashMap::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Configuration for the public `OpenAI` API
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::from(api_key.into())),
            ..Self::default()
        }
    }

    /// Configuration for an Azure `OpenAI` resource using `api-key` auth
    pub fn azure(api_key: impl Into<String>, base_url: Url) -> Self {
        Self {
            api_type: ApiType::Azure,
            api_key: Some(SecretString::from(api_key.into())),
            base_url,
            api_version: Some(DEFAULT_AZURE_API_VERSION.to_owned()),
            ..Self::default()
        }
    }

    /// Read configuration from `OPENAI_API_KEY`, `OPENAI_BASE_URL` and `OPENAI_ORG_ID`
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the base URL is invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        if api_key.trim().is_empty() {
            return Err(ConfigError::Invalid("missing OPENAI_API_KEY".to_owned()));
        }

        let mut config = Self::new(api_key);

        let base_url = std::env::var("OPENAI_BASE_URL").unwrap_or_default();
        if !base_url.trim().is_empty() {
            config.base_url = Url::parse(base_url.trim())
                .map_err(|e| ConfigError::Invalid(format!("invalid OPENAI_BASE_URL: {e}")))?;
        }

        config.organization = std::env::var("OPENAI_ORG_ID").ok().filter(|org| !org.trim().is_empty());

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;

        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(raw)?;

        if config.api_type.is_azure() && config.api_version.is_none() {
            config.api_version = Some(DEFAULT_AZURE_API_VERSION.to_owned());
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path, the timeout is
    /// zero, or an Azure configuration lacks its key or API version
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid(format!(
                "base URL cannot carry a path: {}",
                self.base_url
            )));
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid("timeout must be greater than zero".to_owned()));
        }

        if self.api_type.is_azure() {
            if self.api_key.is_none() {
                return Err(ConfigError::Invalid("Azure configuration requires api_key".to_owned()));
            }
            if self.api_version.as_deref().is_none_or(|v| v.trim().is_empty()) {
                return Err(ConfigError::Invalid("Azure configuration requires api_version".to_owned()));
            }
        }

        Ok(())
    }

    /// Override the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Set the `OpenAI` organization
    #[must_use]
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Override the request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Map a model name to an Azure deployment name
    #[must_use]
    pub fn with_deployment(mut self, model: impl Into<String>, deployment: impl Into<String>) -> Self {
        self.deployments.insert(model.into(), deployment.into());
        self
    }

    // -- Endpoints --

    /// Azure deployment serving a model
    ///
    /// Explicit mappings win; otherwise the model name with `.` and `:`
    /// removed, since Azure rejects both in deployment names.
    pub fn deployment_for(&self, model: &str) -> String {
        self.deployments
            .get(model)
            .cloned()
            .unwrap_or_else(|| model.replace(['.', ':'], ""))
    }

    /// Full chat completions URL for a model
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path
    pub fn chat_completions_url(&self, model: &str) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        let deployment = self.deployment_for(model);

        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                TransportError::InvalidRequest(format!("base URL cannot carry a path: {}", self.base_url))
            })?;
            segments.pop_if_empty();

            if self.api_type.is_azure() {
                segments.extend(["openai", "deployments", deployment.as_str()]);
            }
            segments.extend(["chat", "completions"]);
        }

        if self.api_type.is_azure() {
            let version = self.api_version.as_deref().unwrap_or(DEFAULT_AZURE_API_VERSION);
            url.query_pairs_mut().append_pair("api-version", version);
        }

        Ok(url)
    }
}
