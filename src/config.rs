//! Model configuration and credential loading.
//!
//! The credential is read from `MISTRAL_API_KEY`, then from a `.env` file
//! in the working directory (or one of its parents), then from the on-disk
//! [`SecretStore`]. A missing key is not an error here: the empty
//! key is carried into the client, which rejects the first request with
//! [`LLMError::AuthError`].

use std::fmt;

use crate::{error::LLMError, secret_store::SecretStore};

/// Environment variable holding the Mistral credential
pub const API_KEY_ENV: &str = "MISTRAL_API_KEY";

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "mistral-large-latest";

/// Sampling temperature used when none is configured
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

const MAX_TEMPERATURE: f32 = 1.5;

/// Reads the API key from the environment, then `.env`, then the secret store.
///
/// Returns an empty string when no source has a key. A missing or malformed
/// `.env` file is treated as having no key.
pub fn load_api_key() -> String {
    let from_env = std::env::var(API_KEY_ENV).ok();
    let from_dotenv = dotenvy::dotenv_iter().ok().and_then(api_key_from_dotenv);
    let store = SecretStore::new().ok();
    resolve_api_key(from_env, from_dotenv, store.as_ref())
}

/// Picks [`API_KEY_ENV`] out of parsed `.env` entries. Later lines win.
fn api_key_from_dotenv<I>(entries: I) -> Option<String>
where
    I: IntoIterator<Item = Result<(String, String), dotenvy::Error>>,
{
    entries
        .into_iter()
        .filter_map(Result::ok)
        .filter(|(name, _)| name == API_KEY_ENV)
        .map(|(_, value)| value)
        .last()
}

fn resolve_api_key(
    from_env: Option<String>,
    from_dotenv: Option<String>,
    store: Option<&SecretStore>,
) -> String {
    from_env
        .filter(|key| !key.is_empty())
        .or_else(|| from_dotenv.filter(|key| !key.is_empty()))
        .or_else(|| store.and_then(|s| s.get(API_KEY_ENV).cloned()))
        .unwrap_or_default()
}

/// Immutable settings for the model client.
#[derive(Clone)]
pub struct ModelConfig {
    /// Model identifier sent with every request
    pub model: String,
    /// Bearer credential; never logged
    pub api_key: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Override for the provider's base URL
    pub base_url: Option<String>,
}

impl ModelConfig {
    pub fn builder() -> ModelConfigBuilder {
        ModelConfigBuilder::default()
    }

    /// Default model and temperature with the credential from [`load_api_key`].
    pub fn from_env() -> Self {
        ModelConfig {
            model: DEFAULT_MODEL.to_string(),
            api_key: load_api_key(),
            temperature: DEFAULT_TEMPERATURE,
            base_url: None,
        }
    }
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_empty() {
            "<unset>"
        } else {
            "<redacted>"
        };
        f.debug_struct("ModelConfig")
            .field("model", &self.model)
            .field("api_key", &api_key)
            .field("temperature", &self.temperature)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Builder for [`ModelConfig`].
///
/// Unset fields fall back to [`DEFAULT_MODEL`], [`DEFAULT_TEMPERATURE`] and
/// [`load_api_key`].
#[derive(Default)]
pub struct ModelConfigBuilder {
    model: Option<String>,
    api_key: Option<String>,
    temperature: Option<f32>,
    base_url: Option<String>,
}

impl ModelConfigBuilder {
    /// Sets the model identifier.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the API key, bypassing environment lookup.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the base URL for API requests.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Validates the settings and produces the config.
    ///
    /// The API key is not checked here; see the module docs.
    pub fn build(self) -> Result<ModelConfig, LLMError> {
        let model = self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        if model.trim().is_empty() {
            return Err(LLMError::InvalidRequest("model name must not be empty".into()));
        }

        let temperature = self.temperature.unwrap_or(DEFAULT_TEMPERATURE);
        if !(0.0..=MAX_TEMPERATURE).contains(&temperature) {
            return Err(LLMError::InvalidRequest(format!(
                "temperature must be between 0.0 and {MAX_TEMPERATURE}, got {temperature}"
            )));
        }

        Ok(ModelConfig {
            model,
            api_key: self.api_key.unwrap_or_else(load_api_key),
            temperature,
            base_url: self.base_url,
        })
    }
}
