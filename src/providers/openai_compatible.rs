//! OpenAI-compatible chat-completion client
//!
//! Generic request/response plumbing for providers that speak the
//! `chat/completions` JSON dialect. Provider specifics (name, default URL,
//! default model) come from an [`OpenAICompatibleConfig`] implementation.

use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::{
    chat::{ChatMessage, ChatProvider, ChatResponse, Usage},
    completion::{CompletionProvider, CompletionRequest, CompletionResponse},
    config::ModelConfig,
    error::LLMError,
};

/// Generic OpenAI-compatible provider
pub struct OpenAICompatibleProvider<T: OpenAICompatibleConfig> {
    pub api_key: String,
    pub base_url: Url,
    pub model: String,
    pub temperature: f32,
    pub client: Client,
    _phantom: PhantomData<T>,
}

/// Configuration trait for OpenAI-compatible providers
pub trait OpenAICompatibleConfig: Send + Sync {
    /// The name of the provider, used in logs and error messages
    const PROVIDER_NAME: &'static str;

    /// Default base URL for the provider
    const DEFAULT_BASE_URL: &'static str;

    /// Chat completions endpoint path, relative to the base URL
    const CHAT_ENDPOINT: &'static str = "chat/completions";
}

#[derive(Serialize, Debug)]
pub struct OpenAICompatibleChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Serialize, Debug)]
pub struct OpenAICompatibleChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<OpenAICompatibleChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub temperature: f32,
    pub stream: bool,
}

#[derive(Deserialize, Debug)]
pub struct OpenAICompatibleChatResponse {
    pub choices: Vec<OpenAICompatibleChatChoice>,
    pub usage: Option<Usage>,
}

#[derive(Deserialize, Debug)]
pub struct OpenAICompatibleChatChoice {
    pub message: OpenAICompatibleChatMsg,
}

#[derive(Deserialize, Debug)]
pub struct OpenAICompatibleChatMsg {
    pub role: String,
    pub content: Option<String>,
}

impl ChatResponse for OpenAICompatibleChatResponse {
    fn text(&self) -> Option<String> {
        self.choices.first().and_then(|c| c.message.content.clone())
    }

    fn usage(&self) -> Option<Usage> {
        self.usage.clone()
    }
}

impl std::fmt::Display for OpenAICompatibleChatResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.choices.first().and_then(|c| c.message.content.as_deref()) {
            Some(content) => write!(f, "{content}"),
            None => write!(f, ""),
        }
    }
}

impl<T: OpenAICompatibleConfig> OpenAICompatibleProvider<T> {
    /// Builds a client from validated model settings.
    ///
    /// Fails with [`LLMError::InvalidRequest`] if the base URL does not parse.
    pub fn from_config(config: &ModelConfig) -> Result<Self, LLMError> {
        let raw_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| T::DEFAULT_BASE_URL.to_owned());
        let base_url = Url::parse(&with_trailing_slash(raw_url)).map_err(|e| {
            LLMError::InvalidRequest(format!("invalid {} base URL: {e}", T::PROVIDER_NAME))
        })?;
        let client = Client::builder().build()?;

        Ok(Self {
            api_key: config.api_key.clone(),
            base_url,
            model: config.model.clone(),
            temperature: config.temperature,
            client,
            _phantom: PhantomData,
        })
    }

    async fn send_chat(
        &self,
        messages: &[ChatMessage],
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<OpenAICompatibleChatResponse, LLMError> {
        if self.api_key.is_empty() {
            return Err(LLMError::AuthError(format!("Missing {} API key", T::PROVIDER_NAME)));
        }

        let body = OpenAICompatibleChatRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| OpenAICompatibleChatMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            max_tokens,
            temperature: temperature.unwrap_or(self.temperature),
            stream: false,
        };

        let url = self
            .base_url
            .join(T::CHAT_ENDPOINT)
            .map_err(|e| LLMError::HttpError(e.to_string()))?;

        if log::log_enabled!(log::Level::Trace) {
            if let Ok(json) = serde_json::to_string(&body) {
                log::trace!("{} request payload: {}", T::PROVIDER_NAME, json);
            }
        }

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        log::debug!("{} HTTP status: {}", T::PROVIDER_NAME, status);

        if !status.is_success() {
            let error_text = response.text().await?;
            return Err(status_error::<T>(status, error_text));
        }

        let resp_text = response.text().await?;
        let parsed: OpenAICompatibleChatResponse =
            serde_json::from_str(&resp_text).map_err(|e| LLMError::ResponseFormatError {
                message: format!("Failed to decode {} API response: {e}", T::PROVIDER_NAME),
                raw_response: resp_text.clone(),
            })?;

        if let Some(usage) = &parsed.usage {
            log::debug!(
                "{} usage: prompt={} completion={} total={}",
                T::PROVIDER_NAME,
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        Ok(parsed)
    }
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

/// Maps a non-success HTTP status to the matching error category.
fn status_error<T: OpenAICompatibleConfig>(status: StatusCode, body: String) -> LLMError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LLMError::AuthError(format!(
            "{} rejected the credential ({status}): {body}",
            T::PROVIDER_NAME
        )),
        StatusCode::TOO_MANY_REQUESTS => LLMError::RateLimitError(format!(
            "{} rate limit exceeded: {body}",
            T::PROVIDER_NAME
        )),
        _ => LLMError::ProviderError {
            status: Some(status.as_u16()),
            message: format!("{} API returned error status: {body}", T::PROVIDER_NAME),
        },
    }
}

#[async_trait]
impl<T: OpenAICompatibleConfig> ChatProvider for OpenAICompatibleProvider<T> {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<Box<dyn ChatResponse>, LLMError> {
        let response = self.send_chat(messages, None, None).await?;
        Ok(Box::new(response))
    }
}

/// Completion is a single user-message chat whose reply text is returned.
#[async_trait]
impl<T: OpenAICompatibleConfig> CompletionProvider for OpenAICompatibleProvider<T> {
    async fn complete(&self, req: &CompletionRequest) -> Result<CompletionResponse, LLMError> {
        let messages = [ChatMessage::user().content(req.prompt.as_str()).build()];
        let response = self
            .send_chat(&messages, req.max_tokens, req.temperature)
            .await?;

        let usage = response.usage();
        match response.text() {
            Some(text) => Ok(CompletionResponse { text, usage }),
            None => Err(LLMError::ResponseFormatError {
                message: format!("{} response contained no text content", T::PROVIDER_NAME),
                raw_response: format!("{response:?}"),
            }),
        }
    }
}
