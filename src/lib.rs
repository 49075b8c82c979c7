//! A small conversational assistant backed by Mistral's hosted chat models.
//!
//! # Overview
//! A [`generator::ResponseGenerator`] renders a fixed conversational prompt
//! from the caller's chat history and a new question, sends it through a
//! model client and returns the reply as plain text. The caller owns the
//! history and appends both turns after each reply.
//!
//! # Architecture
//! - [`config`] loads the API key and holds the immutable model settings
//! - [`backends`] and [`providers`] implement the remote chat-completion client
//! - [`prompt`] renders the prompt template
//! - [`generator`] ties rendering, the model call and text extraction together

// Re-export for convenience
pub use async_trait::async_trait;

/// Backend implementations for supported providers
pub mod backends;

/// Chat messages and chat-style provider trait
pub mod chat;

/// Single-prompt text completion
pub mod completion;

/// Model settings and credential loading
pub mod config;

/// Error types and handling
pub mod error;

/// Render, call, extract pipeline
pub mod generator;

/// Prompt templates
pub mod prompt;

/// Shared plumbing for OpenAI-compatible HTTP APIs
pub mod providers;

/// Secret store for storing API keys
pub mod secret_store;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
/// This is a no-op if the feature is not enabled.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}
