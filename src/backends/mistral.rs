//! Mistral API client implementation using the OpenAI-compatible base
//!
//! This module provides integration with Mistral's hosted chat models.

use crate::providers::openai_compatible::{OpenAICompatibleConfig, OpenAICompatibleProvider};

/// Mistral configuration for the generic provider
pub struct MistralConfig;

impl OpenAICompatibleConfig for MistralConfig {
    const PROVIDER_NAME: &'static str = "Mistral";
    const DEFAULT_BASE_URL: &'static str = "https://api.mistral.ai/v1/";
}

/// Type alias for Mistral client using the generic OpenAI-compatible provider
pub type Mistral = OpenAICompatibleProvider<MistralConfig>;
