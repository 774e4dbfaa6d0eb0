//! Inference provider access
//!
//! Provider clients, prompt construction, JSON extraction and validation of
//! the provider's answer into a `Suggestion`.

pub mod client;
pub mod gemini;
pub mod json_parser;
pub mod prompts;
pub mod suggest;
pub mod validator;

use std::sync::Arc;

pub use client::{AnthropicClient, SuggestionProvider};
pub use gemini::GeminiClient;
pub use suggest::{RawSuggestion, SuggestionClient};
pub use validator::SuggestionValidator;

use crate::config::{ProviderConfig, ProviderKind};
use crate::error::ProviderError;

/// Construct the client for the configured provider
pub fn build_provider(config: ProviderConfig) -> Result<Arc<dyn SuggestionProvider>, ProviderError> {
    let provider: Arc<dyn SuggestionProvider> = match config.kind {
        ProviderKind::Gemini => Arc::new(GeminiClient::new(config)?),
        ProviderKind::Anthropic => Arc::new(AnthropicClient::new(config)?),
    };
    Ok(provider)
}
