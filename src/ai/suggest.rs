//! Suggestion requests
//!
//! Formats the prompt for one file, performs the single provider call, and
//! pulls the JSON payload out of the free-form answer.

use std::sync::Arc;

use super::client::SuggestionProvider;
use super::json_parser::extract_json_object;
use super::prompts::{build_suggestion_prompt, SUGGESTION_SYSTEM_PROMPT};
use crate::error::PipelineError;
use crate::models::FileProfile;
use crate::utils::excerpt;

/// JSON-shaped payload extracted from a provider answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSuggestion {
    /// Extracted object text
    pub payload: String,
    /// Complete provider answer, kept for diagnostics
    pub response: String,
}

pub struct SuggestionClient {
    provider: Arc<dyn SuggestionProvider>,
}

impl SuggestionClient {
    pub fn new(provider: Arc<dyn SuggestionProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Ask the provider for a suggestion for one file
    pub async fn suggest(&self, profile: &FileProfile) -> Result<RawSuggestion, PipelineError> {
        let prompt = build_suggestion_prompt(profile);

        tracing::debug!(
            provider = self.provider.name(),
            file = %profile.name,
            prompt_chars = prompt.len(),
            "Requesting suggestion"
        );

        let response = self
            .provider
            .complete(SUGGESTION_SYSTEM_PROMPT, &prompt)
            .await?;

        let payload =
            extract_json_object(&response).ok_or_else(|| PipelineError::NoStructuredOutput {
                preview: excerpt(&response, 200),
            })?;

        tracing::debug!(file = %profile.name, payload = %payload, "Extracted suggestion payload");

        Ok(RawSuggestion { payload, response })
    }
}
