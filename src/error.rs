//! Error types for the suggestion-to-action pipeline
//!
//! Every per-file failure is a `PipelineError`. The orchestrator converts it
//! into a serializable `FileError` so failures become report data instead of
//! aborting the batch.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline stage a per-file failure originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Profile,
    Suggest,
    Validate,
    Execute,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Profile => "profile",
            Stage::Suggest => "suggest",
            Stage::Validate => "validate",
            Stage::Execute => "execute",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures talking to the inference provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("provider rejected the credential ({status}): {body}")]
    Unauthorized { status: u16, body: String },

    #[error("provider rate limit exceeded: {body}")]
    RateLimited { body: String },

    #[error("API error ({status}): {body}")]
    Http { status: u16, body: String },

    #[error("failed to parse provider response: {0}")]
    MalformedResponse(String),

    #[error("provider returned no text")]
    EmptyResponse,

    #[error("failed to create HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl ProviderError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => ProviderError::Unauthorized { status, body },
            429 => ProviderError::RateLimited { body },
            _ => ProviderError::Http { status, body },
        }
    }
}

/// Errors that can occur while processing a single file
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("cannot read {}: {source}", path.display())]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("provider error: {cause}")]
    Provider {
        #[from]
        cause: ProviderError,
    },

    #[error("no JSON object found in provider response: {preview}")]
    NoStructuredOutput { preview: String },

    #[error("malformed suggestion ({field}): {reason}")]
    MalformedSuggestion { field: String, reason: String },

    #[error("filesystem operation failed on {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::UnreadableFile { .. } => Stage::Profile,
            PipelineError::Provider { .. } | PipelineError::NoStructuredOutput { .. } => {
                Stage::Suggest
            }
            PipelineError::MalformedSuggestion { .. } => Stage::Validate,
            PipelineError::Filesystem { .. } => Stage::Execute,
        }
    }

    pub(crate) fn malformed(field: &str, reason: impl Into<String>) -> Self {
        PipelineError::MalformedSuggestion {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no API key for {provider}: set {env_var} or pass --api-key")]
    MissingApiKey {
        provider: &'static str,
        env_var: &'static str,
    },

    #[error("{} is not a valid directory", .0.display())]
    NotADirectory(PathBuf),
}
