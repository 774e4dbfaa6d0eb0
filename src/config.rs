//! Run configuration
//!
//! Mode flags and provider settings are resolved once at startup and passed
//! explicitly into the orchestrator and the provider clients.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of characters of text preview sent to the provider
pub const DEFAULT_PREVIEW_CHARS: usize = 2000;

/// System artifacts that are never profiled, sent to the provider, or moved
pub const SKIP_FILES: &[&str] = &[
    ".DS_Store",
    ".localized",
    "Thumbs.db",
    ".gitignore",
    "desktop.ini",
    ".gitkeep",
];

/// Which inference back-end to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Gemini,
    Anthropic,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::Anthropic => "anthropic",
        }
    }

    /// Environment variable holding the API key for this provider
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

/// Connection settings for an inference provider
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,

    /// API key (never logged)
    pub api_key: String,

    /// Base URL without a trailing slash
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Upper bound on response tokens
    pub max_tokens: u32,

    /// Whole-request timeout
    pub timeout: Duration,
}

impl ProviderConfig {
    /// Defaults for a provider, without a key
    pub fn for_kind(kind: ProviderKind) -> Self {
        let (base_url, model) = match kind {
            ProviderKind::Gemini => (
                "https://generativelanguage.googleapis.com",
                "gemini-2.0-flash",
            ),
            ProviderKind::Anthropic => ("https://api.anthropic.com", "claude-sonnet-4-5"),
        };

        Self {
            kind,
            api_key: String::new(),
            base_url: base_url.to_string(),
            model: model.to_string(),
            max_tokens: 300,
            timeout: Duration::from_secs(120),
        }
    }

    /// Resolve settings from an explicit key and the environment.
    ///
    /// The key falls back to the provider's own variable. `FILESORT_MODEL`
    /// and `FILESORT_BASE_URL` override the defaults.
    pub fn resolve(kind: ProviderKind, api_key: Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::for_kind(kind);

        config.api_key = api_key
            .or_else(|| std::env::var(kind.api_key_env()).ok())
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey {
                provider: kind.as_str(),
                env_var: kind.api_key_env(),
            })?;

        if let Ok(model) = std::env::var("FILESORT_MODEL") {
            config.model = model;
        }
        if let Ok(base_url) = std::env::var("FILESORT_BASE_URL") {
            config.base_url = base_url;
        }

        Ok(config.normalized())
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self.normalized()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn normalized(mut self) -> Self {
        while self.base_url.ends_with('/') {
            self.base_url.pop();
        }
        self
    }
}

/// Mode flags and profiling limits for one directory pass
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerConfig {
    /// Move files into `<category>/<folder>/`
    pub move_enabled: bool,

    /// Rename files to the suggested name
    pub rename_enabled: bool,

    /// Character budget for text previews
    pub preview_chars: usize,

    /// Exact (case-sensitive) names that are never processed
    pub skip_files: Vec<String>,
}

impl OrganizerConfig {
    pub fn new(move_enabled: bool, rename_enabled: bool) -> Self {
        Self {
            move_enabled,
            rename_enabled,
            ..Self::default()
        }
    }

    /// True when no filesystem mutation may happen
    pub fn is_preview(&self) -> bool {
        !self.move_enabled && !self.rename_enabled
    }

    pub fn is_skipped(&self, name: &str) -> bool {
        self.skip_files.iter().any(|s| s == name)
    }
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            move_enabled: false,
            rename_enabled: false,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            skip_files: SKIP_FILES.iter().map(|s| s.to_string()).collect(),
        }
    }
}
