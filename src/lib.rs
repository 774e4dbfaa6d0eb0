//! filesort: AI-assisted file organizer
//!
//! Asks an inference provider for a better name, folder and category for
//! each file in a directory, then previews, renames or moves accordingly.

pub mod ai;
pub mod config;
pub mod error;
pub mod execution;
pub mod models;
pub mod services;
pub mod utils;

pub use ai::{build_provider, SuggestionClient, SuggestionProvider, SuggestionValidator};
pub use config::{OrganizerConfig, ProviderConfig, ProviderKind};
pub use error::{ConfigError, PipelineError, ProviderError, Stage};
pub use execution::{ActionExecutor, ActionPlanner, ConflictResolver};
pub use models::{Action, FileProfile, FileReport, ParsedSuggestion, RunReport, Suggestion};
pub use services::{DirectoryOrchestrator, FileProfiler};

use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,filesort=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
