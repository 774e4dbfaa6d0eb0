//! Directory orchestration
//!
//! Drives every eligible file in one directory through
//! profile → suggest → validate → plan → resolve → execute, one file at a
//! time. Per-file failures are recorded in the run report and never abort
//! the batch.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use super::profiler::FileProfiler;
use crate::ai::{SuggestionClient, SuggestionProvider, SuggestionValidator};
use crate::config::OrganizerConfig;
use crate::error::{ConfigError, PipelineError};
use crate::execution::{ActionExecutor, ActionPlanner, ConflictResolver};
use crate::models::{FileReport, RunReport, Suggestion};

/// Directory entries selected for processing, in name order
#[derive(Debug, Default)]
struct Candidates {
    /// `Err` for entries that could not be inspected during enumeration
    files: Vec<Result<PathBuf, (PathBuf, std::io::Error)>>,
    skipped: Vec<String>,
}

pub struct DirectoryOrchestrator {
    config: OrganizerConfig,
    profiler: FileProfiler,
    client: SuggestionClient,
}

impl DirectoryOrchestrator {
    pub fn new(config: OrganizerConfig, provider: Arc<dyn SuggestionProvider>) -> Self {
        Self {
            profiler: FileProfiler::new(config.preview_chars),
            client: SuggestionClient::new(provider),
            config,
        }
    }

    pub fn config(&self) -> &OrganizerConfig {
        &self.config
    }

    /// Organize the immediate files of `directory`.
    ///
    /// `on_progress` is called once per file, in directory order, right after
    /// that file's pipeline finishes.
    pub async fn run<F>(&self, directory: &Path, mut on_progress: F) -> Result<RunReport, ConfigError>
    where
        F: FnMut(&FileReport),
    {
        if !directory.is_dir() {
            return Err(ConfigError::NotADirectory(directory.to_path_buf()));
        }
        let directory = std::path::absolute(directory)
            .map_err(|_| ConfigError::NotADirectory(directory.to_path_buf()))?;

        let mut report = RunReport::new(
            directory.clone(),
            self.config.move_enabled,
            self.config.rename_enabled,
        );

        let candidates = self.collect_candidates(&directory);
        report.skipped_system_files = candidates.skipped;

        tracing::info!(
            dir = %directory.display(),
            files = candidates.files.len(),
            provider = self.client.provider_name(),
            preview = self.config.is_preview(),
            "Starting directory pass"
        );

        let mut resolver = ConflictResolver::new();
        for candidate in candidates.files {
            let entry = match candidate {
                Ok(path) => self.process_file(&path, &mut resolver).await,
                Err((path, source)) => {
                    let err = PipelineError::UnreadableFile {
                        path: path.clone(),
                        source,
                    };
                    self.failed(&path, None, err)
                }
            };
            on_progress(&entry);
            report.push(entry);
        }

        report.finish();
        tracing::info!(summary = %report.summary(), "Directory pass finished");

        Ok(report)
    }

    /// Immediate non-directory entries, sorted by name, minus the skip list
    fn collect_candidates(&self, directory: &Path) -> Candidates {
        let mut candidates = Candidates::default();

        let walker = WalkDir::new(directory)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read directory entry");
                    if let Some(path) = e.path().map(Path::to_path_buf) {
                        let source = e
                            .into_io_error()
                            .unwrap_or_else(|| std::io::Error::other("directory loop"));
                        candidates.files.push(Err((path, source)));
                    }
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy();
            if self.config.is_skipped(&name) {
                tracing::debug!(file = %name, "Skipping system file");
                candidates.skipped.push(name.into_owned());
                continue;
            }

            // Follows symlinks, so links to directories are excluded too
            if entry.path().is_dir() {
                continue;
            }

            candidates.files.push(Ok(entry.into_path()));
        }

        candidates
    }

    /// Run the whole pipeline for one file; failures become report data
    async fn process_file(&self, path: &Path, resolver: &mut ConflictResolver) -> FileReport {
        let profile = match self.profiler.profile(path) {
            Ok(profile) => profile,
            Err(e) => return self.failed(path, None, e),
        };

        let raw = match self.client.suggest(&profile).await {
            Ok(raw) => raw,
            Err(e) => return self.failed(&profile.path, None, e),
        };

        let suggestion = match SuggestionValidator::validate(&raw.payload, &profile) {
            Ok(suggestion) => suggestion,
            Err(e) => return self.failed(&profile.path, None, e),
        };

        let action = ActionPlanner::plan(
            &profile,
            Some(&suggestion),
            self.config.move_enabled,
            self.config.rename_enabled,
        );
        let action = resolver.resolve_action(&profile, action);

        match ActionExecutor::execute(&profile, &action).await {
            Ok(outcome) => FileReport::completed(profile.path.clone(), suggestion, outcome),
            Err(e) => self.failed(&profile.path, Some(suggestion), e),
        }
    }

    fn failed(
        &self,
        path: &Path,
        suggestion: Option<Suggestion>,
        err: PipelineError,
    ) -> FileReport {
        tracing::warn!(
            file = %path.display(),
            stage = %err.stage(),
            error = %err,
            "File failed"
        );
        FileReport::failed(path.to_path_buf(), suggestion, &err)
    }
}
