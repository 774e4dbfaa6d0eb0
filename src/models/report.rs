use super::action::{Action, Outcome};
use super::suggestion::Suggestion;
use crate::error::{PipelineError, Stage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Failure recorded against a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileError {
    pub stage: Stage,
    pub message: String,
}

impl From<&PipelineError> for FileError {
    fn from(err: &PipelineError) -> Self {
        Self {
            stage: err.stage(),
            message: err.to_string(),
        }
    }
}

/// Per-file outcome of a directory pass
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub path: PathBuf,
    pub suggestion: Option<Suggestion>,
    pub planned_action: Action,
    pub applied: bool,
    pub final_path: Option<PathBuf>,
    pub error: Option<FileError>,
}

impl FileReport {
    pub fn completed(path: PathBuf, suggestion: Suggestion, outcome: Outcome) -> Self {
        Self {
            path,
            suggestion: Some(suggestion),
            planned_action: outcome.action,
            applied: outcome.applied,
            final_path: Some(outcome.final_path),
            error: None,
        }
    }

    /// A file whose pipeline stopped at `err`. Anything already known is kept.
    pub fn failed(path: PathBuf, suggestion: Option<Suggestion>, err: &PipelineError) -> Self {
        Self {
            path,
            suggestion,
            planned_action: Action::Skip { proposal: None },
            applied: false,
            final_path: None,
            error: Some(FileError::from(err)),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    /// One progress line for this file
    pub fn status_line(&self) -> String {
        let path = self.path.display();
        match (&self.error, self.applied) {
            (Some(err), _) => format!("✗ {}: {} failed: {}", path, err.stage, err.message),
            (None, true) => format!("✓ {}: {}", path, self.planned_action.describe()),
            (None, false) if self.planned_action.is_skip() => {
                format!("• {}: {}", path, self.planned_action.describe())
            }
            (None, false) => format!("= {}: already in place", path),
        }
    }
}

/// Aggregate counts for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub applied: usize,
    pub skipped_system_files: usize,
}

/// Ordered record of one directory pass
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub directory: PathBuf,
    pub move_enabled: bool,
    pub rename_enabled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub entries: Vec<FileReport>,
    /// Names from the skip list that were present and ignored
    pub skipped_system_files: Vec<String>,
}

impl RunReport {
    pub fn new(directory: PathBuf, move_enabled: bool, rename_enabled: bool) -> Self {
        Self {
            directory,
            move_enabled,
            rename_enabled,
            started_at: Utc::now(),
            finished_at: None,
            entries: Vec::new(),
            skipped_system_files: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: FileReport) {
        self.entries.push(entry);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn summary(&self) -> RunSummary {
        let failed = self.entries.iter().filter(|e| e.is_failure()).count();
        RunSummary {
            processed: self.entries.len(),
            succeeded: self.entries.len() - failed,
            failed,
            applied: self.entries.iter().filter(|e| e.applied).count(),
            skipped_system_files: self.skipped_system_files.len(),
        }
    }

    pub fn has_failures(&self) -> bool {
        self.entries.iter().any(FileReport::is_failure)
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} processed, {} succeeded, {} failed, {} changed on disk",
            self.processed, self.succeeded, self.failed, self.applied
        )
    }
}
