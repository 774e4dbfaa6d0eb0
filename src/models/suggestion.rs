use crate::error::PipelineError;
use serde::{Deserialize, Serialize};

/// Fallback bucket when the provider's category is empty after cleanup
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Fallback folder when the provider's folder is empty after cleanup
pub const DEFAULT_FOLDER: &str = "Unsorted";

/// A validated naming and placement suggestion for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// New file name, always carrying the original extension
    pub file_name: String,
    /// Folder path beneath the category, one entry per segment
    pub folder_segments: Vec<String>,
    /// Top-level bucket
    pub category: String,
}

impl Suggestion {
    /// Folder segments joined with `/` for display
    pub fn folder_name(&self) -> String {
        self.folder_segments.join("/")
    }

    /// `category/folder...` relative to the directory being organized
    pub fn relative_folder(&self) -> std::path::PathBuf {
        let mut path = std::path::PathBuf::from(&self.category);
        for segment in &self.folder_segments {
            path.push(segment);
        }
        path
    }
}

/// Outcome of validating a provider payload
#[derive(Debug)]
pub enum ParsedSuggestion {
    ParsedOk(Suggestion),
    ParsedError(PipelineError),
}

impl ParsedSuggestion {
    pub fn into_result(self) -> Result<Suggestion, PipelineError> {
        match self {
            ParsedSuggestion::ParsedOk(s) => Ok(s),
            ParsedSuggestion::ParsedError(e) => Err(e),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ParsedSuggestion::ParsedOk(_))
    }
}

impl From<Result<Suggestion, PipelineError>> for ParsedSuggestion {
    fn from(result: Result<Suggestion, PipelineError>) -> Self {
        match result {
            Ok(s) => ParsedSuggestion::ParsedOk(s),
            Err(e) => ParsedSuggestion::ParsedError(e),
        }
    }
}
