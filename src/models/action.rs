use super::file::FileProfile;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::PathBuf;

/// Destination a suggestion points at, relative to the organized directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub new_folder: PathBuf,
    pub new_name: String,
}

/// Concrete filesystem change planned for one file.
///
/// Folders are relative to the file's current directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    /// Nothing is touched; `proposal` records what a full run would do
    #[serde(rename_all = "camelCase")]
    Skip { proposal: Option<Proposal> },

    #[serde(rename_all = "camelCase")]
    Rename { new_name: String },

    #[serde(rename_all = "camelCase")]
    Move { new_folder: PathBuf },

    #[serde(rename_all = "camelCase")]
    MoveAndRename { new_folder: PathBuf, new_name: String },
}

impl Action {
    pub fn is_skip(&self) -> bool {
        matches!(self, Action::Skip { .. })
    }

    /// Absolute directory the file ends up in, `None` for skips
    pub fn target_dir(&self, profile: &FileProfile) -> Option<PathBuf> {
        let root = profile.parent();
        match self {
            Action::Skip { .. } => None,
            Action::Rename { .. } => Some(root.to_path_buf()),
            Action::Move { new_folder } | Action::MoveAndRename { new_folder, .. } => {
                Some(root.join(new_folder))
            }
        }
    }

    /// File name the file ends up with, `None` for skips.
    ///
    /// A plain move keeps the on-disk name byte for byte.
    pub fn target_name<'a>(&'a self, profile: &'a FileProfile) -> Option<&'a OsStr> {
        match self {
            Action::Skip { .. } => None,
            Action::Move { .. } => profile.path.file_name(),
            Action::Rename { new_name } | Action::MoveAndRename { new_name, .. } => {
                Some(OsStr::new(new_name))
            }
        }
    }

    /// Absolute destination path, `None` for skips
    pub fn target_path(&self, profile: &FileProfile) -> Option<PathBuf> {
        let dir = self.target_dir(profile)?;
        let name = self.target_name(profile)?;
        Some(dir.join(name))
    }

    /// Human-readable summary, phrased as intent
    pub fn describe(&self) -> String {
        match self {
            Action::Skip { proposal: None } => "skip".to_string(),
            Action::Skip {
                proposal: Some(Proposal { new_folder, new_name }),
            } => format!(
                "would move to {}, rename to {}",
                new_folder.display(),
                new_name
            ),
            Action::Rename { new_name } => format!("rename to {}", new_name),
            Action::Move { new_folder } => format!("move to {}", new_folder.display()),
            Action::MoveAndRename {
                new_folder,
                new_name,
            } => format!("move to {}, rename to {}", new_folder.display(), new_name),
        }
    }
}

/// Result of executing an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub action: Action,
    /// Whether the filesystem was changed
    pub applied: bool,
    /// Where the file is after execution
    pub final_path: PathBuf,
}

impl Outcome {
    pub fn describe(&self) -> String {
        if self.action.is_skip() || self.applied {
            return self.action.describe();
        }
        format!("already in place ({})", self.action.describe())
    }
}
