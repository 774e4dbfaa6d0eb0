//! Action executor
//!
//! Applies a resolved action to the filesystem. Moves never overwrite an
//! existing entry, and a failed cross-device move leaves the source intact.

use std::fs;
use std::io;
use std::path::Path;

use super::io::{copy_exclusive, entry_exists, is_same_file, is_symlink, sync_directory};
use crate::error::PipelineError;
use crate::models::{Action, FileProfile, Outcome};

pub struct ActionExecutor;

impl ActionExecutor {
    /// Execute an action on a blocking task
    pub async fn execute(profile: &FileProfile, action: &Action) -> Result<Outcome, PipelineError> {
        let profile = profile.clone();
        let action = action.clone();
        let path = profile.path.clone();

        tokio::task::spawn_blocking(move || Self::execute_sync(&profile, &action))
            .await
            .map_err(|e| PipelineError::filesystem(path, io::Error::other(e.to_string())))?
    }

    /// Synchronous execution
    pub fn execute_sync(profile: &FileProfile, action: &Action) -> Result<Outcome, PipelineError> {
        let source = profile.path.as_path();

        let (Some(target_dir), Some(target)) = (action.target_dir(profile), action.target_path(profile))
        else {
            return Ok(Outcome {
                action: action.clone(),
                applied: false,
                final_path: source.to_path_buf(),
            });
        };

        if target == source {
            return Ok(already_in_place(profile, action));
        }

        if entry_exists(&target) {
            if !is_same_file(&target, source) {
                return Err(PipelineError::filesystem(
                    &target,
                    io::Error::new(io::ErrorKind::AlreadyExists, "destination already exists"),
                ));
            }
            // Same inode under another spelling. Only a case change is worth
            // a rename; a hard link already satisfies the action.
            if !differs_only_in_case(source, &target) {
                return Ok(already_in_place(profile, action));
            }
        }

        fs::create_dir_all(&target_dir).map_err(|e| PipelineError::filesystem(&target_dir, e))?;

        move_file(source, &target)?;

        if let Err(e) = sync_directory(&target_dir) {
            tracing::warn!(dir = %target_dir.display(), error = %e, "Failed to sync directory");
        }

        tracing::info!(
            from = %source.display(),
            to = %target.display(),
            "Applied {}",
            action.describe()
        );

        Ok(Outcome {
            action: action.clone(),
            applied: true,
            final_path: target,
        })
    }
}

fn already_in_place(profile: &FileProfile, action: &Action) -> Outcome {
    tracing::debug!(file = %profile.path.display(), "Already in place");
    Outcome {
        action: action.clone(),
        applied: false,
        final_path: profile.path.clone(),
    }
}

fn differs_only_in_case(a: &Path, b: &Path) -> bool {
    let (a, b) = (a.to_string_lossy(), b.to_string_lossy());
    a != b && a.to_lowercase() == b.to_lowercase()
}

/// Rename, falling back to copy+delete across filesystems
fn move_file(source: &Path, target: &Path) -> Result<(), PipelineError> {
    let rename_err = match fs::rename(source, target) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };

    if is_symlink(source) {
        return Err(PipelineError::filesystem(source, rename_err));
    }

    tracing::debug!(
        from = %source.display(),
        to = %target.display(),
        error = %rename_err,
        "Rename failed, copying instead"
    );

    copy_then_remove(source, target)
}

/// Cross-device half of a move: exclusive copy, then drop the original
fn copy_then_remove(source: &Path, target: &Path) -> Result<(), PipelineError> {
    copy_exclusive(source, target).map_err(|e| PipelineError::filesystem(target, e))?;

    if let Err(e) = fs::remove_file(source) {
        // Keep a single copy: the original
        let _ = fs::remove_file(target);
        return Err(PipelineError::filesystem(source, e));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Stage;
    use crate::models::{extension_of, Proposal};
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn profile_for(path: &Path) -> FileProfile {
        FileProfile {
            path: path.to_path_buf(),
            name: path.file_name().unwrap().to_string_lossy().to_string(),
            extension: extension_of(path),
            mime_type: "text/plain".to_string(),
            size_bytes: fs::metadata(path).map(|m| m.len()).unwrap_or(0),
            preview_text: None,
        }
    }

    #[tokio::test]
    async fn test_move_and_rename_creates_folders() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("IMG_20230615_123456.jpg");
        fs::write(&source, "jpeg").unwrap();
        let profile = profile_for(&source);

        let action = Action::MoveAndRename {
            new_folder: PathBuf::from("Images/Photos/Summer Vacation 2023"),
            new_name: "BeachSunset.jpg".to_string(),
        };
        let outcome = ActionExecutor::execute(&profile, &action).await.unwrap();

        let expected = dir
            .path()
            .join("Images/Photos/Summer Vacation 2023/BeachSunset.jpg");
        assert!(outcome.applied);
        assert_eq!(outcome.final_path, expected);
        assert!(!source.exists());
        assert_eq!(fs::read_to_string(&expected).unwrap(), "jpeg");
    }

    #[tokio::test]
    async fn test_rename_in_place() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("doc1.txt");
        fs::write(&source, "notes").unwrap();
        let profile = profile_for(&source);

        let outcome = ActionExecutor::execute(
            &profile,
            &Action::Rename {
                new_name: "MeetingNotes.txt".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(outcome.applied);
        assert!(dir.path().join("MeetingNotes.txt").exists());
        assert!(!source.exists());
    }

    #[tokio::test]
    async fn test_move_keeps_name() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("report.pdf");
        fs::write(&source, "%PDF").unwrap();
        let profile = profile_for(&source);

        let outcome = ActionExecutor::execute(
            &profile,
            &Action::Move {
                new_folder: PathBuf::from("Documents/Reports"),
            },
        )
        .await
        .unwrap();

        assert_eq!(outcome.final_path, dir.path().join("Documents/Reports/report.pdf"));
        assert!(outcome.final_path.exists());
    }

    #[tokio::test]
    async fn test_skip_touches_nothing() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.txt");
        fs::write(&source, "a").unwrap();
        let profile = profile_for(&source);

        let action = Action::Skip {
            proposal: Some(Proposal {
                new_folder: PathBuf::from("Documents/Notes"),
                new_name: "A.txt".to_string(),
            }),
        };
        let outcome = ActionExecutor::execute(&profile, &action).await.unwrap();

        assert!(!outcome.applied);
        assert_eq!(outcome.final_path, source);
        assert!(!dir.path().join("Documents").exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_target_equal_to_source_is_noop() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("Notes.txt");
        fs::write(&source, "a").unwrap();
        let profile = profile_for(&source);

        let outcome = ActionExecutor::execute(
            &profile,
            &Action::Rename {
                new_name: "Notes.txt".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(!outcome.applied);
        assert_eq!(outcome.final_path, source);
        assert!(outcome.describe().starts_with("already in place"));
    }

    #[tokio::test]
    async fn test_never_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.txt");
        let other = dir.path().join("Taken.txt");
        fs::write(&source, "mine").unwrap();
        fs::write(&other, "theirs").unwrap();
        let profile = profile_for(&source);

        let err = ActionExecutor::execute(
            &profile,
            &Action::Rename {
                new_name: "Taken.txt".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.stage(), Stage::Execute);
        assert_eq!(fs::read_to_string(&other).unwrap(), "theirs");
        assert_eq!(fs::read_to_string(&source).unwrap(), "mine");
    }

    #[test]
    fn test_move_file_falls_back_when_target_dir_missing() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.txt");
        fs::write(&source, "a").unwrap();

        // Both rename and copy fail; the source must survive
        let target = dir.path().join("missing").join("a.txt");
        assert!(move_file(&source, &target).is_err());
        assert!(source.exists());
        assert!(!target.exists());
    }

    #[test]
    fn test_copy_then_remove_moves_content() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.txt");
        let target = dir.path().join("b.txt");
        fs::write(&source, "payload").unwrap();

        copy_then_remove(&source, &target).unwrap();

        assert!(!source.exists());
        assert_eq!(fs::read_to_string(&target).unwrap(), "payload");
    }

    #[test]
    fn test_copy_then_remove_refuses_existing_target() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.txt");
        let target = dir.path().join("b.txt");
        fs::write(&source, "mine").unwrap();
        fs::write(&target, "theirs").unwrap();

        assert!(copy_then_remove(&source, &target).is_err());
        assert_eq!(fs::read_to_string(&source).unwrap(), "mine");
        assert_eq!(fs::read_to_string(&target).unwrap(), "theirs");
    }
}
