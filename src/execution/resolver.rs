//! Destination conflict resolution
//!
//! Produces collision-free names with `Base (N).ext` disambiguators. A
//! candidate occupied by the source file itself counts as free, which keeps
//! repeated runs over an unchanged tree stable. Targets handed out earlier in
//! the same run count as occupied, so preview runs report the names a full
//! run would produce.

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use super::io::{entry_exists, is_same_file};
use crate::models::{Action, FileProfile, Proposal};

/// Resolves names for one directory pass
#[derive(Debug, Default)]
pub struct ConflictResolver {
    /// Absolute targets already handed out this run
    claimed: HashSet<PathBuf>,
}

impl ConflictResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Final name for `desired_name` inside `destination_dir`.
    ///
    /// Never returns a name occupied by a different file or claimed earlier.
    pub fn resolve(&self, destination_dir: &Path, desired_name: &str, source: &Path) -> String {
        self.resolve_os(destination_dir, OsStr::new(desired_name), source)
            .to_string_lossy()
            .into_owned()
    }

    fn resolve_os(&self, destination_dir: &Path, desired_name: &OsStr, source: &Path) -> OsString {
        let is_free = |name: &OsStr| {
            let candidate = destination_dir.join(name);
            if self.claimed.contains(&candidate) {
                return false;
            }
            !entry_exists(&candidate) || is_same_file(&candidate, source)
        };

        if is_free(desired_name) {
            return desired_name.to_os_string();
        }

        let mut n: u64 = 2;
        loop {
            let candidate = disambiguate_os(desired_name, n);
            if is_free(&candidate) {
                tracing::debug!(
                    dir = %destination_dir.display(),
                    desired = %desired_name.to_string_lossy(),
                    resolved = %candidate.to_string_lossy(),
                    "Resolved name conflict"
                );
                return candidate;
            }
            n += 1;
        }
    }

    /// Rewrite the action's target name so it cannot collide, and claim the
    /// resulting target for the rest of the run.
    ///
    /// A `Move` whose original name is taken becomes a `MoveAndRename`.
    pub fn resolve_action(&mut self, profile: &FileProfile, action: Action) -> Action {
        let root = profile.parent();
        let source = profile.path.as_path();

        let action = match action {
            Action::Skip {
                proposal: Some(Proposal { new_folder, new_name }),
            } => {
                let dir = root.join(&new_folder);
                let new_name = self.resolve(&dir, &new_name, source);
                self.claimed.insert(dir.join(&new_name));
                return Action::Skip {
                    proposal: Some(Proposal { new_folder, new_name }),
                };
            }
            Action::Skip { proposal: None } => return Action::Skip { proposal: None },
            Action::Rename { new_name } => Action::Rename {
                new_name: self.resolve(root, &new_name, source),
            },
            Action::Move { new_folder } => {
                let Some(original) = source.file_name() else {
                    return Action::Move { new_folder };
                };
                let resolved = self.resolve_os(&root.join(&new_folder), original, source);
                if resolved.as_os_str() == original {
                    Action::Move { new_folder }
                } else {
                    Action::MoveAndRename {
                        new_folder,
                        new_name: resolved.to_string_lossy().into_owned(),
                    }
                }
            }
            Action::MoveAndRename {
                new_folder,
                new_name,
            } => {
                let new_name = self.resolve(&root.join(&new_folder), &new_name, source);
                Action::MoveAndRename {
                    new_folder,
                    new_name,
                }
            }
        };

        if let Some(target) = action.target_path(profile) {
            self.claimed.insert(target);
        }
        action
    }
}

/// `Invoice.pdf` -> `Invoice (n).pdf`, `Makefile` -> `Makefile (n)`
pub fn disambiguate(name: &str, n: u64) -> String {
    disambiguate_os(OsStr::new(name), n)
        .to_string_lossy()
        .into_owned()
}

fn disambiguate_os(name: &OsStr, n: u64) -> OsString {
    let path = Path::new(name);
    let mut out = path.file_stem().unwrap_or(name).to_os_string();
    out.push(format!(" ({})", n));
    if let Some(ext) = path.extension() {
        out.push(".");
        out.push(ext);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::extension_of;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_disambiguate() {
        assert_eq!(disambiguate("Invoice.pdf", 2), "Invoice (2).pdf");
        assert_eq!(disambiguate("Makefile", 3), "Makefile (3)");
        assert_eq!(disambiguate(".env", 2), ".env (2)");
    }

    #[test]
    fn test_free_name_unchanged() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("scan.pdf");
        fs::write(&source, "a").unwrap();

        assert_eq!(
            ConflictResolver::new().resolve(dir.path(), "Invoice.pdf", &source),
            "Invoice.pdf"
        );
    }

    #[test]
    fn test_collision_gets_next_free_number() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("scan.pdf");
        fs::write(&source, "mine").unwrap();
        fs::write(dir.path().join("Invoice.pdf"), "other").unwrap();

        assert_eq!(
            ConflictResolver::new().resolve(dir.path(), "Invoice.pdf", &source),
            "Invoice (2).pdf"
        );

        fs::write(dir.path().join("Invoice (2).pdf"), "third").unwrap();
        assert_eq!(
            ConflictResolver::new().resolve(dir.path(), "Invoice.pdf", &source),
            "Invoice (3).pdf"
        );
    }

    #[test]
    fn test_same_size_different_file_still_disambiguated() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.pdf");
        fs::write(&source, "1234").unwrap();
        fs::write(dir.path().join("Invoice.pdf"), "abcd").unwrap();

        assert_eq!(
            ConflictResolver::new().resolve(dir.path(), "Invoice.pdf", &source),
            "Invoice (2).pdf"
        );
    }

    #[test]
    fn test_idempotent_when_source_already_in_place() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Invoice.pdf"), "first").unwrap();
        let second = dir.path().join("Invoice (2).pdf");
        fs::write(&second, "second").unwrap();

        // The second file keeps its name instead of growing a chain
        assert_eq!(
            ConflictResolver::new().resolve(dir.path(), "Invoice.pdf", &second),
            "Invoice (2).pdf"
        );
        assert_eq!(
            ConflictResolver::new().resolve(dir.path(), "Invoice.pdf", &dir.path().join("Invoice.pdf")),
            "Invoice.pdf"
        );
    }

    #[test]
    fn test_move_with_taken_name_becomes_move_and_rename() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("report.txt");
        fs::write(&source, "new").unwrap();
        fs::create_dir_all(dir.path().join("Docs/Reports")).unwrap();
        fs::write(dir.path().join("Docs/Reports/report.txt"), "old").unwrap();

        let profile = FileProfile {
            extension: extension_of(&source),
            path: source.clone(),
            name: "report.txt".to_string(),
            mime_type: "text/plain".to_string(),
            size_bytes: 3,
            preview_text: None,
        };

        let action = ConflictResolver::new().resolve_action(
            &profile,
            Action::Move {
                new_folder: PathBuf::from("Docs/Reports"),
            },
        );
        assert_eq!(
            action,
            Action::MoveAndRename {
                new_folder: PathBuf::from("Docs/Reports"),
                new_name: "report (2).txt".to_string(),
            }
        );
    }

    #[test]
    fn test_earlier_claim_counts_as_occupied() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("scan_001.pdf");
        let second = dir.path().join("scan_002.pdf");
        fs::write(&first, "first").unwrap();
        fs::write(&second, "second").unwrap();

        let proposal = || Action::Skip {
            proposal: Some(Proposal {
                new_folder: PathBuf::from("Finance/Invoices"),
                new_name: "Invoice.pdf".to_string(),
            }),
        };
        let profile_for = |path: &Path| FileProfile {
            extension: extension_of(path),
            path: path.to_path_buf(),
            name: path.file_name().unwrap().to_string_lossy().into_owned(),
            mime_type: "application/pdf".to_string(),
            size_bytes: 5,
            preview_text: None,
        };

        // Nothing exists on disk yet, the first answer still reserves the name
        let mut resolver = ConflictResolver::new();
        let a = resolver.resolve_action(&profile_for(&first), proposal());
        let b = resolver.resolve_action(&profile_for(&second), proposal());

        let name = |action: &Action| match action {
            Action::Skip { proposal: Some(p) } => p.new_name.clone(),
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(name(&a), "Invoice.pdf");
        assert_eq!(name(&b), "Invoice (2).pdf");
        assert!(!dir.path().join("Finance").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_move_keeps_non_utf8_name() {
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let raw = OsStr::from_bytes(b"caf\xe9.txt");
        let source = dir.path().join(raw);
        fs::write(&source, "menu").unwrap();

        let profile = FileProfile {
            extension: extension_of(&source),
            path: source.clone(),
            name: raw.to_string_lossy().into_owned(),
            mime_type: "text/plain".to_string(),
            size_bytes: 4,
            preview_text: None,
        };
        let action = ConflictResolver::new().resolve_action(
            &profile,
            Action::Move {
                new_folder: PathBuf::from("Documents/Menus"),
            },
        );

        assert_eq!(
            action,
            Action::Move {
                new_folder: PathBuf::from("Documents/Menus"),
            }
        );
        assert_eq!(
            action.target_path(&profile),
            Some(dir.path().join("Documents/Menus").join(raw))
        );
    }
}
