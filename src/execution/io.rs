//! Safe I/O utilities for applying moves
//!
//! Provides crash-safe file operations including:
//! - Atomic writes with fsync (used for the JSON run report)
//! - Exclusive copies that never overwrite and clean up after themselves
//! - Directory synchronization
//! - Symlink and same-file detection

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Write data to a file atomically with fsync
///
/// This function:
/// 1. Writes data to a temporary file in the same directory
/// 2. Calls fsync on the file to ensure data is on disk
/// 3. Atomically renames the temp file to the target
/// 4. Syncs the directory to ensure the rename is durable
///
/// If any step fails, the temporary file is cleaned up.
pub fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    fs::create_dir_all(parent)?;

    let temp_name = format!(
        ".{}.tmp.{}",
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "file".to_string()),
        std::process::id()
    );
    let temp_path = parent.join(&temp_name);

    let write_result = (|| -> io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()
    })();

    if let Err(e) = write_result {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    sync_directory(parent)
}

/// Sync a directory to ensure metadata changes are durable
///
/// On POSIX systems, this opens the directory and calls fsync.
/// On Windows the rename itself is atomic on NTFS.
pub fn sync_directory(path: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        File::open(path)?.sync_all()?;
    }

    #[cfg(not(unix))]
    {
        let _ = path;
    }

    Ok(())
}

/// Check if a path is a symlink without following it
pub fn is_symlink(path: &Path) -> bool {
    match fs::symlink_metadata(path) {
        Ok(meta) => meta.is_symlink(),
        Err(_) => false,
    }
}

/// Whether a path exists, without following symlinks
pub fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Whether two paths refer to the same file (hard links and
/// case-insensitive spellings included)
pub fn is_same_file(a: &Path, b: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        if let (Ok(ma), Ok(mb)) = (fs::metadata(a), fs::metadata(b)) {
            return ma.dev() == mb.dev() && ma.ino() == mb.ino();
        }
        false
    }

    #[cfg(not(unix))]
    {
        match (fs::canonicalize(a), fs::canonicalize(b)) {
            (Ok(ca), Ok(cb)) => ca == cb,
            _ => false,
        }
    }
}

/// Copy `src` to a not-yet-existing `dst` and fsync it.
///
/// Fails with `AlreadyExists` instead of overwriting. On any failure the
/// partial destination is removed, so `src` remains the only copy.
pub fn copy_exclusive(src: &Path, dst: &Path) -> io::Result<u64> {
    let mut reader = File::open(src)?;
    let mut writer = OpenOptions::new().write(true).create_new(true).open(dst)?;

    let result = (|| -> io::Result<u64> {
        let copied = io::copy(&mut reader, &mut writer)?;
        if let Ok(meta) = reader.metadata() {
            let _ = writer.set_permissions(meta.permissions());
        }
        writer.sync_all()?;
        Ok(copied)
    })();

    if result.is_err() {
        drop(writer);
        let _ = fs::remove_file(dst);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");

        atomic_write(&path, b"{}").unwrap();
        atomic_write(&path, b"{\"a\":1}").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"a\":1}");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sub").join("dir").join("test.txt");

        atomic_write(&path, b"nested").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_is_symlink() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "content").unwrap();

        assert!(!is_symlink(&file));

        #[cfg(unix)]
        {
            let link = dir.path().join("link.txt");
            std::os::unix::fs::symlink(&file, &link).unwrap();
            assert!(is_symlink(&link));
        }
    }

    #[test]
    fn test_is_same_file() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "same").unwrap();
        fs::write(&b, "same").unwrap();

        assert!(is_same_file(&a, &a));
        assert!(is_same_file(&a, &dir.path().join(".").join("a.txt")));
        assert!(!is_same_file(&a, &b));
        assert!(!is_same_file(&a, &dir.path().join("missing.txt")));

        let hard = dir.path().join("hard.txt");
        fs::hard_link(&a, &hard).unwrap();
        assert!(is_same_file(&a, &hard));
    }

    #[test]
    fn test_copy_exclusive_never_overwrites() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src.txt");
        let dst = dir.path().join("dst.txt");
        fs::write(&src, "new").unwrap();
        fs::write(&dst, "old").unwrap();

        let err = copy_exclusive(&src, &dst).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read_to_string(&dst).unwrap(), "old");

        let fresh = dir.path().join("fresh.txt");
        assert_eq!(copy_exclusive(&src, &fresh).unwrap(), 3);
        assert_eq!(fs::read_to_string(&fresh).unwrap(), "new");
        assert!(src.exists());
    }
}
