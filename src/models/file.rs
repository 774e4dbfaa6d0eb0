use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// MIME value used when neither the extension nor the content signature
/// identifies the file
pub const UNKNOWN_MIME: &str = "unknown";

/// Bounded description of a single file, taken once at scan time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileProfile {
    /// Absolute path
    pub path: PathBuf,
    /// File name including extension
    pub name: String,
    /// Lower-cased extension without the dot, empty when there is none
    pub extension: String,
    /// Best-effort MIME guess, `UNKNOWN_MIME` when undetermined
    pub mime_type: String,
    /// Size from filesystem metadata
    pub size_bytes: u64,
    /// Leading text of text-like files, truncated to the preview budget
    pub preview_text: Option<String>,
}

impl FileProfile {
    /// Directory the file currently lives in
    pub fn parent(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Extension as spelled on disk, empty when there is none
    pub fn original_extension(&self) -> Cow<'_, str> {
        self.path
            .extension()
            .map(|e| e.to_string_lossy())
            .unwrap_or_default()
    }

    pub fn has_extension(&self) -> bool {
        !self.extension.is_empty()
    }
}

/// Lower-cased extension of a path, empty when there is none
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> FileProfile {
        let path = PathBuf::from("/tmp/in").join(name);
        FileProfile {
            extension: extension_of(&path),
            path,
            name: name.to_string(),
            mime_type: UNKNOWN_MIME.to_string(),
            size_bytes: 0,
            preview_text: None,
        }
    }

    #[test]
    fn test_extension_casing() {
        let p = profile("IMG_0001.JPG");
        assert_eq!(p.extension, "jpg");
        assert_eq!(p.original_extension(), "JPG");
        assert_eq!(p.parent(), Path::new("/tmp/in"));

        let p = profile("Makefile");
        assert!(!p.has_extension());
        assert_eq!(p.original_extension(), "");

        let p = profile("archive.tar.gz");
        assert_eq!(p.extension, "gz");
        assert_eq!(p.original_extension(), "gz");
    }
}
