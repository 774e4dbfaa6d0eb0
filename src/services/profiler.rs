//! File profiling
//!
//! Builds the bounded description of a file that is sent to the provider:
//! name, extension, MIME guess, size from metadata, and a text preview for
//! text-like files only.

use crate::error::PipelineError;
use crate::models::{extension_of, FileProfile, UNKNOWN_MIME};
use crate::utils::truncate_chars;
use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// Bytes inspected when the extension does not identify the type
const SNIFF_LEN: usize = 512;

/// `application/*` subtypes that are really text
const TEXT_APPLICATION_TYPES: &[&str] = &[
    "json",
    "xml",
    "javascript",
    "x-javascript",
    "ecmascript",
    "x-sh",
    "x-csh",
    "x-yaml",
    "yaml",
    "toml",
    "x-toml",
    "sql",
    "x-python",
    "x-httpd-php",
    "x-perl",
    "x-ruby",
    "x-tex",
    "x-latex",
    "rtf",
    "graphql",
    "x-ndjson",
    "x-subrip",
];

pub struct FileProfiler {
    preview_chars: usize,
}

impl FileProfiler {
    pub fn new(preview_chars: usize) -> Self {
        Self { preview_chars }
    }

    /// Profile a single file.
    ///
    /// Fails with `UnreadableFile` when metadata or content cannot be read
    /// (permission denied, broken symlink, vanished file).
    pub fn profile(&self, path: &Path) -> Result<FileProfile, PipelineError> {
        let unreadable = |source: io::Error| PipelineError::UnreadableFile {
            path: path.to_path_buf(),
            source,
        };

        let metadata = fs::metadata(path).map_err(unreadable)?;
        if !metadata.is_file() {
            return Err(unreadable(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a regular file",
            )));
        }

        let absolute = std::path::absolute(path).map_err(unreadable)?;
        let name = absolute
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let extension = extension_of(&absolute);

        let mut file = File::open(path).map_err(unreadable)?;

        let mime_type = match guess_from_extension(&extension) {
            Some(mime) => mime,
            None => {
                let mut head = Vec::with_capacity(SNIFF_LEN);
                file.by_ref()
                    .take(SNIFF_LEN as u64)
                    .read_to_end(&mut head)
                    .map_err(unreadable)?;
                sniff_mime(&head).unwrap_or(UNKNOWN_MIME).to_string()
            }
        };

        let preview_text = if is_text_like(&mime_type) {
            file.seek(SeekFrom::Start(0)).map_err(unreadable)?;
            Some(read_preview(&mut file, self.preview_chars).map_err(unreadable)?)
        } else {
            None
        };

        tracing::debug!(
            path = %absolute.display(),
            mime = %mime_type,
            size = metadata.len(),
            preview_chars = preview_text.as_ref().map(|p| p.chars().count()),
            "Profiled file"
        );

        Ok(FileProfile {
            path: absolute,
            name,
            extension,
            mime_type,
            size_bytes: metadata.len(),
            preview_text,
        })
    }
}

/// Read at most `max_chars` characters, replacing invalid UTF-8.
///
/// Reads `4 * max_chars` bytes at most; a partial sequence cut at that
/// boundary always lies past the first `max_chars` characters.
fn read_preview(file: &mut File, max_chars: usize) -> io::Result<String> {
    let mut bytes = Vec::new();
    file.take((max_chars as u64).saturating_mul(4))
        .read_to_end(&mut bytes)?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(truncate_chars(&text, max_chars).to_string())
}

fn guess_from_extension(extension: &str) -> Option<String> {
    if extension.is_empty() {
        return None;
    }
    mime_guess::from_ext(extension)
        .first()
        .map(|m| m.essence_str().to_string())
}

/// Detect a MIME type from magic bytes, falling back to plain text for
/// NUL-free UTF-8
fn sniff_mime(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        Some("image/png")
    } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if data.starts_with(b"RIFF") && data.get(8..12) == Some(b"WEBP") {
        Some("image/webp")
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if data.starts_with(b"%PDF") {
        Some("application/pdf")
    } else if data.starts_with(b"PK\x03\x04") {
        Some("application/zip")
    } else if data.starts_with(&[0x1F, 0x8B]) {
        Some("application/gzip")
    } else if data.starts_with(b"\x7FELF") {
        Some("application/x-executable")
    } else if data.starts_with(b"MZ") {
        Some("application/x-msdownload")
    } else if data.starts_with(b"ID3") {
        Some("audio/mpeg")
    } else if looks_like_text(data) {
        Some("text/plain")
    } else {
        None
    }
}

fn looks_like_text(data: &[u8]) -> bool {
    if data.is_empty() || data.contains(&0) {
        return false;
    }
    match std::str::from_utf8(data) {
        Ok(_) => true,
        // Incomplete trailing sequence from the sniff cut
        Err(e) => e.error_len().is_none(),
    }
}

/// Whether a preview should be extracted for this MIME type
pub fn is_text_like(mime: &str) -> bool {
    let Some((top, sub)) = mime.split_once('/') else {
        return false;
    };
    match top {
        "text" => true,
        "application" => {
            TEXT_APPLICATION_TYPES.contains(&sub) || sub.ends_with("+json") || sub.ends_with("+xml")
        }
        "image" => sub == "svg+xml",
        _ => false,
    }
}
