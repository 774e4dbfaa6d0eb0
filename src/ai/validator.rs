//! Suggestion validation
//!
//! Turns the extracted payload into a well-typed `Suggestion`. Structural
//! problems (unparsable JSON, missing keys, path traversal) are hard
//! failures; cosmetic problems are repaired:
//! - illegal characters are stripped from every field
//! - the original extension is forced onto the filename
//! - version markers are removed from folder names
//! - empty category/folder fall back to constants

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use super::prompts::MAX_STEM_CHARS;
use crate::error::PipelineError;
use crate::models::{FileProfile, ParsedSuggestion, Suggestion, DEFAULT_CATEGORY, DEFAULT_FOLDER};
use crate::utils::{excerpt, truncate_chars};

const FILE_NAME_KEY: &str = "fileName";
const FOLDER_NAME_KEY: &str = "folderName";
const CATEGORY_KEY: &str = "category";

/// Characters that are illegal in names on at least one common filesystem
const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

static VERSION_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:v(?:er(?:sion)?)?\.?\s*\d+(?:\.\d+)*[a-z]?|\d+\.\d+(?:\.\d+)*)\b")
        .expect("version pattern is valid")
});

static DRIVE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]:").expect("drive pattern is valid"));

pub struct SuggestionValidator;

impl SuggestionValidator {
    /// Validate a payload into a suggestion or an error. Never panics.
    pub fn parse(raw_text: &str, profile: &FileProfile) -> ParsedSuggestion {
        Self::build(raw_text, profile).into()
    }

    pub fn validate(raw_text: &str, profile: &FileProfile) -> Result<Suggestion, PipelineError> {
        Self::parse(raw_text, profile).into_result()
    }

    fn build(raw_text: &str, profile: &FileProfile) -> Result<Suggestion, PipelineError> {
        let value: Value = serde_json::from_str(raw_text).map_err(|e| {
            PipelineError::malformed(
                "payload",
                format!("invalid JSON ({}): {}", e, excerpt(raw_text, 200)),
            )
        })?;

        let Value::Object(object) = value else {
            return Err(PipelineError::malformed(
                "payload",
                format!("expected a JSON object: {}", excerpt(raw_text, 200)),
            ));
        };

        let file_name = required_string(&object, FILE_NAME_KEY)?;
        let folder_name = required_string(&object, FOLDER_NAME_KEY)?;
        let category = required_string(&object, CATEGORY_KEY)?;

        for (field, value) in [
            (FILE_NAME_KEY, &file_name),
            (FOLDER_NAME_KEY, &folder_name),
            (CATEGORY_KEY, &category),
        ] {
            if is_path_traversal(value) {
                return Err(PipelineError::malformed(
                    field,
                    format!("path traversal in '{}'", value),
                ));
            }
        }

        Ok(Suggestion {
            file_name: normalize_file_name(&file_name, profile),
            folder_segments: normalize_folder(&folder_name, profile),
            category: normalize_category(&category),
        })
    }
}

/// Look up a string field, tolerating `file_name`/`filename` spellings
fn required_string(object: &Map<String, Value>, key: &str) -> Result<String, PipelineError> {
    let canonical = |k: &str| k.replace('_', "").to_ascii_lowercase();
    let value = object.get(key).or_else(|| {
        object
            .iter()
            .find(|(k, _)| canonical(k) == canonical(key))
            .map(|(_, v)| v)
    });

    match value {
        None | Some(Value::Null) => Err(PipelineError::malformed(key, "missing")),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(PipelineError::malformed(
            key,
            format!("expected a string, got {}", other),
        )),
    }
}

/// `..` components, absolute roots, home and drive prefixes
fn is_path_traversal(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.starts_with('/')
        || trimmed.starts_with('\\')
        || trimmed.starts_with('~')
        || DRIVE_PREFIX.is_match(trimmed)
        || trimmed.split(['/', '\\']).any(|c| c.trim() == "..")
}

/// Remove illegal characters and collapse whitespace.
///
/// Path separators become `separator` (or vanish when `None`).
fn strip_illegal(value: &str, separator: Option<char>) -> String {
    let replaced: String = value
        .chars()
        .filter_map(|c| match c {
            '/' | '\\' => separator,
            c if c.is_whitespace() => Some(' '),
            c if c.is_control() => None,
            c if ILLEGAL_CHARS.contains(&c) => None,
            c => Some(c),
        })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split `name` at its last dot into (stem, extension)
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}

fn is_known_extension(ext: &str) -> bool {
    !ext.contains(' ') && mime_guess::from_ext(ext).first().is_some()
}

/// Force the profile's extension onto a suggested filename.
///
/// A recognised foreign extension is replaced, anything else gets the
/// original extension appended. Falls back to the original name when
/// nothing usable is left.
fn normalize_file_name(raw: &str, profile: &FileProfile) -> String {
    let cleaned = strip_illegal(raw, None);
    let cleaned = cleaned.trim_end_matches(['.', ' ']);
    let (stem, suggested_ext) = split_extension(cleaned);

    let stem = match suggested_ext {
        Some(ext) if profile.has_extension() && ext.eq_ignore_ascii_case(&profile.extension) => {
            stem
        }
        Some(ext) if !profile.has_extension() || is_known_extension(ext) => stem,
        _ => cleaned,
    };

    let stem = truncate_chars(stem.trim(), MAX_STEM_CHARS).trim_end_matches(['.', ' ']);
    if stem.is_empty() {
        return profile.name.clone();
    }

    if profile.has_extension() {
        // Extension casing follows the file on disk, never the provider
        format!("{}.{}", stem, profile.original_extension())
    } else {
        stem.to_string()
    }
}

/// Split a folder suggestion into clean segments
fn normalize_folder(raw: &str, profile: &FileProfile) -> Vec<String> {
    let segments: Vec<String> = raw
        .split(['/', '\\'])
        .filter_map(|segment| {
            let mut segment = strip_illegal(segment, None);
            if profile.has_extension() {
                let (stem, ext) = split_extension(&segment);
                if ext.is_some_and(|e| e.eq_ignore_ascii_case(&profile.extension)) {
                    segment = stem.to_string();
                }
            }
            let segment = VERSION_TOKEN.replace_all(&segment, "");
            let segment = segment.split_whitespace().collect::<Vec<_>>().join(" ");
            let segment = segment.trim_matches(['.', ' ', '-', '_']);
            (!segment.is_empty()).then(|| segment.to_string())
        })
        .collect();

    if segments.is_empty() {
        vec![DEFAULT_FOLDER.to_string()]
    } else {
        segments
    }
}

fn normalize_category(raw: &str) -> String {
    let cleaned = strip_illegal(raw, Some(' '));
    let cleaned = cleaned.trim_matches(['.', ' ']);
    if cleaned.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        cleaned.to_string()
    }
}
