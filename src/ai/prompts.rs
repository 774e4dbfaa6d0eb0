use crate::models::FileProfile;
use crate::utils::format_size;

/// Maximum filename length, excluding the extension
pub const MAX_STEM_CHARS: usize = 50;

/// Marker used when a file has no text preview
pub const NO_PREVIEW_MARKER: &str = "(no preview available)";

/// System prompt for the suggestion request
pub const SUGGESTION_SYSTEM_PROMPT: &str = r#"You are a file organization assistant. Given a description of one file, you suggest a clear filename, a folder name and a category for it.

Respond with ONLY a JSON object with exactly these three keys and string values:
{"fileName": "...", "folderName": "...", "category": "..."}
No explanation, no markdown."#;

/// Build the user prompt describing one file
pub fn build_suggestion_prompt(profile: &FileProfile) -> String {
    let extension = if profile.has_extension() {
        format!(".{}", profile.extension)
    } else {
        "(none)".to_string()
    };

    let mut prompt = format!(
        r#"I need a better filename, folder name, and category for this file.

CURRENT FILENAME: {}
EXTENSION: {}
MIME TYPE: {}
FILE SIZE: {} bytes ({})"#,
        profile.name,
        extension,
        profile.mime_type,
        profile.size_bytes,
        format_size(profile.size_bytes)
    );

    match profile.preview_text.as_deref() {
        Some(content) if !content.trim().is_empty() => {
            prompt.push_str(&format!(
                r#"

CONTENT PREVIEW:
---
{}
---"#,
                content
            ));
        }
        _ => {
            prompt.push_str(&format!("\n\nCONTENT PREVIEW: {}", NO_PREVIEW_MARKER));
        }
    }

    prompt.push_str(&format!(
        r#"

Provide a JSON object with these keys:
1. "fileName": "CorrectFilename{ext}"
2. "folderName": "Suggested Folder Name"
3. "category": "Suggested Category"

fileName rules:
- Keep the same file extension ({ext_rule})
- Use UpperCamelCase
- If it is a PDF it may be a book: use the official book title with spaced-out words
- If it is an executable or installer, name it after the software
- Be specific and descriptive about the content
- Maximum {max} characters excluding the extension

folderName rules:
- No file extension
- No version numbers or version markers
- Words separated by spaces
- For applications use just the application name, without words like "Installer", "Disk Image", "Mac" or "Windows"

category rules:
- A single word or short phrase such as "Software", "Book", "Image", "Video"

Output ONLY the JSON object."#,
        ext = if profile.has_extension() { extension.as_str() } else { "" },
        ext_rule = if profile.has_extension() {
            extension.as_str()
        } else {
            "the file has none, so add none"
        },
        max = MAX_STEM_CHARS,
    ));

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn profile(preview: Option<&str>) -> FileProfile {
        FileProfile {
            path: PathBuf::from("/in/report_final_v3.pdf"),
            name: "report_final_v3.pdf".to_string(),
            extension: "pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            size_bytes: 2_048,
            preview_text: preview.map(str::to_string),
        }
    }

    #[test]
    fn test_prompt_embeds_profile() {
        let prompt = build_suggestion_prompt(&profile(None));
        assert!(prompt.contains("CURRENT FILENAME: report_final_v3.pdf"));
        assert!(prompt.contains("EXTENSION: .pdf"));
        assert!(prompt.contains("MIME TYPE: application/pdf"));
        assert!(prompt.contains("2048 bytes (2KB)"));
        assert!(prompt.contains(NO_PREVIEW_MARKER));
        assert!(prompt.contains("\"fileName\""));
        assert!(prompt.contains("\"folderName\""));
        assert!(prompt.contains("\"category\""));
        assert!(prompt.contains("Maximum 50 characters"));
    }

    #[test]
    fn test_prompt_includes_preview() {
        let prompt = build_suggestion_prompt(&profile(Some("Chapter One")));
        assert!(prompt.contains("CONTENT PREVIEW:\n---\nChapter One\n---"));
        assert!(!prompt.contains(NO_PREVIEW_MARKER));
    }
}
