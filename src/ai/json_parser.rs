/// Locate the substring of an LLM response most likely to be the JSON object.
/// Handles: pure JSON, Markdown code blocks, conversational intro/outro, and
/// brace-counting for nested objects. Returns `None` when nothing JSON-shaped
/// is present.
pub fn extract_json_object(response: &str) -> Option<String> {
    let trimmed = response.trim();

    // Stage 1: Try direct parse (ideal case - pure JSON response)
    if is_json_object(trimmed) {
        return Some(trimmed.to_string());
    }

    // Stage 2: Look inside Markdown code blocks
    for block in code_blocks(trimmed) {
        if let Some(found) = best_object(block) {
            return Some(found.to_string());
        }
    }

    // Stage 3: Brace-count over the whole response
    best_object(trimmed).map(str::to_string)
}

fn is_json_object(text: &str) -> bool {
    matches!(
        serde_json::from_str::<serde_json::Value>(text),
        Ok(serde_json::Value::Object(_))
    )
}

/// First balanced object that parses; otherwise the first balanced one so the
/// validator can report why it does not parse
fn best_object(text: &str) -> Option<&str> {
    let candidates = balanced_objects(text);
    candidates
        .iter()
        .copied()
        .find(|c| is_json_object(c))
        .or_else(|| candidates.first().copied())
}

/// Contents of ``` fenced blocks, with an optional language tag stripped
fn code_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("```") {
        let after = &rest[start + 3..];
        // Skip the language tag line (```json)
        let body_start = after
            .find('\n')
            .filter(|&nl| !after[..nl].contains('{'))
            .map(|nl| nl + 1)
            .unwrap_or(0);
        let body = &after[body_start..];
        match body.find("```") {
            Some(end) => {
                blocks.push(body[..end].trim());
                rest = &body[end + 3..];
            }
            None => {
                blocks.push(body.trim());
                break;
            }
        }
    }

    blocks
}

/// Find outermost JSON objects using brace counting, ignoring braces inside
/// string literals
fn balanced_objects(text: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut brace_count = 0usize;
    let mut start_idx: Option<usize> = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' if brace_count > 0 => in_string = true,
            '{' => {
                if brace_count == 0 {
                    start_idx = Some(i);
                }
                brace_count += 1;
            }
            '}' if brace_count > 0 => {
                brace_count -= 1;
                if brace_count == 0 {
                    if let Some(start) = start_idx.take() {
                        found.push(&text[start..=i]);
                    }
                }
            }
            _ => {}
        }
    }

    found
}
