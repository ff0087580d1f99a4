//! Balanced-brace extraction of JSON-like substrings from free text.
//!
//! A bracket-matching scanner, not a regex: nested objects are captured as a
//! whole, string literals and escapes are honored so braces inside quoted
//! text do not confuse the depth count. Fenced code blocks need no special
//! casing - the scanner sees through the fences.

/// Extract up to `max_candidates` outermost balanced-brace substrings.
///
/// Unterminated blocks are dropped. Malformed JSON inside a candidate is not
/// an error; callers fall back to treating the substring as plain text.
pub fn extract_candidates(text: &str, max_candidates: usize) -> Vec<&str> {
    let mut candidates = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() && candidates.len() < max_candidates {
        if bytes[i] != b'{' {
            i += 1;
            continue;
        }

        let start = i;
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        let mut end = None;

        let mut j = i;
        while j < bytes.len() {
            let b = bytes[j];
            if in_string {
                if escaped {
                    escaped = false;
                } else if b == b'\\' {
                    escaped = true;
                } else if b == b'"' {
                    in_string = false;
                }
            } else {
                match b {
                    b'"' => in_string = true,
                    b'{' => depth += 1,
                    b'}' => {
                        depth -= 1;
                        if depth == 0 {
                            end = Some(j);
                            break;
                        }
                    }
                    _ => {}
                }
            }
            j += 1;
        }

        match end {
            Some(end) => {
                candidates.push(&text[start..=end]);
                i = end + 1;
            }
            // Unbalanced from here on; nothing further can close.
            None => break,
        }
    }

    candidates
}

/// Infer the invoked tool name from a parsed candidate, mirroring common
/// tool-call shapes: explicit `tool`, then `action`/`command` forms.
pub fn infer_tool(value: &serde_json::Value) -> Option<String> {
    let obj = value.as_object()?;

    if let Some(tool) = obj.get("tool").and_then(|v| v.as_str()) {
        return Some(tool.to_string());
    }
    if let Some(action) = obj.get("action").and_then(|v| v.as_str()) {
        if obj.contains_key("directory") {
            return Some(format!("git_{}", action));
        }
        return Some(format!("action_{}", action));
    }
    if let Some(command) = obj.get("command").and_then(|v| v.as_str()) {
        return Some(format!("command_{}", command));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_simple_object() {
        let text = r#"before {"a": 1} after"#;
        assert_eq!(extract_candidates(text, 16), vec![r#"{"a": 1}"#]);
    }

    #[test]
    fn test_extracts_nested_object_as_whole() {
        let text = r#"{"a": {"b": "c"}}"#;
        assert_eq!(extract_candidates(text, 16), vec![text]);
    }

    #[test]
    fn test_braces_inside_strings_ignored() {
        let text = r#"{"a": "}{ not structure"}"#;
        assert_eq!(extract_candidates(text, 16), vec![text]);
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let text = r#"{"a": "he said \"}\" loudly"}"#;
        assert_eq!(extract_candidates(text, 16), vec![text]);
    }

    #[test]
    fn test_multiple_candidates() {
        let text = r#"{"a": 1} and {"b": 2}"#;
        assert_eq!(extract_candidates(text, 16).len(), 2);
    }

    #[test]
    fn test_fenced_code_block() {
        let text = "Try this:\n```json\n{\"directory\": \"/Users/x/project\", \"action\": \"add\"}\n```\n";
        let candidates = extract_candidates(text, 16);
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].contains("\"action\""));
    }

    #[test]
    fn test_unterminated_block_dropped() {
        let text = r#"{"a": 1"#;
        assert!(extract_candidates(text, 16).is_empty());
    }

    #[test]
    fn test_candidate_cap() {
        let text = "{} {} {} {}";
        assert_eq!(extract_candidates(text, 2).len(), 2);
    }

    #[test]
    fn test_infer_tool_variants() {
        assert_eq!(
            infer_tool(&json!({ "tool": "git_status" })).as_deref(),
            Some("git_status")
        );
        assert_eq!(
            infer_tool(&json!({ "directory": "/x", "action": "add" })).as_deref(),
            Some("git_add")
        );
        assert_eq!(
            infer_tool(&json!({ "action": "commit" })).as_deref(),
            Some("action_commit")
        );
        assert_eq!(
            infer_tool(&json!({ "command": "ls" })).as_deref(),
            Some("command_ls")
        );
        assert_eq!(infer_tool(&json!({ "path": "x" })), None);
    }
}
