//! Recovery of JSON arrays cut short by an output token limit.
//!
//! The scanner walks the text once, tracking string and escape state and the
//! nesting depth, and remembers where each top-level element of the array
//! closes. A truncated array is rebuilt from the elements that closed; a
//! partial trailing element is dropped.

use log::warn;
use serde_json::Value;

/// Strips a surrounding markdown code fence (```` ```json ... ``` ````).
pub fn strip_code_fence(text: &str) -> &str {
    let mut t = text.trim();
    if let Some(rest) = t.strip_prefix("```") {
        t = rest.strip_prefix("json").unwrap_or(rest);
        t = t.trim_start();
    }
    if let Some(rest) = t.strip_suffix("```") {
        t = rest.trim_end();
    }
    t
}

struct Scan {
    /// Byte offset just past the opening `[`, or 0 when the bracket is missing.
    body_start: usize,
    /// Byte offset just past the last fully closed element.
    last_complete: Option<usize>,
    /// Offset of the first element.
    first_element: Option<usize>,
    /// True when the outer array closed and nothing but whitespace follows.
    well_formed: bool,
}

fn scan(text: &str) -> Scan {
    let bytes = text.as_bytes();
    let implicit = bytes.first() != Some(&b'[');
    // Depth at which array elements live.
    let element_depth: i32 = if implicit { 0 } else { 1 };
    let body_start = if implicit { 0 } else { 1 };

    let mut depth: i32 = if implicit { 0 } else { 1 };
    let mut in_string = false;
    let mut escaped = false;
    let mut last_complete = None;
    let mut first_element = None;
    let mut closed_at = None;

    for (i, &b) in bytes.iter().enumerate().skip(body_start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => {
                if depth == element_depth && first_element.is_none() {
                    first_element = Some(i);
                }
                depth += 1;
            }
            b'}' | b']' => {
                depth -= 1;
                if depth == element_depth {
                    last_complete = Some(i + 1);
                } else if depth < element_depth {
                    // Closing bracket of the outer array.
                    closed_at = Some(i + 1);
                    break;
                }
            }
            _ => {}
        }
    }

    let well_formed = !implicit
        && closed_at
            .map(|end| text[end..].trim().is_empty())
            .unwrap_or(false);

    Scan {
        body_start,
        last_complete,
        first_element,
        well_formed,
    }
}

/// Returns a JSON array text containing only the elements that were fully
/// present. A well-formed array comes back unchanged (after trimming and
/// fence removal); text with no complete element yields `[]`.
pub fn repair_json_array(text: &str) -> String {
    let t = strip_code_fence(text);
    // Skip any prose the model put in front of the JSON.
    let Some(start) = t.find(['[', '{']) else {
        return "[]".to_string();
    };
    let t = &t[start..];
    let s = scan(t);
    if s.well_formed {
        return t.to_string();
    }
    match (s.first_element, s.last_complete) {
        (Some(start), Some(end)) if end > start => {
            let start = start.max(s.body_start);
            format!("[{}]", &t[start..end])
        }
        _ => "[]".to_string(),
    }
}

/// Parses model output as an array of JSON values, repairing it first.
/// Anything that still fails to parse is treated as an empty chunk.
pub fn parse_array_lenient(text: &str) -> Vec<Value> {
    let repaired = repair_json_array(text);
    match serde_json::from_str::<Value>(&repaired) {
        Ok(Value::Array(items)) => items,
        Ok(other) => {
            warn!("expected a JSON array, got {}", kind(&other));
            Vec::new()
        }
        Err(e) => {
            warn!("JSON parse failed after repair, returning empty chunk: {e}");
            Vec::new()
        }
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn braces_inside_strings_do_not_count() {
        let text = r#"[{"word":"a}b"},{"word":"c"#;
        assert_eq!(repair_json_array(text), r#"[{"word":"a}b"}]"#);
    }

    #[test]
    fn escaped_quotes_stay_inside_string() {
        let text = r#"[{"example":"er sagt \"ja}\""},{"wo"#;
        assert_eq!(repair_json_array(text), r#"[{"example":"er sagt \"ja}\""}]"#);
    }

    #[test]
    fn missing_opening_bracket() {
        let text = r#"{"word":"Haus"},{"word":"Ba"#;
        assert_eq!(repair_json_array(text), r#"[{"word":"Haus"}]"#);
    }

    #[test]
    fn fenced_output() {
        let text = "```json\n[{\"word\":\"Hund\"}]\n```";
        assert_eq!(repair_json_array(text), r#"[{"word":"Hund"}]"#);
    }

    #[test]
    fn nested_objects_close_once() {
        let text = r#"[{"word":"gehen","conjugation":{"past":"ging"}},{"word":"x","conjugation":{"past":"y"}"#;
        let out = repair_json_array(text);
        let v: Vec<Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(v.len(), 1);
        assert_eq!(v[0]["conjugation"]["past"], "ging");
    }

    #[test]
    fn leading_prose_is_skipped() {
        let truncated = r#"Here you go: [{"word":"Haus"},{"word":"Bau"#;
        assert_eq!(repair_json_array(truncated), r#"[{"word":"Haus"}]"#);
        let complete = r#"Sure! [{"word":"Haus"},{"word":"Baum"}]"#;
        assert_eq!(parse_array_lenient(complete).len(), 2);
        assert_eq!(parse_array_lenient(r#"Result: {"word":"Haus"}"#).len(), 1);
    }

    #[test]
    fn bare_object_and_garbage() {
        assert_eq!(parse_array_lenient(r#"{"word":"Haus"}"#).len(), 1);
        assert!(parse_array_lenient("not json").is_empty());
    }
}
