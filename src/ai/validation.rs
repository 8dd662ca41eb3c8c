//! JSON extraction for LLM responses
//!
//! Local models often wrap JSON in markdown fences, leave trailing commas,
//! stop before closing brackets or add prose around the payload. The
//! repairer tries progressively more aggressive fixes before giving up.

use serde_json::Value;
use tracing::debug;

use crate::types::{Result, TermError};

/// Extract and parse JSON from an LLM response
pub fn extract_json_from_response(content: &str) -> Result<Value> {
    JsonRepairer::new().parse_or_repair(content).map(|(value, _)| value)
}

/// JSON repair strategies
pub struct JsonRepairer {
    max_repair_attempts: usize,
}

impl Default for JsonRepairer {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonRepairer {
    pub fn new() -> Self {
        Self {
            max_repair_attempts: 2,
        }
    }

    /// Parse JSON, attempting repair if initial parse fails
    ///
    /// Returns (Value, was_repaired)
    pub fn parse_or_repair(&self, raw: &str) -> Result<(Value, bool)> {
        let cleaned = preprocess(raw);

        if let Ok(value) = serde_json::from_str::<Value>(&cleaned) {
            return Ok((value, false));
        }

        for attempt in 1..=self.max_repair_attempts {
            let repaired = repair_attempt(&cleaned, attempt);
            if let Ok(value) = serde_json::from_str::<Value>(&repaired) {
                debug!("LLM JSON repaired on attempt {}", attempt);
                return Ok((value, true));
            }
        }

        if let Some(extracted) = extract_from_mixed(&cleaned) {
            let extracted = fix_trailing_commas(&extracted);
            if let Ok(value) = serde_json::from_str::<Value>(&extracted) {
                debug!("LLM JSON extracted from surrounding text");
                return Ok((value, true));
            }
        }

        Err(TermError::LlmApi(format!(
            "Failed to parse JSON from LLM output: {}...",
            cleaned.chars().take(200).collect::<String>()
        )))
    }
}

fn preprocess(raw: &str) -> String {
    let s = raw.trim().trim_start_matches('\u{feff}');
    strip_code_fences(s).trim().to_string()
}

fn strip_code_fences(s: &str) -> &str {
    let mut result = s;
    if result.starts_with("```")
        && let Some(first_newline) = result.find('\n')
    {
        result = &result[first_newline + 1..];
    }
    result.trim_end().strip_suffix("```").unwrap_or(result)
}

fn repair_attempt(s: &str, level: usize) -> String {
    let mut result = fix_trailing_commas(s);
    if level >= 2 {
        result = result
            .chars()
            .filter(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
            .collect();
    }
    balance_brackets(&result)
}

/// Drop commas that directly precede `]` or `}`
fn fix_trailing_commas(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len());
    let mut in_string = false;
    let mut escape = false;

    for (i, &ch) in chars.iter().enumerate() {
        if escape {
            escape = false;
        } else if ch == '\\' && in_string {
            escape = true;
        } else if ch == '"' {
            in_string = !in_string;
        } else if ch == ',' && !in_string {
            let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
            if matches!(next, Some(']') | Some('}')) {
                continue;
            }
        }
        result.push(ch);
    }
    result
}

/// Close an unterminated string and any unclosed brackets, innermost first
fn balance_brackets(s: &str) -> String {
    let mut stack = Vec::new();
    let mut in_string = false;
    let mut escape = false;

    for ch in s.chars() {
        if escape {
            escape = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape = true,
            '"' => in_string = !in_string,
            '{' if !in_string => stack.push('}'),
            '[' if !in_string => stack.push(']'),
            '}' | ']' if !in_string => {
                stack.pop();
            }
            _ => {}
        }
    }

    let mut result = s.to_string();
    if in_string {
        result.push('"');
    }
    while let Some(closer) = stack.pop() {
        result.push(closer);
    }
    result
}

/// First balanced `{...}` or `[...]` in the text
fn extract_from_mixed(s: &str) -> Option<String> {
    let start = s.find(['{', '['])?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape = false;

    for (i, ch) in s[start..].char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape = true,
            '"' => in_string = !in_string,
            '{' | '[' if !in_string => depth += 1,
            '}' | ']' if !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(s[start..start + i + 1].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_json() {
        let (value, repaired) = JsonRepairer::new()
            .parse_or_repair(r#"["wlk", "wolk"]"#)
            .unwrap();
        assert!(!repaired);
        assert_eq!(value[1], "wolk");
    }

    #[test]
    fn test_strip_code_fences() {
        let input = "```json\n{\"rating\": 72}\n```";
        let value = extract_json_from_response(input).unwrap();
        assert_eq!(value["rating"], 72);
    }

    #[test]
    fn test_fix_trailing_comma() {
        let (value, repaired) = JsonRepairer::new()
            .parse_or_repair(r#"["nimbus", "vapor",]"#)
            .unwrap();
        assert!(repaired);
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_comma_inside_string_kept() {
        assert_eq!(fix_trailing_commas(r#"["a,]"]"#), r#"["a,]"]"#);
    }

    #[test]
    fn test_balance_brackets() {
        let (value, repaired) = JsonRepairer::new()
            .parse_or_repair(r#"{"isAvailable": true, "confidence": 80"#)
            .unwrap();
        assert!(repaired);
        assert_eq!(value["confidence"], 80);
    }

    #[test]
    fn test_balance_nested_in_order() {
        assert_eq!(balance_brackets(r#"{"a": ["b""#), r#"{"a": ["b"]}"#);
    }

    #[test]
    fn test_extract_from_mixed() {
        let input = "Sure! Here are the names:\n[\"clwd\", \"cloud\"]\nLet me know if you need more.";
        let value = extract_json_from_response(input).unwrap();
        assert_eq!(value[0], "clwd");
    }

    #[test]
    fn test_unparseable() {
        assert!(extract_json_from_response("no json here").is_err());
    }
}
