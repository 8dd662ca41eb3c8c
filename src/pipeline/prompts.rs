//! LLM Prompts and Response Parsing
//!
//! Prompt text and JSON schemas for the four LLM-backed stages, plus the
//! tolerant parsers that turn model output into cache values. Parsers never
//! fail; unusable output maps to the stage's negative value.

use serde_json::{Value, json};

use crate::ai::ResponseSchema;
use crate::types::{RATING_FAILED, Rating, SearchEvaluation};

// =============================================================================
// Prompts
// =============================================================================

pub fn webify_prompt(word: &str) -> String {
    format!(
        "Convert the following word into a list of Web 2.0 style SaaS name by removing a single vowel each time. \
         Return the output as a JS string array. If there is only one result make sure the array has only one element. \
         Do not output any text other than the array\n\nword: {}",
        word
    )
}

pub fn synonyms_prompt(word: &str) -> String {
    format!(
        "Find synonyms for the provided word. Provide at least 10 synonyms. \
         Return the output as a JS string array. If there is only one result make sure the array has only one element. \
         Do not output any text other than the array\n\nword: {}",
        word
    )
}

pub fn rating_prompt(word: &str) -> String {
    format!(
        "Given the following word, rate its potential for a good product/business name. \
         This should include how easy it would be to pronounce for an english speaker and how easy it would be to spell. \
         Output the rating as a number between 0 and 100 where 0 is bad and 100 is good.\n\nword: {}",
        word
    )
}

/// `html` is truncated to `limit` characters before it goes into the prompt
pub fn search_prompt(word: &str, html: &str, limit: usize) -> String {
    format!(
        "Given the following search results, determine if the word is a good product/business name or not. \
         It is a bad name if there is an existing product or business by the same or similar name in the Tech/Software industry. \
         Output the result as a json that looks like '{{\"isAvailable\": true, \"confidence\": 42}}' where true is replaced with \
         the actual result of it being a good or bad name. true for good, false for bad. confidence is a rating between 0 and 100 \
         where 0 is the lowest confidence and 100 is the highest confidence. Do not output any text other than the raw json. \
         That means no markdown syntax.\n\nword: {}\n\nsearch results: {}",
        word,
        truncate_chars(html, limit)
    )
}

fn truncate_chars(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// =============================================================================
// Schemas
// =============================================================================

pub fn string_list_schema(name: &'static str) -> ResponseSchema {
    ResponseSchema::new(
        name,
        json!({
            "type": "array",
            "items": {"type": "string"}
        }),
    )
}

pub fn rating_schema() -> ResponseSchema {
    ResponseSchema::new(
        "rating",
        json!({
            "type": "object",
            "properties": {"rating": {"type": "number"}},
            "required": ["rating"]
        }),
    )
}

pub fn search_schema() -> ResponseSchema {
    ResponseSchema::new(
        "search_evaluation",
        json!({
            "type": "object",
            "properties": {
                "isAvailable": {"type": "boolean"},
                "confidence": {"type": "number"}
            },
            "required": ["isAvailable", "confidence"]
        }),
    )
}

// =============================================================================
// Parsers
// =============================================================================

/// Lowercased single-token strings from an array response.
///
/// Accepts a bare array or an object wrapping exactly one array (some models
/// ignore the top-level array schema). Empty entries, entries containing
/// spaces and non-strings are dropped.
pub fn parse_word_list(value: &Value) -> Vec<String> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.values().find_map(Value::as_array) {
            Some(items) => items,
            None => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    items
        .iter()
        .filter_map(Value::as_str)
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty() && !s.contains(char::is_whitespace))
        .collect()
}

/// Rating clamped to `[0, 100]`, or the failure sentinel
pub fn parse_rating(value: &Value) -> Rating {
    let raw = match value {
        Value::Object(map) => map.get("rating").and_then(number_like),
        other => number_like(other),
    };
    match raw {
        Some(rating) if rating.is_finite() => rating.clamp(0.0, 100.0),
        _ => RATING_FAILED,
    }
}

/// Search verdict with confidence clamped to `[0, 100]`, or the failure shape
pub fn parse_search_evaluation(value: &Value) -> SearchEvaluation {
    let Some(is_available) = value.get("isAvailable").and_then(bool_like) else {
        return SearchEvaluation::failed();
    };
    let confidence = value
        .get("confidence")
        .and_then(number_like)
        .filter(|c| c.is_finite())
        .map_or(0.0, |c| c.clamp(0.0, 100.0));

    SearchEvaluation {
        is_available,
        confidence,
    }
}

fn number_like(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn bool_like(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.trim().to_lowercase().parse().ok(),
        _ => None,
    }
}
