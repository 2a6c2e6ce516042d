// src/core/normalizer.rs
//! Recovers the JSON object from free-form model output and maps it onto
//! the fixed `ScoringResult` schema.
//!
//! Each step is a small pure function: strip fences, slice the outer braces,
//! parse, then read every expected key with a typed default. Recovery stops
//! there; anything that still does not parse is `MalformedModelOutput`.

use serde_json::{Map, Value};

use crate::error::{AnalysisError, Result};
use crate::types::{AtsCriteriaRatings, MatchItem, ScoringResult};

const FENCE: &str = "```";

/// Remove a leading ```lang fence line and a trailing ``` fence
pub fn strip_code_fences(raw: &str) -> &str {
    let text = raw.trim();
    let Some(after_open) = text.strip_prefix(FENCE) else {
        return text;
    };
    // drop the language tag, if any, up to the end of the opening line
    let body = match after_open.find('\n') {
        Some(idx) => &after_open[idx + 1..],
        None => after_open.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    body.trim_end().trim_end_matches(FENCE).trim()
}

/// Slice from the first `{` to the last `}` inclusive
pub fn slice_outer_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse the single JSON object embedded in model output
pub fn extract_json_object(raw: &str) -> Result<Map<String, Value>> {
    let text = strip_code_fences(raw);
    let candidate = slice_outer_object(text).ok_or_else(|| {
        AnalysisError::MalformedModelOutput("no JSON object found in model output".to_string())
    })?;

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AnalysisError::MalformedModelOutput(
            "model output is not a JSON object".to_string(),
        )),
        Err(e) => Err(AnalysisError::MalformedModelOutput(format!(
            "invalid JSON in model output: {}",
            e
        ))),
    }
}

/// Full pipeline: raw model text -> schema-conformant result
pub fn normalize(raw: &str) -> Result<ScoringResult> {
    extract_json_object(raw).map(|object| normalize_object(&object))
}

/// Total mapping onto the fixed schema. Missing or mistyped fields take
/// their defaults; this never fails.
pub fn normalize_object(object: &Map<String, Value>) -> ScoringResult {
    let improvement_suggestions = object
        .get("improvement_suggestions")
        .filter(|value| value.is_array())
        .or_else(|| object.get("improvementSuggestions"));

    ScoringResult {
        overall_score: bounded_int(object.get("overall_score"), 100),
        top_matches: match_items(object.get("top_matches")),
        top_gaps: match_items(object.get("top_gaps")),
        feedback_summary: string_list(object.get("feedback_summary")),
        pros: string_list(object.get("pros")),
        cons: string_list(object.get("cons")),
        improvement_suggestions: string_list(improvement_suggestions),
        ats_criteria_ratings: ats_ratings(object.get("ats_criteria_ratings")),
        confidence_score: bounded_int(object.get("confidence_score"), 100),
    }
}

/// Integer in `0..=max`; accepts floats (rounded) and numeric strings
fn bounded_int(value: Option<&Value>, max: u8) -> u8 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) if n.is_finite() => n.round().clamp(0.0, f64::from(max)) as u8,
        _ => 0,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .collect()
}

fn match_items(value: Option<&Value>) -> Vec<MatchItem> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(fields) => Some(MatchItem {
                title: text_field(fields, "title"),
                description: text_field(fields, "description"),
            }),
            Value::String(s) => Some(MatchItem {
                title: s.clone(),
                description: String::new(),
            }),
            _ => None,
        })
        .collect()
}

fn text_field(fields: &Map<String, Value>, key: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn ats_ratings(value: Option<&Value>) -> AtsCriteriaRatings {
    let empty = Map::new();
    let fields = match value {
        Some(Value::Object(fields)) => fields,
        _ => &empty,
    };
    let rating = |key: &str| bounded_int(fields.get(key), 10);

    AtsCriteriaRatings {
        keyword_match: rating("keyword_match"),
        formatting: rating("formatting"),
        section_structure: rating("section_structure"),
        quantified_achievements: rating("quantified_achievements"),
        action_verbs: rating("action_verbs"),
        contact_information: rating("contact_information"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FULL: &str = r#"{
        "overall_score": 72,
        "top_matches": [{"title": "Go", "description": "Five years"}],
        "top_gaps": [{"title": "Kubernetes"}],
        "feedback_summary": ["a", "b", "c", "d", "e"],
        "pros": ["p1", "p2", "p3"],
        "cons": ["c1", "c2", "c3"],
        "improvement_suggestions": ["s1", "s2", "s3", "s4", "s5"],
        "ats_criteria_ratings": {
            "keyword_match": 8, "formatting": 7, "section_structure": 9,
            "quantified_achievements": 5, "action_verbs": 6, "contact_information": 10
        },
        "confidence_score": 85
    }"#;

    #[test]
    fn test_prose_wrapped_fenced_output() {
        let raw = "Sure! ```json\n{\"overall_score\": 72}\n```";
        let result = normalize(raw).unwrap();
        assert_eq!(
            result,
            ScoringResult {
                overall_score: 72,
                ..ScoringResult::default()
            }
        );
        assert!(result.top_matches.is_empty());
        assert_eq!(result.confidence_score, 0);
    }

    #[test]
    fn test_fenced_equals_unfenced() {
        let fenced = format!("```json\n{}\n```", FULL);
        assert_eq!(normalize(&fenced).unwrap(), normalize(FULL).unwrap());

        let bare_fence = format!("```\n{}\n```", FULL);
        assert_eq!(normalize(&bare_fence).unwrap(), normalize(FULL).unwrap());
    }

    #[test]
    fn test_full_object_maps_every_field() {
        let result = normalize(FULL).unwrap();
        assert_eq!(result.overall_score, 72);
        assert_eq!(result.top_matches[0].description, "Five years");
        assert_eq!(result.top_gaps[0].title, "Kubernetes");
        assert_eq!(result.top_gaps[0].description, "");
        assert_eq!(result.feedback_summary.len(), 5);
        assert_eq!(result.improvement_suggestions.len(), 5);
        assert_eq!(result.ats_criteria_ratings.contact_information, 10);
        assert_eq!(result.confidence_score, 85);
    }

    #[test]
    fn test_every_subset_of_keys_normalizes() {
        let full: Map<String, Value> = serde_json::from_str(FULL).unwrap();
        let keys: Vec<&String> = full.keys().collect();

        for mask in 0u32..(1 << keys.len()) {
            let partial: Map<String, Value> = keys
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << *i) != 0)
                .map(|(_, k)| ((*k).clone(), full[k.as_str()].clone()))
                .collect();
            let value = serde_json::to_value(normalize_object(&partial)).unwrap();

            for key in &keys {
                assert!(!value[key.as_str()].is_null(), "{} missing for mask {}", key, mask);
            }
            assert!(value["top_matches"].is_array());
            assert!(value["pros"].is_array());
            assert!(value["overall_score"].is_u64());
        }
    }

    #[test]
    fn test_legacy_improvement_key_is_accepted() {
        let result = normalize(r#"{"improvementSuggestions": ["x", "y"]}"#).unwrap();
        assert_eq!(result.improvement_suggestions, vec!["x", "y"]);

        // the current key wins when both are present
        let result = normalize(
            r#"{"improvement_suggestions": ["new"], "improvementSuggestions": ["old"]}"#,
        )
        .unwrap();
        assert_eq!(result.improvement_suggestions, vec!["new"]);

        // a null or mistyped current key does not hide the legacy one
        let result = normalize(
            r#"{"improvement_suggestions": null, "improvementSuggestions": ["legacy"]}"#,
        )
        .unwrap();
        assert_eq!(result.improvement_suggestions, vec!["legacy"]);
    }

    #[test]
    fn test_scores_are_clamped_and_coerced() {
        let object = json!({
            "overall_score": 140,
            "confidence_score": "77.6",
            "ats_criteria_ratings": {"keyword_match": -3, "formatting": 9.4, "action_verbs": "n/a"}
        });
        let result = normalize_object(object.as_object().unwrap());
        assert_eq!(result.overall_score, 100);
        assert_eq!(result.confidence_score, 78);
        assert_eq!(result.ats_criteria_ratings.keyword_match, 0);
        assert_eq!(result.ats_criteria_ratings.formatting, 9);
        assert_eq!(result.ats_criteria_ratings.action_verbs, 0);
    }

    #[test]
    fn test_mistyped_fields_take_defaults() {
        let object = json!({
            "top_matches": "not a list",
            "pros": [1, "two", null, {"x": 1}],
            "ats_criteria_ratings": [1, 2, 3]
        });
        let result = normalize_object(object.as_object().unwrap());
        assert!(result.top_matches.is_empty());
        assert_eq!(result.pros, vec!["1", "two"]);
        assert_eq!(result.ats_criteria_ratings, AtsCriteriaRatings::default());
    }

    #[test]
    fn test_unparseable_output_is_malformed() {
        for raw in [
            "",
            "I cannot help with that.",
            "} backwards {",
            "```json\n{\"overall_score\": 72,,}\n```",
            "[1, 2, 3]",
        ] {
            assert!(
                matches!(normalize(raw), Err(AnalysisError::MalformedModelOutput(_))),
                "expected malformed for {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  {}  "), "{}");
        assert_eq!(strip_code_fences("```json{}```"), "{}");
        assert_eq!(strip_code_fences("Sure ```json\n{}\n```"), "Sure ```json\n{}\n```");
    }

    #[test]
    fn test_slice_outer_object_keeps_nested_braces() {
        assert_eq!(
            slice_outer_object("note: {\"a\": {\"b\": 1}} thanks"),
            Some("{\"a\": {\"b\": 1}}")
        );
        assert_eq!(slice_outer_object("no braces"), None);
    }
}
