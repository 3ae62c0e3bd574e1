//! Tolerant JSON extraction from free-form model output
//!
//! Completion prompts instruct the upstream model to emit pure JSON, but the
//! model is not format-constrained: replies arrive wrapped in prose, with a
//! leading label, with single-quoted keys, or with no braces at all. This
//! module repairs the common deviations and parses the result, favoring
//! best-effort recovery over strict rejection.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

/// Key/value record recovered from model output. Always an object mapping,
/// never an array or scalar.
pub type ExtractedRecord = Map<String, Value>;

/// Conventional label that prompt templates put in front of their output.
pub const OUTPUT_HEADER: &str = "output:";

/// Raised when no brace-delimited or pattern-recoverable structure exists.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no structured record in model output: {source}")]
    Unparseable {
        #[source]
        source: serde_json::Error,
    },
}

// First `{` to last `}`, greedily, across newlines. Multiple JSON-ish
// fragments collapse into one span that may over-capture intervening prose.
static BRACE_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("brace span regex must compile"));

// `'key':` with a single-quoted key. String values are left alone.
static SINGLE_QUOTED_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'([^']*)':").expect("quoted key regex must compile"));

// Recovery patterns for the score/feedback shape. Keys and the feedback
// value may be single-quoted, double-quoted, or bare.
static SCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"["']?score["']?\s*:\s*(\d+)"#).expect("score regex must compile"));
static FEEDBACK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"["']?feedback["']?\s*:\s*["']([^"']*)["']"#)
        .expect("feedback regex must compile")
});

/// Extract a structured record from raw model output.
///
/// `header` is stripped from the front of the trimmed text only on an exact,
/// case-sensitive match. An empty input wraps to `{}` and yields an empty
/// record rather than an error.
pub fn extract_record(raw: &str, header: &str) -> Result<ExtractedRecord, ExtractionError> {
    let mut text = raw.trim();

    // Remove the label if present
    if let Some(rest) = text.strip_prefix(header) {
        text = rest.trim();
    }

    // Restrict to the first-to-last brace span when one exists
    let mut working = match BRACE_SPAN.find(text) {
        Some(span) => span.as_str().to_string(),
        None => text.to_string(),
    };

    if !working.starts_with('{') {
        // No object shape at all: either the score/feedback pattern is
        // recognizable, or force the text into object shape.
        if let Some(record) = recover_score_feedback(&working) {
            return Ok(record);
        }
        working = format!("{{{working}}}");
    }

    // Valid JSON must parse exactly as written; normalization only runs on
    // text that strict parsing already rejected.
    if let Ok(record) = serde_json::from_str::<ExtractedRecord>(&working) {
        return Ok(record);
    }

    let normalized = SINGLE_QUOTED_KEY.replace_all(&working, "\"$1\":");
    match serde_json::from_str::<ExtractedRecord>(&normalized) {
        Ok(record) => Ok(record),
        Err(err) => recover_score_feedback(&normalized)
            .ok_or(ExtractionError::Unparseable { source: err }),
    }
}

/// Synthesize the minimal two-key record when both the score and feedback
/// patterns appear somewhere in the text.
fn recover_score_feedback(text: &str) -> Option<ExtractedRecord> {
    let score: i64 = SCORE.captures(text)?.get(1)?.as_str().parse().ok()?;
    let feedback = FEEDBACK.captures(text)?.get(1)?.as_str().to_string();

    let mut record = ExtractedRecord::new();
    record.insert("score".to_string(), Value::from(score));
    record.insert("feedback".to_string(), Value::from(feedback));
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_strip_is_exact_prefix_only() {
        // Exact match strips and the remainder recovers via brace wrapping
        let record = extract_record("output: 'count': 3", "output:").unwrap();
        assert_eq!(record.get("count"), Some(&Value::from(3)));

        // Case-mismatched header is not stripped, so the label pollutes the
        // wrapped object and nothing is recoverable
        let result = extract_record("Output: 'count': 3", "output:");
        assert!(result.is_err(), "case-folded header must not strip");
    }

    #[test]
    fn greedy_span_runs_first_to_last_brace() {
        let raw = r#"one {"a": 1} two {"b": 2} three"#;
        // The span covers `{"a": 1} two {"b": 2}`, which is not valid JSON
        // and has no score/feedback shape
        assert!(extract_record(raw, OUTPUT_HEADER).is_err());
    }

    #[test]
    fn braceless_score_feedback_is_synthesized_directly() {
        let record = extract_record("'score': 9, 'feedback': 'Good job'", OUTPUT_HEADER).unwrap();
        assert_eq!(record.get("score"), Some(&Value::from(9)));
        assert_eq!(record.get("feedback"), Some(&Value::from("Good job")));
    }

    #[test]
    fn normalization_leaves_double_quoted_values_alone() {
        // A valid object whose string value contains a `'key':` shape must
        // parse exactly as written
        let raw = r#"{"note": "prefer the 'foo': style here"}"#;
        let record = extract_record(raw, OUTPUT_HEADER).unwrap();
        assert_eq!(
            record.get("note"),
            Some(&Value::from("prefer the 'foo': style here"))
        );
    }

    #[test]
    fn numeric_string_score_stays_a_string() {
        let record = extract_record(r#"{"score": "9", "feedback": "ok"}"#, OUTPUT_HEADER).unwrap();
        assert_eq!(record.get("score"), Some(&Value::from("9")));
    }
}
