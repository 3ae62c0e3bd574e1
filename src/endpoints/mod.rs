//! HTTP endpoint handlers, one module per operation

pub mod audio_book;
pub mod chatbot;
pub mod correction;
pub mod speech_files;
pub mod text_to_speech;
pub mod translation;

use serde_json::Value;

use crate::extract::ExtractedRecord;

/// Fetch a string field from an extracted record, substituting the
/// caller-facing sentinel when the key is missing.
pub(crate) fn field_or_sentinel(record: &ExtractedRecord, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => format!("error:{key} not found"),
    }
}
