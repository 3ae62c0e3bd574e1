//! Request and response payloads for the HTTP endpoints

use serde::{Deserialize, Serialize};

fn default_voice() -> String {
    "nova".to_string()
}

/// One prior exchange turn in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    pub target_language: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslationResponse {
    pub status: String,
    pub translation: String,
    pub info: String,
    pub token_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorrectionRequest {
    pub question: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrectionResponse {
    pub status: String,
    pub score: i64,
    pub feedback: String,
    pub token_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatbotRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<ChatTurn>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatbotResponse {
    pub status: String,
    pub response: String,
    pub conversation_history: Vec<ChatTurn>,
    pub token_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextToSpeechRequest {
    pub text: String,
    pub id: i64,
    #[serde(default = "default_voice")]
    pub voice: String,
    /// Accepted for wire compatibility; narration style is prompt-driven.
    #[serde(default)]
    pub accent: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextToSpeechResponse {
    pub status: String,
    pub message: String,
    pub file_path: String,
    pub token_count: usize,
    pub duration: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioBookRequest {
    pub text: String,
    pub id: i64,
    #[serde(default = "default_voice")]
    pub voice: String,
    #[serde(default)]
    pub accent: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AudioBookResponse {
    pub status: String,
    pub message: String,
    pub text: String,
    pub file_path: String,
    pub token_count: usize,
    pub duration: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PurgeSpeechFilesResponse {
    pub message: String,
    pub deleted: usize,
}
