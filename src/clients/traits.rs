use async_trait::async_trait;
use thiserror::Error;

use crate::schemas::ChatTurn;

/// Parameters for a single instruction-following completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub instructions: &'a str,
    pub input: &'a str,
    pub max_output_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// Parameters for a speech synthesis call.
#[derive(Debug, Clone)]
pub struct SpeechRequest<'a> {
    pub model: &'a str,
    pub voice: &'a str,
    pub instructions: &'a str,
    pub input: &'a str,
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("empty output from model")]
    EmptyOutput,
}

/// Text generation surface of the upstream provider.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Single-shot completion with an instruction block and a user input.
    async fn complete(&self, req: CompletionRequest<'_>) -> Result<String, ModelError>;

    /// Multi-turn chat with a system prompt and alternating turns.
    async fn chat(
        &self,
        model: &str,
        system: &str,
        turns: &[ChatTurn],
    ) -> Result<String, ModelError>;
}

/// Speech synthesis surface of the upstream provider.
#[async_trait]
pub trait SpeechModel: Send + Sync {
    /// Synthesize the input as audio and return the encoded bytes (mp3).
    async fn synthesize(&self, req: SpeechRequest<'_>) -> Result<Vec<u8>, ModelError>;
}
