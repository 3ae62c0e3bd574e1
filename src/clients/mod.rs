//! Upstream model clients

pub mod openai;
pub mod traits;

pub use openai::OpenAiClient;
pub use traits::{CompletionRequest, LanguageModel, ModelError, SpeechModel, SpeechRequest};
