//! Handler tests driven directly with scripted model clients

use async_trait::async_trait;
use axum::Json;
use axum::extract::State;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use lingodesk::clients::{
    CompletionRequest, LanguageModel, ModelError, SpeechModel, SpeechRequest,
};
use lingodesk::config::Config;
use lingodesk::endpoints;
use lingodesk::http::{AppState, HttpMetrics};
use lingodesk::prompts::PromptRegistry;
use lingodesk::schemas::{
    AudioBookRequest, ChatTurn, ChatbotRequest, CorrectionRequest, TextToSpeechRequest,
    TranslationRequest,
};

/// Language model that replays a canned reply (or fails when `None`).
struct ScriptedModel {
    completion: Option<String>,
    chat_reply: Option<String>,
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, _req: CompletionRequest<'_>) -> Result<String, ModelError> {
        self.completion.clone().ok_or(ModelError::EmptyOutput)
    }

    async fn chat(
        &self,
        _model: &str,
        _system: &str,
        _turns: &[ChatTurn],
    ) -> Result<String, ModelError> {
        self.chat_reply.clone().ok_or(ModelError::EmptyOutput)
    }
}

/// Speech model that replays canned audio bytes.
struct ScriptedSpeech {
    bytes: Vec<u8>,
}

#[async_trait]
impl SpeechModel for ScriptedSpeech {
    async fn synthesize(&self, _req: SpeechRequest<'_>) -> Result<Vec<u8>, ModelError> {
        Ok(self.bytes.clone())
    }
}

/// Minimal mono 16-bit PCM WAV with the requested number of samples.
fn wav_fixture(samples: u32, sample_rate: u32) -> Vec<u8> {
    let data_len = samples * 2;
    let mut wav = Vec::with_capacity(44 + data_len as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&(sample_rate * 2).to_le_bytes()); // byte rate
    wav.extend_from_slice(&2u16.to_le_bytes()); // block align
    wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.resize(44 + data_len as usize, 0);
    wav
}

fn scratch_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("lingodesk-test-{tag}-{}", std::process::id()))
}

fn state_with(
    completion: Option<&str>,
    chat_reply: Option<&str>,
    speech_bytes: Vec<u8>,
    speech_dir: &Path,
) -> AppState {
    let mut config = Config::default();
    config.system.speech_dir = speech_dir.display().to_string();

    let prompts =
        PromptRegistry::load(Path::new("config")).expect("shipped prompt assets should load");

    AppState {
        config: Arc::new(config),
        prompts: Arc::new(prompts),
        language: Arc::new(ScriptedModel {
            completion: completion.map(str::to_string),
            chat_reply: chat_reply.map(str::to_string),
        }),
        speech: Arc::new(ScriptedSpeech { bytes: speech_bytes }),
        metrics: Arc::new(Mutex::new(HttpMetrics::new())),
    }
}

#[tokio::test]
async fn translation_maps_extracted_keys_into_the_payload() {
    let state = state_with(
        Some(r#"output: {"translation": "مرحبا", "info": "تحية"}"#),
        None,
        Vec::new(),
        &scratch_dir("translation"),
    );

    let Json(resp) = endpoints::translation::translate_text(
        State(state),
        Json(TranslationRequest {
            text: "Hello".to_string(),
            target_language: "Arabic".to_string(),
        }),
    )
    .await
    .unwrap();

    assert_eq!(resp.status, "success");
    assert_eq!(resp.translation, "مرحبا");
    assert_eq!(resp.info, "تحية");
    assert!(resp.token_count > 0);
}

#[tokio::test]
async fn translation_substitutes_sentinels_for_missing_keys() {
    let state = state_with(
        Some(r#"{"translation": "hola"}"#),
        None,
        Vec::new(),
        &scratch_dir("translation-sentinel"),
    );

    let Json(resp) = endpoints::translation::translate_text(
        State(state),
        Json(TranslationRequest {
            text: "Hello".to_string(),
            target_language: "Spanish".to_string(),
        }),
    )
    .await
    .unwrap();

    assert_eq!(resp.translation, "hola");
    assert_eq!(resp.info, "error:info not found");
}

#[tokio::test]
async fn correction_coerces_a_quoted_score() {
    let state = state_with(
        Some(r#"score: {"score": "21", "feedback": "Solid work"}"#),
        None,
        Vec::new(),
        &scratch_dir("correction"),
    );

    let Json(resp) = endpoints::correction::correct_writing(
        State(state),
        Json(CorrectionRequest {
            question: "Describe your last holiday.".to_string(),
            text: "My holiday was very fun.".to_string(),
        }),
    )
    .await
    .unwrap();

    assert_eq!(resp.score, 21);
    assert_eq!(resp.feedback, "Solid work");
}

#[tokio::test]
async fn correction_defaults_when_keys_are_malformed() {
    // Parseable object, but score is junk and feedback is missing
    let state = state_with(
        Some(r#"{"score": "high", "comment": "n/a"}"#),
        None,
        Vec::new(),
        &scratch_dir("correction-defaults"),
    );

    let Json(resp) = endpoints::correction::correct_writing(
        State(state),
        Json(CorrectionRequest {
            question: "q".to_string(),
            text: "t".to_string(),
        }),
    )
    .await
    .unwrap();

    assert_eq!(resp.score, 0);
    assert_eq!(resp.feedback, "No feedback available");
}

#[tokio::test]
async fn chatbot_extends_the_conversation_history() {
    let state = state_with(
        None,
        Some("Great question! 'Apple' means تفاحة."),
        Vec::new(),
        &scratch_dir("chatbot"),
    );

    let Json(resp) = endpoints::chatbot::chatbot_chat(
        State(state),
        Json(ChatbotRequest {
            message: "What does apple mean?".to_string(),
            conversation_history: vec![ChatTurn {
                role: "user".to_string(),
                content: "Hi".to_string(),
            }],
        }),
    )
    .await
    .unwrap();

    assert_eq!(resp.response, "Great question! 'Apple' means تفاحة.");
    assert_eq!(resp.conversation_history.len(), 3);
    assert_eq!(resp.conversation_history[1].role, "user");
    assert_eq!(resp.conversation_history[2].role, "assistant");
    assert_eq!(resp.conversation_history[2].content, resp.response);
}

#[tokio::test]
async fn text_to_speech_writes_the_file_and_probes_duration() {
    let dir = scratch_dir("tts");
    let state = state_with(None, None, wav_fixture(8000, 16000), &dir);

    let Json(resp) = endpoints::text_to_speech::text_to_speech(
        State(state),
        Json(TextToSpeechRequest {
            text: "Read this aloud".to_string(),
            id: 7,
            voice: "nova".to_string(),
            accent: None,
        }),
    )
    .await
    .unwrap();

    assert_eq!(resp.status, "success");
    assert!(resp.file_path.ends_with("speech_7.mp3"));
    assert!(Path::new(&resp.file_path).exists());
    // 8000 samples at 16 kHz
    assert!((resp.duration - 0.5).abs() < 0.05, "duration {}", resp.duration);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn audio_book_reports_upstream_failure_in_band() {
    let state = state_with(None, None, Vec::new(), &scratch_dir("audiobook-fail"));

    let Json(resp) = endpoints::audio_book::audio_book(
        State(state),
        Json(AudioBookRequest {
            text: "Once upon a time".to_string(),
            id: 1,
            voice: "nova".to_string(),
            accent: None,
        }),
    )
    .await;

    assert_eq!(resp.status, "error");
    assert!(resp.message.contains("An error occurred"));
    assert_eq!(resp.token_count, 0);
    assert_eq!(resp.duration, 0.0);
}

#[tokio::test]
async fn audio_book_narrates_the_rewritten_text() {
    let dir = scratch_dir("audiobook");
    let state = state_with(
        Some("Once upon a time, in a quiet town, there lived a cat."),
        None,
        wav_fixture(16000, 16000),
        &dir,
    );

    let Json(resp) = endpoints::audio_book::audio_book(
        State(state),
        Json(AudioBookRequest {
            text: "cat story".to_string(),
            id: 2,
            voice: "nova".to_string(),
            accent: None,
        }),
    )
    .await;

    assert_eq!(resp.status, "success");
    assert_eq!(resp.text, "Once upon a time, in a quiet town, there lived a cat.");
    assert!(resp.file_path.ends_with("audio-book_2.mp3"));
    assert!(resp.duration > 0.9);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn purge_removes_generated_speech_files() {
    let dir = scratch_dir("purge");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("speech_1.mp3"), b"x").unwrap();
    std::fs::write(dir.join("speech_2.mp3"), b"y").unwrap();
    std::fs::write(dir.join("notes.txt"), b"keep me").unwrap();

    let state = state_with(None, None, Vec::new(), &dir);
    let Json(resp) = endpoints::speech_files::del_speech_files(State(state))
        .await
        .unwrap();

    assert_eq!(resp.deleted, 2);
    assert!(dir.join("notes.txt").exists(), "only mp3 files are purged");

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn upstream_failure_propagates_as_an_error_for_strict_endpoints() {
    let state = state_with(None, None, Vec::new(), &scratch_dir("upstream-fail"));

    let result = endpoints::translation::translate_text(
        State(state),
        Json(TranslationRequest {
            text: "Hello".to_string(),
            target_language: "French".to_string(),
        }),
    )
    .await;

    assert!(result.is_err());
}
