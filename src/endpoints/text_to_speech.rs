//! Text-to-speech endpoint: synthesize narration and write it under the
//! speech directory

use axum::Json;
use axum::extract::State;
use std::path::Path;

use crate::audio;
use crate::clients::SpeechRequest;
use crate::error::EngineError;
use crate::http::AppState;
use crate::prompts;
use crate::schemas::{TextToSpeechRequest, TextToSpeechResponse};
use crate::tokens;

pub async fn text_to_speech(
    State(state): State<AppState>,
    Json(req): Json<TextToSpeechRequest>,
) -> Result<Json<TextToSpeechResponse>, EngineError> {
    let instructions = state.prompts.render(prompts::TTS_NARRATION, &[])?;
    let model = state.config.system.tts_model.as_str();

    let bytes = state
        .speech
        .synthesize(SpeechRequest {
            model,
            voice: &req.voice,
            instructions: &instructions,
            input: &req.text,
        })
        .await?;

    let speech_dir = Path::new(&state.config.system.speech_dir);
    audio::ensure_speech_dir(speech_dir)?;
    let file_path = audio::speech_file_path(speech_dir, "speech", req.id);
    tokio::fs::write(&file_path, &bytes).await?;

    let duration = audio::duration_seconds(&file_path)?;
    let token_count = tokens::count_tokens(&req.text, model);

    Ok(Json(TextToSpeechResponse {
        status: "success".to_string(),
        message: "Speech synthesis complete".to_string(),
        file_path: file_path.display().to_string(),
        token_count,
        duration,
    }))
}
