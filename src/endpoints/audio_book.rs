//! Audiobook endpoint: rewrite the source text for narration, then voice it
//!
//! Unlike the other endpoints this one reports failures in-band as a
//! failure-status payload, so batch callers always get a well-formed body.

use axum::Json;
use axum::extract::State;
use std::path::Path;
use tracing::warn;

use crate::audio;
use crate::clients::{CompletionRequest, SpeechRequest};
use crate::error::EngineError;
use crate::http::AppState;
use crate::prompts;
use crate::schemas::{AudioBookRequest, AudioBookResponse};
use crate::tokens;

pub async fn audio_book(
    State(state): State<AppState>,
    Json(req): Json<AudioBookRequest>,
) -> Json<AudioBookResponse> {
    match run(&state, &req).await {
        Ok(response) => Json(response),
        Err(err) => {
            warn!("audio book generation failed: {err}");
            Json(AudioBookResponse {
                status: "error".to_string(),
                message: format!("An error occurred while processing the request: {err}"),
                text: String::new(),
                file_path: String::new(),
                token_count: 0,
                duration: 0.0,
            })
        }
    }
}

async fn run(state: &AppState, req: &AudioBookRequest) -> Result<AudioBookResponse, EngineError> {
    let rewrite_instructions = state.prompts.render(prompts::AUDIOBOOK_REWRITE, &[])?;
    let narration_instructions = state.prompts.render(prompts::AUDIOBOOK_NARRATION, &[])?;

    let model = state.config.system.audiobook_model.as_str();
    let narration_text = state
        .language
        .complete(CompletionRequest {
            model,
            instructions: &rewrite_instructions,
            input: &req.text,
            max_output_tokens: Some(state.config.system.audiobook_max_output_tokens),
            temperature: Some(state.config.system.audiobook_temperature),
        })
        .await?;

    let bytes = state
        .speech
        .synthesize(SpeechRequest {
            model: &state.config.system.tts_model,
            voice: &req.voice,
            instructions: &narration_instructions,
            input: &narration_text,
        })
        .await?;

    let speech_dir = Path::new(&state.config.system.speech_dir);
    audio::ensure_speech_dir(speech_dir)?;
    let file_path = audio::speech_file_path(speech_dir, "audio-book", req.id);
    tokio::fs::write(&file_path, &bytes).await?;

    let duration = audio::duration_seconds(&file_path)?;
    let token_count =
        tokens::count_tokens(&req.text, model) + tokens::count_tokens(&narration_text, model);

    Ok(AudioBookResponse {
        status: "success".to_string(),
        message: "Audio book created successfully".to_string(),
        text: narration_text,
        file_path: file_path.display().to_string(),
        token_count,
        duration,
    })
}
