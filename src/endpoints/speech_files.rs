//! Housekeeping endpoint that purges generated speech files

use axum::Json;
use axum::extract::State;
use std::path::Path;
use tracing::info;

use crate::audio;
use crate::error::EngineError;
use crate::http::AppState;
use crate::schemas::PurgeSpeechFilesResponse;

pub async fn del_speech_files(
    State(state): State<AppState>,
) -> Result<Json<PurgeSpeechFilesResponse>, EngineError> {
    let deleted = audio::purge_speech_files(Path::new(&state.config.system.speech_dir))?;
    info!("deleted {deleted} speech files");

    Ok(Json(PurgeSpeechFilesResponse {
        message: "Speech files deleted successfully".to_string(),
        deleted,
    }))
}
