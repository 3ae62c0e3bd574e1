//! Translation endpoint: forward text to the completion model and reshape
//! the reply into a typed translation payload

use axum::Json;
use axum::extract::State;

use crate::clients::CompletionRequest;
use crate::endpoints::field_or_sentinel;
use crate::error::EngineError;
use crate::extract::{self, OUTPUT_HEADER};
use crate::http::AppState;
use crate::prompts;
use crate::schemas::{TranslationRequest, TranslationResponse};
use crate::tokens;

pub async fn translate_text(
    State(state): State<AppState>,
    Json(req): Json<TranslationRequest>,
) -> Result<Json<TranslationResponse>, EngineError> {
    let instructions = state
        .prompts
        .render(
            prompts::TRANSLATION,
            &[("target_language", req.target_language.as_str())],
        )?;

    let model = state.config.system.translation_model.as_str();
    let output = state
        .language
        .complete(CompletionRequest {
            model,
            instructions: &instructions,
            input: &req.text,
            max_output_tokens: None,
            temperature: None,
        })
        .await?;

    let record = extract::extract_record(&output, OUTPUT_HEADER)?;
    let token_count = tokens::count_tokens(&req.text, model) + tokens::count_tokens(&output, model);

    Ok(Json(TranslationResponse {
        status: "success".to_string(),
        translation: field_or_sentinel(&record, "translation"),
        info: field_or_sentinel(&record, "info"),
        token_count,
    }))
}
