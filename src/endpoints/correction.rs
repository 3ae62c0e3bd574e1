//! Writing correction endpoint: score a writing sample against the marking
//! criteria and return feedback

use axum::Json;
use axum::extract::State;
use serde_json::Value;

use crate::clients::CompletionRequest;
use crate::error::EngineError;
use crate::extract;
use crate::http::AppState;
use crate::prompts;
use crate::schemas::{CorrectionRequest, CorrectionResponse};
use crate::tokens;

/// Header the correction prompt is instructed to label its output with.
const SCORE_HEADER: &str = "score:";

pub async fn correct_writing(
    State(state): State<AppState>,
    Json(req): Json<CorrectionRequest>,
) -> Result<Json<CorrectionResponse>, EngineError> {
    let instructions = state
        .prompts
        .render(prompts::CORRECTION, &[("question", req.question.as_str())])?;

    let model = state.config.system.correction_model.as_str();
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

    let record = extract::extract_record(&output, SCORE_HEADER)?;

    // The model sometimes quotes the score; coerce numeric strings and fall
    // back to zero for anything else
    let score = match record.get("score") {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    };
    let feedback = match record.get("feedback") {
        Some(Value::String(s)) => s.clone(),
        _ => "No feedback available".to_string(),
    };

    let token_count = tokens::count_tokens(&req.text, model) + tokens::count_tokens(&output, model);

    Ok(Json(CorrectionResponse {
        status: "success".to_string(),
        score,
        feedback,
        token_count,
    }))
}
