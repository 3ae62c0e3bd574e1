//! Tutor chat endpoint
//!
//! Conversation history travels in the request and comes back extended in
//! the response; nothing is persisted server-side.

use axum::Json;
use axum::extract::State;

use crate::error::EngineError;
use crate::http::AppState;
use crate::prompts;
use crate::schemas::{ChatTurn, ChatbotRequest, ChatbotResponse};
use crate::tokens;

pub async fn chatbot_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatbotRequest>,
) -> Result<Json<ChatbotResponse>, EngineError> {
    let system = state.prompts.render(prompts::CHATBOT_SYSTEM, &[])?;
    let model = state.config.system.chatbot_model.as_str();

    let mut turns = req.conversation_history.clone();
    turns.push(ChatTurn {
        role: "user".to_string(),
        content: req.message.clone(),
    });

    let reply = state.language.chat(model, &system, &turns).await?;

    let token_count =
        tokens::count_tokens(&req.message, model) + tokens::count_tokens(&reply, model);

    let mut conversation_history = turns;
    conversation_history.push(ChatTurn {
        role: "assistant".to_string(),
        content: reply.clone(),
    });

    Ok(Json(ChatbotResponse {
        status: "success".to_string(),
        response: reply,
        conversation_history,
        token_count,
    }))
}
