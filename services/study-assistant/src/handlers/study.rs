//! Chat, summary and structured study-material handlers.

use axum::{extract::State, response::Json};
use buddy_models::{AskRequest, ChatTurn, FlashcardDeck, GenerateRequest, MindMap, QuizSet};
use buddy_utils::validate_model;
use serde::Serialize;

use crate::middleware::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

/// POST /api/v1/chat
///
/// With a note id the exchange is appended to that note's history.
pub async fn chat(State(state): State<AppState>, Json(request): Json<AskRequest>) -> ApiResult<Json<AnswerResponse>> {
    validate_model(&request)?;
    let answer = state.assistant.ask(&request.question, request.note_id.as_deref()).await?;

    if let Some(note_id) = request.note_id.as_deref() {
        state
            .notes
            .append_chat(note_id, ChatTurn::now(&request.question, &answer))
            .await
            .map_err(|e| buddy_utils::BuddyError::storage(format!("{:#}", e)))?;
    }
    Ok(Json(AnswerResponse { answer }))
}

/// POST /api/v1/summary
pub async fn summary(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> ApiResult<Json<SummaryResponse>> {
    validate_model(&request)?;
    let summary = state.assistant.summarize(&request).await?;
    Ok(Json(SummaryResponse { summary }))
}

/// POST /api/v1/flashcards
pub async fn flashcards(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> ApiResult<Json<FlashcardDeck>> {
    validate_model(&request)?;
    Ok(Json(state.assistant.flashcards(&request).await?))
}

/// POST /api/v1/quiz
pub async fn quiz(State(state): State<AppState>, Json(request): Json<GenerateRequest>) -> ApiResult<Json<QuizSet>> {
    validate_model(&request)?;
    Ok(Json(state.assistant.quiz(&request).await?))
}

/// POST /api/v1/mindmap
pub async fn mindmap(State(state): State<AppState>, Json(request): Json<GenerateRequest>) -> ApiResult<Json<MindMap>> {
    validate_model(&request)?;
    Ok(Json(state.assistant.mindmap(&request).await?))
}
