use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use buddy_models::{ChatTurn, NoteSummary, NoteTitleRequest};
use buddy_utils::{validate_model, BuddyError};
use serde::Serialize;

use crate::middleware::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct NoteListResponse {
    pub notes: Vec<NoteSummary>,
}

#[derive(Debug, Serialize)]
pub struct ChatHistoryResponse {
    pub chats: Vec<ChatTurn>,
}

fn storage_error(error: anyhow::Error) -> BuddyError {
    BuddyError::storage(format!("{:#}", error))
}

/// GET /api/v1/notes
pub async fn list_notes(State(state): State<AppState>) -> Json<NoteListResponse> {
    Json(NoteListResponse {
        notes: state.notes.list_notes().await,
    })
}

/// POST /api/v1/notes
pub async fn create_note(
    State(state): State<AppState>,
    Json(request): Json<NoteTitleRequest>,
) -> ApiResult<(StatusCode, Json<NoteSummary>)> {
    validate_model(&request)?;
    let note = state.notes.create_note(request.title.trim()).await.map_err(storage_error)?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// PATCH /api/v1/notes/:id
pub async fn rename_note(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
    Json(request): Json<NoteTitleRequest>,
) -> ApiResult<Json<NoteSummary>> {
    validate_model(&request)?;
    let note = state
        .notes
        .rename_note(&note_id, request.title.trim())
        .await
        .map_err(storage_error)?
        .ok_or_else(|| BuddyError::not_found(format!("note {}", note_id)))?;
    Ok(Json(note))
}

/// GET /api/v1/notes/:id/chats
pub async fn note_chats(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
) -> ApiResult<Json<ChatHistoryResponse>> {
    let chats = state
        .notes
        .chats(&note_id)
        .await
        .ok_or_else(|| BuddyError::not_found(format!("note {}", note_id)))?;
    Ok(Json(ChatHistoryResponse { chats }))
}
