use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::{handlers::*, AppState};

pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload))
        .route("/chat", post(chat))
        .route("/summary", post(summary))
        .route("/flashcards", post(flashcards))
        .route("/quiz", post(quiz))
        .route("/mindmap", post(mindmap))
        .route("/notes", get(list_notes).post(create_note))
        .route("/notes/:id", patch(rename_note))
        .route("/notes/:id/chats", get(note_chats))
}
