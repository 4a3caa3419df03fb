//! Upload Handler
//!
//! Multipart upload of study materials. Every file part is extracted and the
//! vector index is rebuilt from the result; a `note_id` text part tags all
//! chunks with that note.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
};
use buddy_models::IngestReport;
use buddy_utils::{validate_file_size, validate_file_type, BuddyError, SUPPORTED_UPLOAD_TYPES};
use tracing::info;

use crate::assistant::UploadedFile;
use crate::middleware::ApiResult;
use crate::AppState;

const NOTE_ID_FIELD: &str = "note_id";

/// POST /api/v1/upload
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<IngestReport>)> {
    let mut files = Vec::new();
    let mut note_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| BuddyError::validation("upload", format!("Failed to read upload: {}", e)))?
    {
        if field.name() == Some(NOTE_ID_FIELD) {
            let value = field
                .text()
                .await
                .map_err(|e| BuddyError::validation(NOTE_ID_FIELD, e.to_string()))?;
            note_id = Some(value.trim().to_string()).filter(|id| !id.is_empty());
            continue;
        }

        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        validate_file_type(&name, SUPPORTED_UPLOAD_TYPES)?;

        let data = field
            .bytes()
            .await
            .map_err(|e| BuddyError::validation("upload", format!("Failed to read file data: {}", e)))?;
        validate_file_size(data.len() as u64, state.config.server.max_request_size as u64)?;

        files.push(UploadedFile { name, data: data.to_vec() });
    }

    if files.is_empty() {
        return Err(BuddyError::validation("files", "No file provided").into());
    }

    info!(files = files.len(), note_id = ?note_id, "Processing upload");
    let report = state.assistant.ingest(files, note_id).await?;
    let status = if report.ok { StatusCode::OK } else { StatusCode::BAD_REQUEST };
    Ok((status, Json(report)))
}
