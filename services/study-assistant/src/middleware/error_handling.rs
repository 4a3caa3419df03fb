use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use buddy_utils::{log_error, BuddyError, ErrorResponse};

/// Handler error rendered as an [`ErrorResponse`] body.
#[derive(Debug)]
pub struct ApiError(pub BuddyError);

impl From<BuddyError> for ApiError {
    fn from(error: BuddyError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            log_error!(self.0, "Request failed", code = self.0.error_code());
        } else {
            tracing::debug!(error = %self.0, "Request rejected");
        }
        (status, Json(ErrorResponse::from(self.0))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_follows_error_kind() {
        let response = ApiError(BuddyError::not_found("note note_x")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError(BuddyError::completion("model offline")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = ApiError(BuddyError::validation("title", "empty")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
