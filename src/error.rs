use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

/// Everything a request handler can fail with. Validation and auth are
/// caller-correctable and carry their own status codes; the rest collapse
/// to a logged 500.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation failed on {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("unauthenticated")]
    Auth,

    /// Broadcast delivery failure. Never rolls back a persisted message;
    /// surfaced in logs only.
    #[error("broadcast delivery failed: {0}")]
    Transport(String),

    #[error(transparent)]
    Db(#[from] sqlx::Error),

    #[error(transparent)]
    Session(#[from] tower_sessions::session::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation { field, message } => {
                let body = json!({
                    "message": message.clone(),
                    "errors": { field: [message] },
                });
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
            AppError::Auth => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Unauthenticated." })),
            )
                .into_response(),
            err => {
                tracing::error!("request failed: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Server Error" })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_422() {
        let response = AppError::Validation {
            field: "content",
            message: "The content field is required.".to_owned(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn auth_maps_to_401() {
        let response = AppError::Auth.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn transport_maps_to_500() {
        let response = AppError::Transport("channel closed".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
