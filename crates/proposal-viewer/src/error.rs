use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use slide_deck::DeckError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Deck(#[from] DeckError),

    #[error("config error: {0}")]
    Config(String),

    #[error("content source error: {0}")]
    Source(String),

    #[error("proposal not found: {0}")]
    NotFound(String),

    #[error("page {index} not found in proposal {key}")]
    PageNotFound { key: String, index: usize },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            Self::PageNotFound { .. } => (StatusCode::NOT_FOUND, "PageNotFound"),
            Self::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "InvalidRequest"),
            Self::Deck(_) | Self::Config(_) | Self::Source(_) => {
                tracing::error!(error = %self, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "InternalError")
            }
        };

        let message = match status {
            StatusCode::INTERNAL_SERVER_ERROR => "an internal error occurred".to_string(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
