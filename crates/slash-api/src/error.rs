use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use slash_db::StoreError;
use thiserror::Error;
use tracing::error;

/// Error kinds a client can observe. Each maps to one HTTP status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    NotFound(String),

    #[error("permission denied")]
    PermissionDenied,

    #[error("{0}")]
    AlreadyExists(String),

    #[error("unauthenticated")]
    Unauthenticated,

    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Classifies a store failure. `context` names the step that failed and
    /// ends up in the server log for internal errors.
    pub fn from_store(context: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => {
                ApiError::AlreadyExists(format!("{}: already exists", context))
            }
            StoreError::NotFound => ApiError::NotFound(format!("{}: not found", context)),
            other => ApiError::Internal(anyhow::Error::new(other).context(context)),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PermissionDenied => StatusCode::FORBIDDEN,
            ApiError::AlreadyExists(_) => StatusCode::CONFLICT,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Malformed or unexpected request bodies surface as `InvalidArgument`, so
/// clients always get the JSON error shape.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidArgument(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Internal(e) => {
                error!("Internal error: {:#}", e);
                "internal error".to_string()
            }
            other => other.to_string(),
        };

        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}
