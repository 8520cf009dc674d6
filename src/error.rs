use axum::{
    Json,
    response::{IntoResponse, Response},
};
use hyper::StatusCode;
use serde_json::json;

use crate::ledger::NormalizeError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unprocessable: {0}")]
    Unprocessable(String),
}

impl From<NormalizeError> for ApiError {
    fn from(err: NormalizeError) -> Self {
        if err.is_decode_failure() {
            return ApiError::BadRequest(err.to_string());
        }

        return ApiError::Unprocessable(err.to_string());
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        let (status_code, error_message) = match self {
            ApiError::UnexpectedError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "unexpected error".to_string(),
            ),
            ApiError::BadRequest(err) => (StatusCode::BAD_REQUEST, err),
            ApiError::Unprocessable(err) => (StatusCode::UNPROCESSABLE_ENTITY, err),
        };

        return (status_code, Json(json!({ "error": error_message }))).into_response();
    }
}
