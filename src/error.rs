use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Error surface of the HTTP API.
///
/// `Validation` carries the offending field so the response body can point at
/// it; everything internal collapses to an opaque 500.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        Self::Internal(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ field: [message] })),
            )
                .into_response(),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": message })),
            )
                .into_response(),
            ApiError::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": message })),
            )
                .into_response(),
            ApiError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("{what} not found") })),
            )
                .into_response(),
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn validation_renders_field_level_body() {
        let res = ApiError::validation("password", "too short").into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = body_json(res).await;
        assert_eq!(body["password"][0], "too short");
    }

    #[tokio::test]
    async fn status_code_mapping() {
        let cases = [
            (
                ApiError::BadRequest("bad".into()).into_response().status(),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Unauthorized("no token".into())
                    .into_response()
                    .status(),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::NotFound("recipe").into_response().status(),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::Internal(anyhow::anyhow!("boom"))
                    .into_response()
                    .status(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (got, want) in cases {
            assert_eq!(got, want);
        }
    }

    #[tokio::test]
    async fn internal_error_body_is_opaque() {
        let res = ApiError::Internal(anyhow::anyhow!("connection refused to 10.0.0.3"))
            .into_response();
        let body = body_json(res).await;
        assert_eq!(body["error"], "internal server error");
    }
}
