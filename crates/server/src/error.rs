use std::any::Any;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use review_store::{ErrorKind, StoreError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Resource not found")]
    NotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected JSON payload");
        ApiError::BadRequest("invalid JSON payload".to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected query string");
        ApiError::BadRequest("invalid query string".to_string())
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Store(err) => {
                let (code, message) = match err {
                    StoreError::TeamExists => ("TEAM_EXISTS", "team_name already exists"),
                    StoreError::PullRequestExists => ("PR_EXISTS", "pull request id already exists"),
                    StoreError::PullRequestMerged => ("PR_MERGED", "cannot reassign on merged PR"),
                    StoreError::ReviewerNotAssigned => {
                        ("NOT_ASSIGNED", "reviewer is not assigned to this PR")
                    }
                    StoreError::NoReplacementCandidate => {
                        ("NO_CANDIDATE", "no active replacement candidate in team")
                    }
                    StoreError::TeamNotFound
                    | StoreError::UserNotFound
                    | StoreError::PullRequestNotFound => ("NOT_FOUND", "resource not found"),
                };
                // Duplicate team names keep their historical 400.
                let status = match err.kind() {
                    ErrorKind::NotFound => StatusCode::NOT_FOUND,
                    ErrorKind::Conflict if *err == StoreError::TeamExists => {
                        StatusCode::BAD_REQUEST
                    }
                    ErrorKind::Conflict => StatusCode::CONFLICT,
                };
                (status, code, message.to_string())
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::NotFound => not_found(),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "METHOD_NOT_ALLOWED",
                "method not allowed".to_string(),
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                msg.clone(),
            ),
        }
    }
}

fn not_found() -> (StatusCode, &'static str, String) {
    (
        StatusCode::NOT_FOUND,
        "NOT_FOUND",
        "resource not found".to_string(),
    )
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, code, message) = self.parts();

        if status_code.is_server_error() {
            tracing::error!(
                status = %status_code,
                code,
                error = %self,
                "API request failed"
            );
        } else {
            tracing::debug!(status = %status_code, code, error = %self, "API request rejected");
        }

        let body = ErrorResponse {
            error: ErrorDetail { code, message },
        };
        (status_code, Json(body)).into_response()
    }
}

/// Converts a handler panic into the standard `INTERNAL` error body.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!(panic = %detail, "Request handler panicked");
    ApiError::Internal("internal server error".to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn error_code(err: ApiError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let code = json
            .pointer("/error/code")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        (status, code)
    }

    #[tokio::test]
    async fn store_errors_map_to_expected_statuses_and_codes() {
        let cases = [
            (StoreError::TeamExists, StatusCode::BAD_REQUEST, "TEAM_EXISTS"),
            (StoreError::TeamNotFound, StatusCode::NOT_FOUND, "NOT_FOUND"),
            (StoreError::UserNotFound, StatusCode::NOT_FOUND, "NOT_FOUND"),
            (StoreError::PullRequestExists, StatusCode::CONFLICT, "PR_EXISTS"),
            (
                StoreError::PullRequestNotFound,
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
            ),
            (StoreError::PullRequestMerged, StatusCode::CONFLICT, "PR_MERGED"),
            (
                StoreError::ReviewerNotAssigned,
                StatusCode::CONFLICT,
                "NOT_ASSIGNED",
            ),
            (
                StoreError::NoReplacementCandidate,
                StatusCode::CONFLICT,
                "NO_CANDIDATE",
            ),
        ];

        for (err, status, code) in cases {
            assert_eq!(
                error_code(ApiError::from(err)).await,
                (status, code.to_string())
            );
        }
    }

    #[tokio::test]
    async fn handler_panic_renders_internal_error() {
        let response = panic_response(Box::new("store invariant broken"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "INTERNAL");
        assert_eq!(json["error"]["message"], "internal server error");
    }

    #[tokio::test]
    async fn transport_errors_map_to_expected_statuses() {
        assert_eq!(
            error_code(ApiError::BadRequest("bad".to_string())).await,
            (StatusCode::BAD_REQUEST, "BAD_REQUEST".to_string())
        );
        assert_eq!(
            error_code(ApiError::NotFound).await,
            (StatusCode::NOT_FOUND, "NOT_FOUND".to_string())
        );
        assert_eq!(
            error_code(ApiError::MethodNotAllowed).await,
            (
                StatusCode::METHOD_NOT_ALLOWED,
                "METHOD_NOT_ALLOWED".to_string()
            )
        );
        assert_eq!(
            error_code(ApiError::Internal("boom".to_string())).await,
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL".to_string())
        );
    }
}
