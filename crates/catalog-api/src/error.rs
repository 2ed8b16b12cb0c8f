use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use catalog_search::FilterErrors;
use catalog_storage::{ErrorCategory, StorageError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `{"detail": "..."}` body used for every non-validation error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub detail: String,
}

/// High-level API errors to be mapped to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    /// Filter parameters failed validation; rendered as the per-field map.
    #[error(transparent)]
    InvalidFilters(#[from] FilterErrors),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::InvalidFilters(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The human-readable part of the body, without the variant prefix.
    pub fn detail(&self) -> String {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Internal(msg) => msg.clone(),
            ApiError::InvalidFilters(errors) => errors.to_string(),
        }
    }

    fn body(&self) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            ApiError::InvalidFilters(errors) => serde_json::to_vec(errors),
            other => serde_json::to_vec(&ErrorBody {
                detail: other.detail(),
            }),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err.category() {
            ErrorCategory::Conflict => ApiError::Conflict(err.to_string()),
            ErrorCategory::Validation => ApiError::BadRequest(err.to_string()),
            ErrorCategory::Fixture | ErrorCategory::Internal => {
                tracing::error!(error = %err, category = %err.category(), "storage failure");
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = self
            .body()
            .unwrap_or_else(|_| br#"{"detail":"Serialization failure"}"#.to_vec());

        let mut response = (status, body).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn into_response_sets_status_and_content_type() {
        let resp = ApiError::bad_request("Invalid parameter").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let content_type = resp.headers().get(header::CONTENT_TYPE).unwrap();
        assert_eq!(content_type, &HeaderValue::from_static("application/json"));
    }

    #[tokio::test]
    async fn detail_body_shape() {
        let resp = ApiError::not_found("No Book matches the given query.").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp).await;
        assert_eq!(json["detail"], "No Book matches the given query.");
    }

    #[tokio::test]
    async fn filter_errors_render_per_field() {
        let mut errors = FilterErrors::new();
        errors.add("min_price", "Enter a number.");
        let resp = ApiError::from(errors).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json, serde_json::json!({"min_price": ["Enter a number."]}));
    }

    #[test]
    fn storage_errors_map_to_status() {
        let cases: Vec<(StorageError, StatusCode)> = vec![
            (StorageError::already_exists("Book", 1), StatusCode::CONFLICT),
            (
                StorageError::invalid_record("Book", "bad"),
                StatusCode::BAD_REQUEST,
            ),
            (StorageError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }
}
