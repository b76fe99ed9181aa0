//! API error type mapped to HTTP status codes.
//!
//! Every variant renders as a JSON body `{"error": "message"}`.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::error::RecommenderError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Title or id is not in the catalog (404).
    #[error("{0}")]
    NotFound(String),
    /// Request is missing what the endpoint needs (400).
    #[error("{0}")]
    BadRequest(String),
    /// Loading or rebuilding failed (500).
    #[error("{0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

impl From<RecommenderError> for ApiError {
    fn from(err: RecommenderError) -> Self {
        match err {
            RecommenderError::NotFound(_) => ApiError::NotFound(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_not_found_to_404() {
        let err: ApiError = RecommenderError::NotFound("title 'x'".into()).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "not found in catalog: title 'x'");
    }

    #[test]
    fn maps_load_errors_to_500() {
        let err: ApiError = RecommenderError::data_format(Some(2), "empty title").into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
