//! HTTP error responses
//!
//! Every error body has the same shape:
//! `{"timestamp": ..., "status": 404, "error": "Not Found", "message": ..., "path": ...}`

use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use chrono::SecondsFormat;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::params::BoundingBoxError;

const INTERNAL_MESSAGE: &str = "An unexpected error occurred";

#[derive(Debug, Error)]
pub enum ApiError {
    /// 404
    #[error("{0}")]
    NotFound(String),

    /// 400
    #[error("{0}")]
    BadRequest(String),

    /// 500; the detail is logged, never returned
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Attach the request path for the response body
    pub fn at(self, uri: &Uri) -> ErrorResponse {
        ErrorResponse {
            error: self,
            path: uri.path().to_string(),
        }
    }
}

impl From<em_common::Error> for ApiError {
    fn from(err: em_common::Error) -> Self {
        match err {
            em_common::Error::NotFound(msg) => ApiError::NotFound(msg),
            em_common::Error::InvalidParameter(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<BoundingBoxError> for ApiError {
    fn from(err: BoundingBoxError) -> Self {
        ApiError::BadRequest(format!("Invalid bbox: {}", err))
    }
}

/// An [`ApiError`] bound to the path that produced it
#[derive(Debug)]
pub struct ErrorResponse {
    error: ApiError,
    path: String,
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = self.error.status();
        let message = match self.error {
            ApiError::Internal(detail) => {
                error!("Internal error on {}: {}", self.path, detail);
                INTERNAL_MESSAGE.to_string()
            }
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) => msg,
        };

        let body = Json(json!({
            "timestamp": em_common::time::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "status": status.as_u16(),
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": message,
            "path": self.path,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(em_common::Error::NotFound("x".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(em_common::Error::InvalidParameter("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(em_common::Error::Internal("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(BoundingBoxError::LatitudeOrder).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_detail_not_exposed() {
        let uri: Uri = "/api/v1/events/7".parse().unwrap();
        let response = ApiError::Internal("disk I/O error".into()).at(&uri).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
