use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::backend::StoreError;
use crate::datamodel::{BlogId, InvalidBlog};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidBody(String),
    #[error(transparent)]
    Validation(#[from] InvalidBlog),
    #[error("malformatted id: {0}")]
    MalformedId(String),
    #[error("no blog with id {0}")]
    NotFound(BlogId),
    #[error("unknown endpoint")]
    UnknownEndpoint,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_)
            | JsonRejection::JsonSyntaxError(_)
            | JsonRejection::MissingJsonContentType(_) => {
                ApiError::InvalidBody(rejection.body_text())
            }
            // the body could not be read at all, e.g. it exceeds the size limit
            _ => ApiError::Rejected {
                status: rejection.status(),
                message: rejection.body_text(),
            },
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            ApiError::InvalidBody(_) | ApiError::Validation(_) => {
                (StatusCode::BAD_REQUEST, "validation_error")
            }
            ApiError::MalformedId(_) => (StatusCode::BAD_REQUEST, "malformed_id"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::UnknownEndpoint => (StatusCode::NOT_FOUND, "unknown_endpoint"),
            ApiError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed"),
            ApiError::Rejected { status, .. } => (*status, "invalid_request"),
            ApiError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let message = match self {
            ApiError::Store(err) => {
                error!(error = %err, "blog store operation failed");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { error, message })).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::InvalidBody("bad".into()), StatusCode::BAD_REQUEST),
            (
                ApiError::Validation(InvalidBlog { field: "title" }),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::MalformedId("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::NotFound(BlogId::new()), StatusCode::NOT_FOUND),
            (ApiError::UnknownEndpoint, StatusCode::NOT_FOUND),
            (ApiError::MethodNotAllowed, StatusCode::METHOD_NOT_ALLOWED),
            (
                ApiError::Rejected {
                    status: StatusCode::PAYLOAD_TOO_LARGE,
                    message: "Failed to buffer the request body".into(),
                },
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (
                ApiError::Store(StoreError::Closed),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
