//! HTTP error mapping.
//!
//! Handlers return `Result<_, ApiError>`; this is the only place where error
//! kinds become status codes. Every error body has the shape
//! `{"detail": "<message>"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::routes::tasks::queries::RepositoryError;
use crate::routes::tasks::service::ServiceError;
use crate::store::StoreError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unavailable(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(self) -> String {
        match self {
            ApiError::NotFound(d)
            | ApiError::BadRequest(d)
            | ApiError::Unavailable(d)
            | ApiError::Internal(d) => d,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorBody { detail: self.detail() })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        tracing::error!("Store error: {}", error);
        match error {
            StoreError::Connection(_) => ApiError::Unavailable(error.to_string()),
            StoreError::Command(_) => ApiError::Internal(error.to_string()),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::NotFound => ApiError::NotFound(error.to_string()),
            ServiceError::Validation(message) => ApiError::BadRequest(message),
            ServiceError::Repository(RepositoryError::Store(e)) => e.into(),
            ServiceError::Repository(e) => {
                tracing::error!("Repository error: {}", e);
                ApiError::Internal(e.to_string())
            }
        }
    }
}
