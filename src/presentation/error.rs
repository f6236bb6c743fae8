//! Maps failures of the login flow onto JSON error responses.
//!
//! Clients only ever learn three things: which fields were invalid, that the
//! credentials were rejected, or that something went wrong on our side.

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{error::DomainError, validation::FieldError};

#[derive(Debug, Serialize)]
struct MessageBody {
    message: &'static str,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request validation failed")]
    Validation(Vec<FieldError>),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("internal error: {0}")]
    Internal(DomainError),
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::AuthenticationFailed => Self::InvalidCredentials,
            other => Self::Internal(other),
        }
    }
}

impl From<Vec<FieldError>> for ApiError {
    fn from(errors: Vec<FieldError>) -> Self {
        Self::Validation(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                tracing::debug!(fields = errors.len(), "rejecting invalid login request");
                let body: BTreeMap<&str, &str> = errors
                    .iter()
                    .map(|error| (error.field, error.message))
                    .collect();
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(MessageBody {
                    message: "Invalid credentials",
                }),
            )
                .into_response(),
            ApiError::Internal(error) => {
                tracing::error!(error = %error, "login failed with an internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(MessageBody {
                        message: "Internal server error",
                    }),
                )
                    .into_response()
            }
        }
    }
}
