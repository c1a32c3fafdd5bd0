//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from levy-policy and levy-catalog to HTTP status
//! codes and JSON error bodies with a machine-readable code. Never exposes
//! internal error details in responses.
//!
//! Validation failures map to 400 (the platform treats a malformed body
//! and an out-of-range field the same way at the HTTP layer). Invariant
//! violations map to 500 with their own code: they indicate corrupted
//! policy data that requires operator intervention and must not be
//! retried automatically.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use levy_catalog::CatalogError;
use levy_policy::PolicyError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses use this format for consistency across the API
/// surface.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "CONFLICT").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// A field failed domain validation (400).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Authentication failure — missing or invalid token (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authorization failure — insufficient role or wrong store (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Conflict with current resource state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Stored policy data violates an invariant (500). Logged and surfaced
    /// with its own code so operators can distinguish data corruption from
    /// ordinary server faults.
    #[error("invariant violation: {0}")]
    Invariant(String),

    /// Internal server error (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Invariant(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INVARIANT_VIOLATION"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal details to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::Invariant(_) => "Stored tax policy data is inconsistent".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => {
                tracing::error!(error = %self, "internal server error");
            }
            Self::Invariant(_) => {
                tracing::error!(error = %self, "policy data invariant violation");
            }
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Convert catalog errors to API errors.
impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match &err {
            CatalogError::CountryNotFound(_) | CatalogError::StateNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            CatalogError::DuplicateStateCode { .. } => Self::Conflict(err.to_string()),
        }
    }
}

/// Convert policy errors to API errors.
impl From<PolicyError> for AppError {
    fn from(err: PolicyError) -> Self {
        match &err {
            PolicyError::Validation(_) | PolicyError::FederalMethodForbidden => {
                Self::Validation(err.to_string())
            }
            PolicyError::DuplicateOverride { .. } => Self::Conflict(err.to_string()),
            PolicyError::OverrideNotFound(_) => Self::NotFound(err.to_string()),
            PolicyError::Catalog(inner) => Self::from(inner.clone()),
            PolicyError::InvariantViolation(_) => Self::Invariant(err.to_string()),
        }
    }
}

/// Convert core validation errors to API errors.
impl From<levy_core::ValidationError> for AppError {
    fn from(err: levy_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}
