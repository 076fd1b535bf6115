//! Error types for Gatehouse server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error codes exposed to API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchRecord = 4,
    TagNotAvailable = 5,
    TagInactive = 6,
    TagNotInUse = 7,
    VisitMismatch = 8,
    VisitNotOpen = 9,
    InvalidWindow = 10,
    InvalidTransition = 11,
    Duplicate = 12,
    BadValue = 13,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid time window: {0}")]
    InvalidWindow(String),

    #[error("Tag is deactivated: {0}")]
    TagInactive(String),

    #[error("Tag is not available: {0}")]
    TagNotAvailable(String),

    #[error("Tag is not in use: {0}")]
    TagNotInUse(String),

    #[error("Tag/visit mismatch: {0}")]
    VisitMismatch(String),

    #[error("Visit is not open: {0}")]
    VisitNotOpen(String),

    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::Authorization(msg) => {
                (StatusCode::FORBIDDEN, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchRecord, msg.clone())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::InvalidWindow(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidWindow, msg.clone())
            }
            AppError::TagInactive(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::TagInactive, msg.clone())
            }
            AppError::TagNotAvailable(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::TagNotAvailable, msg.clone())
            }
            AppError::TagNotInUse(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::TagNotInUse, msg.clone())
            }
            AppError::VisitMismatch(msg) => {
                (StatusCode::CONFLICT, ErrorCode::VisitMismatch, msg.clone())
            }
            AppError::VisitNotOpen(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::VisitNotOpen, msg.clone())
            }
            AppError::InvalidTransition(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::InvalidTransition, msg.clone())
            }
            AppError::Duplicate(msg) => {
                (StatusCode::CONFLICT, ErrorCode::Duplicate, msg.clone())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
