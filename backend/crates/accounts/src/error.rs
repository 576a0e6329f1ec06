//! Accounts Error Types
//!
//! This module provides account-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::application::token::TokenError;

/// Account-specific result type alias
pub type AccountResult<T> = Result<T, AccountError>;

/// Account-specific error variants
#[derive(Debug, Error)]
pub enum AccountError {
    /// Account not found
    #[error("Account not found")]
    AccountNotFound,

    /// Email already registered
    #[error("Email already registered")]
    EmailTaken,

    /// Invalid credentials (unknown email or wrong password, deliberately
    /// indistinguishable)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Account is deactivated
    #[error("Account is disabled")]
    AccountDisabled,

    /// Token failed signature or structural checks
    #[error("Invalid session token")]
    TokenInvalid,

    /// Token expired
    #[error("Session token has expired")]
    TokenExpired,

    /// Input validation error
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Rate limit exceeded
    #[error("Too many requests")]
    RateLimited { retry_after_secs: u64 },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccountError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::AccountNotFound => ErrorKind::NotFound,
            AccountError::EmailTaken => ErrorKind::Conflict,
            AccountError::InvalidCredentials
            | AccountError::TokenInvalid
            | AccountError::TokenExpired => ErrorKind::Unauthorized,
            AccountError::AccountDisabled => ErrorKind::Forbidden,
            AccountError::Validation(_) => ErrorKind::BadRequest,
            AccountError::RateLimited { .. } => ErrorKind::TooManyRequests,
            AccountError::Database(_) | AccountError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    ///
    /// Server-side errors are collapsed into a generic message so that
    /// storage details never reach the client.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AccountError::Database(_) | AccountError::Internal(_) => {
                AppError::new(self.kind(), "An unexpected error occurred")
            }
            AccountError::RateLimited { .. } => {
                AppError::new(self.kind(), "Too many requests")
                    .with_action("Please wait before retrying")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AccountError::Database(e) => {
                tracing::error!(error = %e, "Accounts database error");
            }
            AccountError::Internal(msg) => {
                tracing::error!(message = %msg, "Accounts internal error");
            }
            AccountError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AccountError::RateLimited { retry_after_secs } => {
                tracing::warn!(retry_after_secs, "Request rate limited");
            }
            _ => {
                tracing::debug!(error = %self, "Accounts error");
            }
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        self.log();

        let mut response = self.to_app_error().into_response();

        if let AccountError::RateLimited { retry_after_secs } = &self {
            if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}

impl From<TokenError> for AccountError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AccountError::TokenExpired,
            TokenError::Malformed | TokenError::InvalidSignature => AccountError::TokenInvalid,
        }
    }
}
