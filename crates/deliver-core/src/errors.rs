//! Application error type for the Deliver API.
//!
//! Every failure the session core can produce is an [`AppError`] carrying
//! an [`ErrorKind`] plus a human-readable message. The kind decides both
//! the machine-readable wire code (e.g. `TOKEN_INVALID`) and the HTTP
//! status the error maps to. Errors propagate through `Result` and `?`;
//! nothing in the core retries internally.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Classification of application failures.
///
/// The token/session kinds are deliberately coarse on the refresh path:
/// a refresh credential that is malformed, expired, or simply not found
/// in the session store all surface as [`ErrorKind::InvalidToken`] so
/// callers cannot probe which sessions exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Login failed: unknown email or wrong password (never distinguished).
    BadCredentials,
    /// Malformed, wrong-type, wrong-issuer, tampered, or store-rejected token.
    InvalidToken,
    /// Access token past its `exp` claim.
    TokenExpired,
    /// Access token carries a `ver` older than the user's current version.
    TokenVersionOutdated,
    /// Access token's sid is on the revocation blacklist.
    SessionRevoked,
    /// Rotation source row missing or already consumed.
    SessionNotFound,
    /// Refresh presented for a user that no longer exists.
    UserNotFound,
    /// No credential presented where one is required.
    Unauthorized,
    /// Request body failed validation.
    Validation,
    /// Storage or other infrastructure failure.
    Internal,
}

impl ErrorKind {
    /// Wire code included in the error envelope.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::BadCredentials => "BAD_CREDENTIALS",
            ErrorKind::InvalidToken => "TOKEN_INVALID",
            ErrorKind::TokenExpired => "TOKEN_EXPIRED",
            ErrorKind::TokenVersionOutdated => "TOKEN_VERSION_OUTDATED",
            ErrorKind::SessionRevoked => "SESSION_REVOKED",
            ErrorKind::SessionNotFound => "SESSION_NOT_FOUND",
            ErrorKind::UserNotFound => "USER_NOT_FOUND",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }

    /// HTTP status the kind maps to.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::BadCredentials
            | ErrorKind::InvalidToken
            | ErrorKind::TokenExpired
            | ErrorKind::TokenVersionOutdated
            | ErrorKind::SessionRevoked
            | ErrorKind::SessionNotFound
            | ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::UserNotFound => StatusCode::NOT_FOUND,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Tagged application error: a kind plus a message safe to return to clients.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn bad_credentials(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadCredentials, message)
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidToken, message)
    }

    pub fn token_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenExpired, message)
    }

    pub fn token_version_outdated(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenVersionOutdated, message)
    }

    pub fn session_revoked(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SessionRevoked, message)
    }

    pub fn session_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SessionNotFound, message)
    }

    pub fn user_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UserNotFound, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::new(ErrorKind::Internal, err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.kind.status();
        let body = Json(json!({
            "code": self.kind.code(),
            "status": status.as_u16(),
            "message": self.message,
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::internal(err)
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::internal(err)
    }
}
