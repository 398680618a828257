use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Auth service domain error variants. The verifier's denial family
/// (`NoChallenge` / `InvalidToken` / `TokenExpired`) stays distinct here for
/// logs and tests but collapses to a single response shape at the HTTP
/// boundary so callers cannot probe which check failed.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("invalid email address")]
    InvalidEmail,
    #[error("token is required")]
    MissingToken,
    #[error("invalid user status")]
    InvalidStatus,
    #[error("invalid grant permission")]
    InvalidPermission,
    #[error("user must be suspended before deletion")]
    NotSuspended,
    #[error("user not found")]
    UserNotFound,
    #[error("grant not found")]
    GrantNotFound,
    #[error("authentication email requested too recently")]
    RateLimited { retry_after_secs: i64 },
    #[error("no outstanding challenge")]
    NoChallenge,
    #[error("token does not match the outstanding challenge")]
    InvalidToken,
    #[error("token has expired")]
    TokenExpired,
    #[error("token has already been used")]
    AlreadyUsed,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::MissingToken => "MISSING_TOKEN",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::InvalidPermission => "INVALID_PERMISSION",
            Self::NotSuspended => "NOT_SUSPENDED",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::GrantNotFound => "GRANT_NOT_FOUND",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::NoChallenge => "NO_CHALLENGE",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::AlreadyUsed => "TOKEN_ALREADY_USED",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidEmail
            | Self::MissingToken
            | Self::InvalidStatus
            | Self::InvalidPermission
            | Self::NotSuspended
            | Self::AlreadyUsed => StatusCode::BAD_REQUEST,
            Self::UserNotFound | Self::GrantNotFound => StatusCode::NOT_FOUND,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::NoChallenge | Self::InvalidToken | Self::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // tower-http TraceLayer already records method/uri/status for every
        // request; 4xx bodies carry what the client needs. Internal errors
        // log the anyhow chain so the root cause is traceable, and denials
        // log their internal kind before it is collapsed below.
        match &self {
            Self::Internal(e) => {
                tracing::error!(error = %e, kind = "INTERNAL", "internal error");
            }
            Self::NoChallenge | Self::InvalidToken | Self::TokenExpired => {
                tracing::debug!(kind = self.kind(), "verification denied");
            }
            _ => {}
        }
        let body = match &self {
            // One shape for the whole denial family: the caller must not
            // learn whether a challenge existed, mismatched, or expired.
            Self::NoChallenge | Self::InvalidToken | Self::TokenExpired => serde_json::json!({
                "kind": "UNAUTHORIZED",
                "message": "invalid or expired token",
            }),
            Self::RateLimited { retry_after_secs } => serde_json::json!({
                "kind": self.kind(),
                "message": self.to_string(),
                "retry_after_seconds": retry_after_secs,
            }),
            Self::Internal(_) => serde_json::json!({
                "kind": "INTERNAL",
                "message": "internal error",
            }),
            _ => serde_json::json!({
                "kind": self.kind(),
                "message": self.to_string(),
            }),
        };
        (status, axum::Json(body)).into_response()
    }
}
