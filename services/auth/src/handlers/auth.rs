use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::domain::types::validate_email;
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::challenge::{IssueChallengeInput, IssueChallengeUseCase};
use crate::usecase::verify::{VerifyChallengeInput, VerifyChallengeUseCase};

// ── POST /api/auth/email ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct EmailAuthRequest {
    /// Optional so an absent field reports as an invalid email (400) rather
    /// than a deserialization rejection.
    pub email: Option<String>,
    pub redirect: Option<String>,
}

#[derive(Serialize)]
pub struct EmailAuthResponse {
    pub email: String,
    pub message: &'static str,
}

pub async fn request_challenge(
    State(state): State<AppState>,
    Json(body): Json<EmailAuthRequest>,
) -> Result<Json<EmailAuthResponse>, AuthServiceError> {
    let email = body.email.unwrap_or_default().trim().to_owned();
    if !validate_email(&email) {
        return Err(AuthServiceError::InvalidEmail);
    }
    let redirect = body
        .redirect
        .map(|r| r.trim().to_owned())
        .filter(|r| !r.is_empty());

    let usecase = IssueChallengeUseCase {
        users: state.user_directory(),
        challenges: state.challenge_store(),
        mail: state.mailer(),
        debounce_secs: state.config.challenge_debounce_secs,
        base_url: state.config.public_base_url.clone(),
        verify_path: state.config.verify_path.clone(),
    };
    let out = usecase.execute(IssueChallengeInput { email, redirect }).await?;

    Ok(Json(EmailAuthResponse {
        email: out.email,
        message: "authentication email sent",
    }))
}

// ── GET /api/auth/email/verify ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyQuery {
    pub token: Option<String>,
    pub email: Option<String>,
}

#[derive(Serialize)]
pub struct VerifiedUser {
    pub id: String,
    pub email: String,
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub message: &'static str,
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: VerifiedUser,
}

pub async fn verify_challenge(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> Result<Json<VerifyResponse>, AuthServiceError> {
    let token = query
        .token
        .filter(|t| !t.is_empty())
        .ok_or(AuthServiceError::MissingToken)?;
    let email = query
        .email
        .map(|e| e.trim().to_owned())
        .filter(|e| validate_email(e))
        .ok_or(AuthServiceError::InvalidEmail)?;

    let usecase = VerifyChallengeUseCase {
        users: state.user_directory(),
        challenges: state.challenge_store(),
        expiry_secs: state.config.challenge_expiry_secs,
        jwt_secret: state.config.jwt_secret.clone(),
        jwt_issuer: state.config.jwt_issuer.clone(),
    };
    let out = usecase.execute(VerifyChallengeInput { email, token }).await?;

    Ok(Json(VerifyResponse {
        message: "email verification successful",
        access_token: out.access_token,
        token_type: "Bearer",
        expires_in: out.expires_in,
        user: VerifiedUser {
            id: out.user.id.to_string(),
            email: out.user.email,
            status: out.user.status.as_str(),
        },
    }))
}
