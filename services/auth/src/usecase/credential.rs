use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::error::AuthServiceError;

/// Bearer credential lifetime: 30 days.
pub const CREDENTIAL_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Claims asserted by a bearer credential. Nothing is persisted server-side;
/// a credential stays valid for its whole lifetime once issued.
#[derive(Debug, Serialize, Deserialize)]
pub struct BearerClaims {
    pub sub: String,
    pub iss: String,
    pub iat: u64,
    pub exp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

pub fn issue_bearer(
    user_id: Uuid,
    issuer: &str,
    secret: &str,
) -> Result<String, AuthServiceError> {
    let iat = now_secs();
    let claims = BearerClaims {
        sub: user_id.to_string(),
        iss: issuer.to_owned(),
        iat,
        exp: iat + CREDENTIAL_TTL_SECS as u64,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthServiceError::Internal(e.into()))
}

/// Stateless check: signature, expiry, and issuer.
pub fn validate_bearer(
    token: &str,
    issuer: &str,
    secret: &str,
) -> Result<BearerClaims, AuthServiceError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.set_issuer(&[issuer]);
    validation.set_required_spec_claims(&["exp", "sub", "iss"]);

    let data = decode::<BearerClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AuthServiceError::InvalidToken)?;

    Ok(data.claims)
}
