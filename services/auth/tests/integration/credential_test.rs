use uuid::Uuid;

use gatehouse_auth::error::AuthServiceError;
use gatehouse_auth::usecase::credential::{
    CREDENTIAL_TTL_SECS, issue_bearer, validate_bearer,
};

use crate::helpers::{TEST_ISSUER, TEST_JWT_SECRET};

#[tokio::test]
async fn should_issue_a_credential_that_validates() {
    let user_id = Uuid::new_v4();
    let token = issue_bearer(user_id, TEST_ISSUER, TEST_JWT_SECRET).unwrap();
    assert!(!token.is_empty());

    let claims = validate_bearer(&token, TEST_ISSUER, TEST_JWT_SECRET).unwrap();
    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.iss, TEST_ISSUER);
}

#[tokio::test]
async fn credential_lives_for_thirty_days() {
    let token = issue_bearer(Uuid::new_v4(), TEST_ISSUER, TEST_JWT_SECRET).unwrap();
    let claims = validate_bearer(&token, TEST_ISSUER, TEST_JWT_SECRET).unwrap();
    assert_eq!(claims.exp - claims.iat, CREDENTIAL_TTL_SECS as u64);
    assert_eq!(CREDENTIAL_TTL_SECS, 2_592_000);
}

#[tokio::test]
async fn should_reject_wrong_secret() {
    let token = issue_bearer(Uuid::new_v4(), TEST_ISSUER, TEST_JWT_SECRET).unwrap();
    let result = validate_bearer(&token, TEST_ISSUER, "some-other-secret");
    assert!(matches!(result, Err(AuthServiceError::InvalidToken)));
}

#[tokio::test]
async fn should_reject_wrong_issuer() {
    let token = issue_bearer(Uuid::new_v4(), TEST_ISSUER, TEST_JWT_SECRET).unwrap();
    let result = validate_bearer(&token, "someone-else", TEST_JWT_SECRET);
    assert!(matches!(result, Err(AuthServiceError::InvalidToken)));
}

#[tokio::test]
async fn should_reject_garbage() {
    let result = validate_bearer("not-a-jwt", TEST_ISSUER, TEST_JWT_SECRET);
    assert!(matches!(result, Err(AuthServiceError::InvalidToken)));
}
