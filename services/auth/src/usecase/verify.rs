use chrono::Utc;

use crate::domain::repository::{ChallengeStore, UserDirectory};
use crate::domain::types::DirectoryUser;
use crate::error::AuthServiceError;
use crate::usecase::challenge::hash_secret;
use crate::usecase::credential::{CREDENTIAL_TTL_SECS, issue_bearer};

pub struct VerifyChallengeInput {
    pub email: String,
    pub token: String,
}

pub struct VerifyChallengeOutput {
    pub user: DirectoryUser,
    pub access_token: String,
    pub expires_in: i64,
}

pub struct VerifyChallengeUseCase<U, C>
where
    U: UserDirectory,
    C: ChallengeStore,
{
    pub users: U,
    pub challenges: C,
    pub expiry_secs: i64,
    pub jwt_secret: String,
    pub jwt_issuer: String,
}

impl<U, C> VerifyChallengeUseCase<U, C>
where
    U: UserDirectory,
    C: ChallengeStore,
{
    pub async fn execute(
        &self,
        input: VerifyChallengeInput,
    ) -> Result<VerifyChallengeOutput, AuthServiceError> {
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;

        // Only the newest challenge can ever verify; earlier rows are
        // superseded regardless of their completed flag.
        let challenge = self
            .challenges
            .latest_for_user(user.id)
            .await?
            .ok_or(AuthServiceError::NoChallenge)?;

        // A token that does not hex-decode is indistinguishable from a
        // mismatch at the boundary.
        let secret = hex::decode(&input.token).map_err(|_| AuthServiceError::InvalidToken)?;
        if hash_secret(&secret) != challenge.token_hash {
            return Err(AuthServiceError::InvalidToken);
        }

        // Expiry is checked only after the hash has matched.
        let now_ms = Utc::now().timestamp_millis();
        if challenge.is_expired(now_ms, self.expiry_secs) {
            return Err(AuthServiceError::TokenExpired);
        }

        if challenge.completed {
            return Err(AuthServiceError::AlreadyUsed);
        }

        // Single-row conditional write; zero rows means another request got
        // here first and this one must not succeed.
        if !self.challenges.complete(challenge.id).await? {
            return Err(AuthServiceError::AlreadyUsed);
        }

        self.users.record_login(user.id, now_ms).await?;

        let access_token = issue_bearer(user.id, &self.jwt_issuer, &self.jwt_secret)?;
        Ok(VerifyChallengeOutput {
            user,
            access_token,
            expires_in: CREDENTIAL_TTL_SECS,
        })
    }
}
