use anyhow::Context as _;
use chrono::Utc;
use rand::RngExt;
use sha2::{Digest, Sha256};
use url::Url;
use uuid::Uuid;

use crate::domain::repository::{ChallengeStore, MailSender, UserDirectory};
use crate::domain::types::EmailChallenge;
use crate::error::AuthServiceError;

/// Challenge secret length in bytes (256 bits).
pub const SECRET_BYTES: usize = 32;

fn generate_secret() -> [u8; SECRET_BYTES] {
    let mut rng = rand::rng();
    rng.random()
}

/// One-way hash of the raw secret bytes, hex-encoded. Deterministic, so the
/// verifier can recompute it; irreversible, so a leaked store never yields
/// usable tokens.
pub fn hash_secret(secret: &[u8]) -> String {
    hex::encode(Sha256::digest(secret))
}

pub struct IssueChallengeInput {
    pub email: String,
    pub redirect: Option<String>,
}

pub struct IssueChallengeOutput {
    pub email: String,
}

pub struct IssueChallengeUseCase<U, C, M>
where
    U: UserDirectory,
    C: ChallengeStore,
    M: MailSender,
{
    pub users: U,
    pub challenges: C,
    pub mail: M,
    pub debounce_secs: i64,
    pub base_url: String,
    pub verify_path: String,
}

impl<U, C, M> IssueChallengeUseCase<U, C, M>
where
    U: UserDirectory,
    C: ChallengeStore,
    M: MailSender,
{
    pub async fn execute(
        &self,
        input: IssueChallengeInput,
    ) -> Result<IssueChallengeOutput, AuthServiceError> {
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;

        let now_ms = Utc::now().timestamp_millis();

        // Debounce against the newest challenge only; older rows are already
        // superseded. There is no lock between this check and the insert
        // below, so two near-simultaneous requests can both pass it.
        if let Some(previous) = self.challenges.latest_for_user(user.id).await? {
            let elapsed_ms = now_ms - previous.sent_at;
            let debounce_ms = self.debounce_secs * 1000;
            if elapsed_ms < debounce_ms {
                return Err(AuthServiceError::RateLimited {
                    retry_after_secs: (debounce_ms - elapsed_ms) / 1000,
                });
            }
        }

        let secret = generate_secret();
        let challenge = EmailChallenge {
            id: Uuid::new_v4(),
            user_id: user.id,
            token_hash: hash_secret(&secret),
            sent_at: now_ms,
            completed: false,
        };
        // The previous challenge row stays untouched; it is superseded by
        // this one through the most-recent-wins lookup.
        self.challenges.create(&challenge).await?;

        let link = self.build_verify_link(&hex::encode(secret), &user.email, &input.redirect)?;
        self.mail.send_challenge(&user.email, &link).await?;

        Ok(IssueChallengeOutput { email: user.email })
    }

    fn build_verify_link(
        &self,
        token: &str,
        email: &str,
        redirect: &Option<String>,
    ) -> Result<String, AuthServiceError> {
        let mut link = Url::parse(&self.base_url).context("parse public base url")?;
        link.set_path(&self.verify_path);
        {
            let mut pairs = link.query_pairs_mut();
            pairs.append_pair("token", token);
            pairs.append_pair("email", email);
            if let Some(redirect) = redirect {
                pairs.append_pair("redirect", redirect);
            }
        }
        Ok(link.into())
    }
}
