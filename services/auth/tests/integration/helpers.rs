use std::sync::{Arc, Mutex};

use chrono::Utc;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use url::Url;
use uuid::Uuid;

use gatehouse_auth::domain::repository::{ChallengeStore, MailSender, UserDirectory};
use gatehouse_auth::domain::types::{DirectoryUser, EmailChallenge, UserStatus};
use gatehouse_auth::error::AuthServiceError;
use gatehouse_auth::usecase::challenge::hash_secret;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";
pub const TEST_ISSUER: &str = "gatehouse-test";
pub const TEST_BASE_URL: &str = "http://localhost:8080";
pub const TEST_VERIFY_PATH: &str = "/app/verify.html";

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_user() -> DirectoryUser {
    DirectoryUser {
        id: Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap(),
        email: "user@example.com".to_owned(),
        status: UserStatus::Active,
        created_at: now_ms(),
        updated_at: now_ms(),
        last_login_at: None,
    }
}

/// A challenge whose plaintext secret is `secret`, issued at `sent_at`.
pub fn test_challenge(user_id: Uuid, secret: &[u8], sent_at: i64) -> EmailChallenge {
    EmailChallenge {
        id: Uuid::new_v4(),
        user_id,
        token_hash: hash_secret(secret),
        sent_at,
        completed: false,
    }
}

/// Pull the `token` query parameter out of a captured verification link.
pub fn token_from_link(link: &str) -> String {
    let url = Url::parse(link).expect("captured link should parse");
    url.query_pairs()
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.into_owned())
        .expect("link should carry a token parameter")
}

// ── MockUserDirectory ────────────────────────────────────────────────────────

pub struct MockUserDirectory {
    pub users: Vec<DirectoryUser>,
    pub logins: Arc<Mutex<Vec<(Uuid, i64)>>>,
}

impl MockUserDirectory {
    pub fn new(users: Vec<DirectoryUser>) -> Self {
        Self {
            users,
            logins: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn logins_handle(&self) -> Arc<Mutex<Vec<(Uuid, i64)>>> {
        Arc::clone(&self.logins)
    }
}

impl UserDirectory for MockUserDirectory {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<DirectoryUser>, AuthServiceError> {
        Ok(self.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DirectoryUser>, AuthServiceError> {
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<DirectoryUser>, AuthServiceError> {
        Ok(self.users.clone())
    }

    async fn create(&self, _user: &DirectoryUser) -> Result<(), AuthServiceError> {
        Ok(())
    }

    async fn set_status(
        &self,
        id: Uuid,
        _status: UserStatus,
        _now_ms: i64,
    ) -> Result<bool, AuthServiceError> {
        Ok(self.users.iter().any(|u| u.id == id))
    }

    async fn record_login(&self, id: Uuid, now_ms: i64) -> Result<(), AuthServiceError> {
        self.logins.lock().unwrap().push((id, now_ms));
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AuthServiceError> {
        Ok(self.users.iter().any(|u| u.id == id))
    }
}

// ── MockChallengeStore ───────────────────────────────────────────────────────

pub struct MockChallengeStore {
    pub challenges: Arc<Mutex<Vec<EmailChallenge>>>,
    /// When set, `complete` reports zero rows touched (the lost-race case).
    pub fail_complete: bool,
}

impl MockChallengeStore {
    pub fn new(challenges: Vec<EmailChallenge>) -> Self {
        Self {
            challenges: Arc::new(Mutex::new(challenges)),
            fail_complete: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn challenges_handle(&self) -> Arc<Mutex<Vec<EmailChallenge>>> {
        Arc::clone(&self.challenges)
    }
}

impl ChallengeStore for MockChallengeStore {
    async fn latest_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<EmailChallenge>, AuthServiceError> {
        Ok(self
            .challenges
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id)
            .max_by_key(|c| c.sent_at)
            .cloned())
    }

    async fn create(&self, challenge: &EmailChallenge) -> Result<(), AuthServiceError> {
        self.challenges.lock().unwrap().push(challenge.clone());
        Ok(())
    }

    async fn complete(&self, id: Uuid) -> Result<bool, AuthServiceError> {
        if self.fail_complete {
            return Ok(false);
        }
        let mut challenges = self.challenges.lock().unwrap();
        match challenges.iter_mut().find(|c| c.id == id && !c.completed) {
            Some(challenge) => {
                challenge.completed = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ── MockMailSender ───────────────────────────────────────────────────────────

pub struct MockMailSender {
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
    pub fail: bool,
}

impl MockMailSender {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
            fail: true,
        }
    }

    pub fn sent_handle(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        Arc::clone(&self.sent)
    }
}

impl MailSender for MockMailSender {
    async fn send_challenge(&self, to: &str, link: &str) -> Result<(), AuthServiceError> {
        if self.fail {
            return Err(AuthServiceError::Internal(anyhow::anyhow!(
                "smtp unavailable"
            )));
        }
        self.sent.lock().unwrap().push((to.to_owned(), link.to_owned()));
        Ok(())
    }
}

// ── Store helpers ────────────────────────────────────────────────────────────

/// In-memory SQLite pinned to a single pooled connection so every query in a
/// test sees the same database.
pub async fn memory_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    Database::connect(options)
        .await
        .expect("connect in-memory sqlite")
}
