#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{DirectoryUser, EmailChallenge, ServiceGrant, UserStatus};
use crate::error::AuthServiceError;

/// Port onto the user directory. The auth core only reads; the maintenance
/// surface owns the writes.
pub trait UserDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str)
    -> Result<Option<DirectoryUser>, AuthServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<DirectoryUser>, AuthServiceError>;
    async fn list(&self) -> Result<Vec<DirectoryUser>, AuthServiceError>;
    async fn create(&self, user: &DirectoryUser) -> Result<(), AuthServiceError>;
    /// Returns `false` when no user with that id exists.
    async fn set_status(
        &self,
        id: Uuid,
        status: UserStatus,
        now_ms: i64,
    ) -> Result<bool, AuthServiceError>;
    async fn record_login(&self, id: Uuid, now_ms: i64) -> Result<(), AuthServiceError>;
    /// Returns `false` when no user with that id exists.
    async fn delete(&self, id: Uuid) -> Result<bool, AuthServiceError>;
}

/// Durable record of outstanding and past email challenges.
pub trait ChallengeStore: Send + Sync {
    /// The challenge with the greatest `sent_at` for this user. Older rows
    /// are superseded by definition and never surfaced.
    async fn latest_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<EmailChallenge>, AuthServiceError>;

    async fn create(&self, challenge: &EmailChallenge) -> Result<(), AuthServiceError>;

    /// Mark the challenge completed. The update is guarded by the row id and
    /// `completed = false`; `false` means zero rows were touched (already
    /// consumed, or gone) and the caller must not report success.
    async fn complete(&self, id: Uuid) -> Result<bool, AuthServiceError>;
}

/// Store of per-user service grants.
pub trait GrantStore: Send + Sync {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ServiceGrant>, AuthServiceError>;
    async fn create(&self, grant: &ServiceGrant) -> Result<(), AuthServiceError>;
    /// Returns `false` when no matching grant exists for that user.
    async fn remove(&self, user_id: Uuid, grant_id: Uuid) -> Result<bool, AuthServiceError>;
}

/// Out-of-band delivery of the verification link.
pub trait MailSender: Send + Sync {
    async fn send_challenge(&self, to: &str, link: &str) -> Result<(), AuthServiceError>;
}
