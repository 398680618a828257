use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{GrantStore, UserDirectory};
use crate::domain::types::{
    DEFAULT_GRANT_SERVICE, DirectoryUser, GrantPermission, ServiceGrant, UserStatus,
    validate_email,
};
use crate::error::AuthServiceError;

/// A user together with their service grants, as the maintenance surface
/// reports them.
pub struct DirectoryEntry {
    pub user: DirectoryUser,
    pub grants: Vec<ServiceGrant>,
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<U: UserDirectory, G: GrantStore> {
    pub users: U,
    pub grants: G,
}

impl<U: UserDirectory, G: GrantStore> ListUsersUseCase<U, G> {
    pub async fn execute(&self) -> Result<Vec<DirectoryEntry>, AuthServiceError> {
        let users = self.users.list().await?;
        let mut entries = Vec::with_capacity(users.len());
        for user in users {
            let grants = self.grants.list_for_user(user.id).await?;
            entries.push(DirectoryEntry { user, grants });
        }
        Ok(entries)
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<U: UserDirectory, G: GrantStore> {
    pub users: U,
    pub grants: G,
}

impl<U: UserDirectory, G: GrantStore> GetUserUseCase<U, G> {
    pub async fn execute(&self, user_id: Uuid) -> Result<DirectoryEntry, AuthServiceError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;
        let grants = self.grants.list_for_user(user.id).await?;
        Ok(DirectoryEntry { user, grants })
    }
}

// ── CreateUser ───────────────────────────────────────────────────────────────

pub struct GrantRequest {
    pub service: String,
    pub permission: String,
    pub expires_at: Option<i64>,
}

pub struct CreateUserInput {
    pub email: String,
    pub status: Option<String>,
    pub grants: Vec<GrantRequest>,
}

pub struct CreateUserUseCase<U: UserDirectory, G: GrantStore> {
    pub users: U,
    pub grants: G,
}

impl<U: UserDirectory, G: GrantStore> CreateUserUseCase<U, G> {
    pub async fn execute(&self, input: CreateUserInput) -> Result<DirectoryEntry, AuthServiceError> {
        if !validate_email(&input.email) {
            return Err(AuthServiceError::InvalidEmail);
        }
        let status = match input.status.as_deref() {
            None | Some("") => UserStatus::Active,
            Some(s) => UserStatus::parse(s).ok_or(AuthServiceError::InvalidStatus)?,
        };

        let user_id = Uuid::new_v4();
        // Validate every requested grant before any row is written.
        let mut grants = Vec::new();
        for request in &input.grants {
            let permission = GrantPermission::parse(&request.permission)
                .ok_or(AuthServiceError::InvalidPermission)?;
            grants.push(ServiceGrant {
                id: Uuid::new_v4(),
                user_id,
                service: request.service.clone(),
                permission,
                expires_at: request.expires_at,
            });
        }
        if grants.is_empty() {
            grants.push(ServiceGrant {
                id: Uuid::new_v4(),
                user_id,
                service: DEFAULT_GRANT_SERVICE.to_owned(),
                permission: GrantPermission::User,
                expires_at: None,
            });
        }

        let now = Utc::now().timestamp_millis();
        let user = DirectoryUser {
            id: user_id,
            email: input.email,
            status,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };
        self.users.create(&user).await?;
        for grant in &grants {
            self.grants.create(grant).await?;
        }

        Ok(DirectoryEntry { user, grants })
    }
}

// ── SetUserStatus ────────────────────────────────────────────────────────────

pub struct SetUserStatusUseCase<U: UserDirectory> {
    pub users: U,
}

impl<U: UserDirectory> SetUserStatusUseCase<U> {
    pub async fn execute(&self, user_id: Uuid, status: UserStatus) -> Result<(), AuthServiceError> {
        let now = Utc::now().timestamp_millis();
        if !self.users.set_status(user_id, status, now).await? {
            return Err(AuthServiceError::UserNotFound);
        }
        Ok(())
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<U: UserDirectory> {
    pub users: U,
}

impl<U: UserDirectory> DeleteUserUseCase<U> {
    pub async fn execute(&self, user_id: Uuid) -> Result<(), AuthServiceError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;
        if user.status != UserStatus::Suspended {
            return Err(AuthServiceError::NotSuspended);
        }
        if !self.users.delete(user_id).await? {
            return Err(AuthServiceError::UserNotFound);
        }
        Ok(())
    }
}
