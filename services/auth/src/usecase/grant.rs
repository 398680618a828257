use uuid::Uuid;

use crate::domain::repository::{GrantStore, UserDirectory};
use crate::domain::types::{GrantPermission, ServiceGrant};
use crate::error::AuthServiceError;

// ── ListGrants ───────────────────────────────────────────────────────────────

pub struct ListGrantsUseCase<U: UserDirectory, G: GrantStore> {
    pub users: U,
    pub grants: G,
}

impl<U: UserDirectory, G: GrantStore> ListGrantsUseCase<U, G> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<ServiceGrant>, AuthServiceError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;
        self.grants.list_for_user(user_id).await
    }
}

// ── AddGrant ─────────────────────────────────────────────────────────────────

pub struct AddGrantInput {
    pub service: String,
    pub permission: String,
    pub expires_at: Option<i64>,
}

pub struct AddGrantUseCase<U: UserDirectory, G: GrantStore> {
    pub users: U,
    pub grants: G,
}

impl<U: UserDirectory, G: GrantStore> AddGrantUseCase<U, G> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: AddGrantInput,
    ) -> Result<ServiceGrant, AuthServiceError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;
        let permission = GrantPermission::parse(&input.permission)
            .ok_or(AuthServiceError::InvalidPermission)?;
        let grant = ServiceGrant {
            id: Uuid::new_v4(),
            user_id,
            service: input.service,
            permission,
            expires_at: input.expires_at,
        };
        self.grants.create(&grant).await?;
        Ok(grant)
    }
}

// ── RemoveGrant ──────────────────────────────────────────────────────────────

pub struct RemoveGrantUseCase<G: GrantStore> {
    pub grants: G,
}

impl<G: GrantStore> RemoveGrantUseCase<G> {
    pub async fn execute(&self, user_id: Uuid, grant_id: Uuid) -> Result<(), AuthServiceError> {
        if !self.grants.remove(user_id, grant_id).await? {
            return Err(AuthServiceError::GrantNotFound);
        }
        Ok(())
    }
}
