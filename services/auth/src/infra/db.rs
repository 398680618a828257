use anyhow::{Context as _, anyhow};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, sea_query::Expr,
};
use uuid::Uuid;

use gatehouse_auth_schema::{email_challenges, user_grants, users};

use crate::domain::repository::{ChallengeStore, GrantStore, UserDirectory};
use crate::domain::types::{
    DirectoryUser, EmailChallenge, GrantPermission, ServiceGrant, UserStatus,
};
use crate::error::AuthServiceError;

// ── User directory ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserDirectory {
    pub db: DatabaseConnection,
}

impl UserDirectory for DbUserDirectory {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<DirectoryUser>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DirectoryUser>, AuthServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn list(&self) -> Result<Vec<DirectoryUser>, AuthServiceError> {
        let models = users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list users")?;
        models.into_iter().map(user_from_model).collect()
    }

    async fn create(&self, user: &DirectoryUser) -> Result<(), AuthServiceError> {
        users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            status: Set(user.status.as_str().to_owned()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
            last_login_at: Set(user.last_login_at),
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        Ok(())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: UserStatus,
        now_ms: i64,
    ) -> Result<bool, AuthServiceError> {
        let result = users::Entity::update_many()
            .filter(users::Column::Id.eq(id))
            .col_expr(users::Column::Status, Expr::value(status.as_str()))
            .col_expr(users::Column::UpdatedAt, Expr::value(now_ms))
            .exec(&self.db)
            .await
            .context("set user status")?;
        Ok(result.rows_affected > 0)
    }

    async fn record_login(&self, id: Uuid, now_ms: i64) -> Result<(), AuthServiceError> {
        users::Entity::update_many()
            .filter(users::Column::Id.eq(id))
            .col_expr(users::Column::LastLoginAt, Expr::value(now_ms))
            .exec(&self.db)
            .await
            .context("record user login")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AuthServiceError> {
        let result = users::Entity::delete_many()
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_model(model: users::Model) -> Result<DirectoryUser, AuthServiceError> {
    let status = UserStatus::parse(&model.status)
        .ok_or_else(|| anyhow!("invalid stored user status: {}", model.status))?;
    Ok(DirectoryUser {
        id: model.id,
        email: model.email,
        status,
        created_at: model.created_at,
        updated_at: model.updated_at,
        last_login_at: model.last_login_at,
    })
}

// ── Challenge store ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbChallengeStore {
    pub db: DatabaseConnection,
}

impl ChallengeStore for DbChallengeStore {
    async fn latest_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<EmailChallenge>, AuthServiceError> {
        // Most-recent-wins: ordering by sent_at with a single-row fetch is
        // the whole superseding mechanism; there is no supersede flag.
        let model = email_challenges::Entity::find()
            .filter(email_challenges::Column::UserId.eq(user_id))
            .order_by_desc(email_challenges::Column::SentAt)
            .one(&self.db)
            .await
            .context("find latest challenge")?;
        Ok(model.map(challenge_from_model))
    }

    async fn create(&self, challenge: &EmailChallenge) -> Result<(), AuthServiceError> {
        email_challenges::ActiveModel {
            id: Set(challenge.id),
            user_id: Set(challenge.user_id),
            token_hash: Set(challenge.token_hash.clone()),
            sent_at: Set(challenge.sent_at),
            completed: Set(challenge.completed),
        }
        .insert(&self.db)
        .await
        .context("create challenge")?;
        Ok(())
    }

    async fn complete(&self, id: Uuid) -> Result<bool, AuthServiceError> {
        let result = email_challenges::Entity::update_many()
            .filter(email_challenges::Column::Id.eq(id))
            .filter(email_challenges::Column::Completed.eq(false))
            .col_expr(email_challenges::Column::Completed, Expr::value(true))
            .exec(&self.db)
            .await
            .context("complete challenge")?;
        Ok(result.rows_affected == 1)
    }
}

fn challenge_from_model(model: email_challenges::Model) -> EmailChallenge {
    EmailChallenge {
        id: model.id,
        user_id: model.user_id,
        token_hash: model.token_hash,
        sent_at: model.sent_at,
        completed: model.completed,
    }
}

// ── Grant store ──────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbGrantStore {
    pub db: DatabaseConnection,
}

impl GrantStore for DbGrantStore {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ServiceGrant>, AuthServiceError> {
        let models = user_grants::Entity::find()
            .filter(user_grants::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .context("list grants")?;
        models.into_iter().map(grant_from_model).collect()
    }

    async fn create(&self, grant: &ServiceGrant) -> Result<(), AuthServiceError> {
        user_grants::ActiveModel {
            id: Set(grant.id),
            user_id: Set(grant.user_id),
            service: Set(grant.service.clone()),
            permission: Set(grant.permission.as_str().to_owned()),
            expires_at: Set(grant.expires_at),
        }
        .insert(&self.db)
        .await
        .context("create grant")?;
        Ok(())
    }

    async fn remove(&self, user_id: Uuid, grant_id: Uuid) -> Result<bool, AuthServiceError> {
        let result = user_grants::Entity::delete_many()
            .filter(user_grants::Column::Id.eq(grant_id))
            .filter(user_grants::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("remove grant")?;
        Ok(result.rows_affected > 0)
    }
}

fn grant_from_model(model: user_grants::Model) -> Result<ServiceGrant, AuthServiceError> {
    let permission = GrantPermission::parse(&model.permission)
        .ok_or_else(|| anyhow!("invalid stored grant permission: {}", model.permission))?;
    Ok(ServiceGrant {
        id: model.id,
        user_id: model.user_id,
        service: model.service,
        permission,
        expires_at: model.expires_at,
    })
}
