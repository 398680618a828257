use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::{DirectoryUser, ServiceGrant, UserStatus};
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::directory::{
    CreateUserInput, CreateUserUseCase, DeleteUserUseCase, DirectoryEntry, GetUserUseCase,
    GrantRequest, ListUsersUseCase, SetUserStatusUseCase,
};

#[derive(Serialize)]
pub struct UserPayload {
    pub id: String,
    pub email: String,
    pub status: &'static str,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<i64>,
}

impl From<DirectoryUser> for UserPayload {
    fn from(user: DirectoryUser) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            status: user.status.as_str(),
            created_at: user.created_at,
            updated_at: user.updated_at,
            last_login_at: user.last_login_at,
        }
    }
}

#[derive(Serialize)]
pub struct GrantPayload {
    pub id: String,
    pub user_id: String,
    pub service: String,
    pub permission: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl From<ServiceGrant> for GrantPayload {
    fn from(grant: ServiceGrant) -> Self {
        Self {
            id: grant.id.to_string(),
            user_id: grant.user_id.to_string(),
            service: grant.service,
            permission: grant.permission.as_str(),
            expires_at: grant.expires_at,
        }
    }
}

#[derive(Serialize)]
pub struct EntryPayload {
    #[serde(flatten)]
    pub user: UserPayload,
    pub grants: Vec<GrantPayload>,
}

impl From<DirectoryEntry> for EntryPayload {
    fn from(entry: DirectoryEntry) -> Self {
        Self {
            user: entry.user.into(),
            grants: entry.grants.into_iter().map(Into::into).collect(),
        }
    }
}

// ── GET /api/maintenance/users ───────────────────────────────────────────────

#[derive(Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<EntryPayload>,
    pub count: usize,
}

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ListUsersResponse>, AuthServiceError> {
    let usecase = ListUsersUseCase {
        users: state.user_directory(),
        grants: state.grant_store(),
    };
    let entries = usecase.execute().await?;
    let users: Vec<EntryPayload> = entries.into_iter().map(Into::into).collect();
    let count = users.len();
    Ok(Json(ListUsersResponse { users, count }))
}

// ── GET /api/maintenance/users/{id} ──────────────────────────────────────────

#[derive(Serialize)]
pub struct GetUserResponse {
    pub user: EntryPayload,
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<GetUserResponse>, AuthServiceError> {
    let usecase = GetUserUseCase {
        users: state.user_directory(),
        grants: state.grant_store(),
    };
    let entry = usecase.execute(user_id).await?;
    Ok(Json(GetUserResponse { user: entry.into() }))
}

// ── POST /api/maintenance/users ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct GrantBody {
    pub service: String,
    pub permission: String,
    pub expires_at: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub status: Option<String>,
    #[serde(default)]
    pub grants: Vec<GrantBody>,
}

#[derive(Serialize)]
pub struct CreateUserResponse {
    pub message: &'static str,
    pub user: UserPayload,
    pub grants: Vec<GrantPayload>,
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>), AuthServiceError> {
    let usecase = CreateUserUseCase {
        users: state.user_directory(),
        grants: state.grant_store(),
    };
    let entry = usecase
        .execute(CreateUserInput {
            email: body.email.trim().to_owned(),
            status: body.status,
            grants: body
                .grants
                .into_iter()
                .map(|g| GrantRequest {
                    service: g.service,
                    permission: g.permission,
                    expires_at: g.expires_at,
                })
                .collect(),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            message: "user created",
            user: entry.user.into(),
            grants: entry.grants.into_iter().map(Into::into).collect(),
        }),
    ))
}

// ── PUT /api/maintenance/users/{id}/suspend | /activate ─────────────────────

#[derive(Serialize)]
pub struct StatusChangeResponse {
    pub message: &'static str,
    pub user_id: String,
    pub status: &'static str,
}

pub async fn suspend_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<StatusChangeResponse>, AuthServiceError> {
    let usecase = SetUserStatusUseCase {
        users: state.user_directory(),
    };
    usecase.execute(user_id, UserStatus::Suspended).await?;
    Ok(Json(StatusChangeResponse {
        message: "user suspended",
        user_id: user_id.to_string(),
        status: UserStatus::Suspended.as_str(),
    }))
}

pub async fn activate_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<StatusChangeResponse>, AuthServiceError> {
    let usecase = SetUserStatusUseCase {
        users: state.user_directory(),
    };
    usecase.execute(user_id, UserStatus::Active).await?;
    Ok(Json(StatusChangeResponse {
        message: "user activated",
        user_id: user_id.to_string(),
        status: UserStatus::Active.as_str(),
    }))
}

// ── DELETE /api/maintenance/users/{id} ───────────────────────────────────────

#[derive(Serialize)]
pub struct DeleteUserResponse {
    pub message: &'static str,
    pub user_id: String,
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<DeleteUserResponse>, AuthServiceError> {
    let usecase = DeleteUserUseCase {
        users: state.user_directory(),
    };
    usecase.execute(user_id).await?;
    Ok(Json(DeleteUserResponse {
        message: "user deleted",
        user_id: user_id.to_string(),
    }))
}
