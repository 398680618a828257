use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthServiceError;
use crate::handlers::users::GrantPayload;
use crate::state::AppState;
use crate::usecase::grant::{AddGrantInput, AddGrantUseCase, ListGrantsUseCase, RemoveGrantUseCase};

// ── GET /api/maintenance/users/{id}/grants ───────────────────────────────────

#[derive(Serialize)]
pub struct ListGrantsResponse {
    pub user_id: String,
    pub grants: Vec<GrantPayload>,
    pub count: usize,
}

pub async fn list_grants(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ListGrantsResponse>, AuthServiceError> {
    let usecase = ListGrantsUseCase {
        users: state.user_directory(),
        grants: state.grant_store(),
    };
    let grants: Vec<GrantPayload> = usecase
        .execute(user_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let count = grants.len();
    Ok(Json(ListGrantsResponse {
        user_id: user_id.to_string(),
        grants,
        count,
    }))
}

// ── POST /api/maintenance/users/{id}/grants ──────────────────────────────────

#[derive(Deserialize)]
pub struct AddGrantRequest {
    pub service: String,
    pub permission: String,
    pub expires_at: Option<i64>,
}

#[derive(Serialize)]
pub struct AddGrantResponse {
    pub message: &'static str,
    pub grant: GrantPayload,
}

pub async fn add_grant(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<AddGrantRequest>,
) -> Result<(StatusCode, Json<AddGrantResponse>), AuthServiceError> {
    let usecase = AddGrantUseCase {
        users: state.user_directory(),
        grants: state.grant_store(),
    };
    let grant = usecase
        .execute(
            user_id,
            AddGrantInput {
                service: body.service,
                permission: body.permission,
                expires_at: body.expires_at,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(AddGrantResponse {
            message: "grant added",
            grant: grant.into(),
        }),
    ))
}

// ── DELETE /api/maintenance/users/{id}/grants/{grant_id} ─────────────────────

#[derive(Serialize)]
pub struct RemoveGrantResponse {
    pub message: &'static str,
    pub user_id: String,
    pub grant_id: String,
}

pub async fn remove_grant(
    State(state): State<AppState>,
    Path((user_id, grant_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<RemoveGrantResponse>, AuthServiceError> {
    let usecase = RemoveGrantUseCase {
        grants: state.grant_store(),
    };
    usecase.execute(user_id, grant_id).await?;
    Ok(Json(RemoveGrantResponse {
        message: "grant removed",
        user_id: user_id.to_string(),
        grant_id: grant_id.to_string(),
    }))
}
