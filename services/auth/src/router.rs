use axum::{
    Router,
    extract::RawQuery,
    response::Redirect,
    routing::{delete, get, post, put},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use gatehouse_core::health::{healthz, readyz};
use gatehouse_core::middleware::{propagate_request_id_layer, set_request_id_layer};

use crate::handlers::{
    auth::{request_challenge, verify_challenge},
    grants::{add_grant, list_grants, remove_grant},
    users::{activate_user, create_user, delete_user, get_user, list_users, suspend_user},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let web_dir = state.config.web_dir.clone();
    Router::new()
        // Landing + health
        .route("/", get(redirect_to_app))
        .route("/healthz", get(|| async { healthz("auth") }))
        .route("/readyz", get(readyz))
        // Email authentication
        .route("/api/auth/email", post(request_challenge))
        .route("/api/auth/email/verify", get(verify_challenge))
        // Directory maintenance
        .route("/api/maintenance/users", get(list_users))
        .route("/api/maintenance/users", post(create_user))
        .route("/api/maintenance/users/{id}", get(get_user))
        .route("/api/maintenance/users/{id}", delete(delete_user))
        .route("/api/maintenance/users/{id}/suspend", put(suspend_user))
        .route("/api/maintenance/users/{id}/activate", put(activate_user))
        // Service grants
        .route("/api/maintenance/users/{id}/grants", get(list_grants))
        .route("/api/maintenance/users/{id}/grants", post(add_grant))
        .route(
            "/api/maintenance/users/{id}/grants/{grant_id}",
            delete(remove_grant),
        )
        // Static auth pages
        .nest_service("/app", ServeDir::new(web_dir))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(set_request_id_layer())
        .with_state(state)
}

/// `GET /` sends browsers to the auth pages, keeping the query string so a
/// `redirect` parameter survives the hop.
async fn redirect_to_app(RawQuery(query): RawQuery) -> Redirect {
    match query {
        Some(query) => Redirect::permanent(&format!("/app/?{query}")),
        None => Redirect::permanent("/app/"),
    }
}
