use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;

/// Body returned by `GET /healthz`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

/// Liveness handler. The service name is baked in at the route site:
/// `get(|| async { healthz("auth") })`.
pub fn healthz(service: &'static str) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy",
            service,
        }),
    )
}

/// Readiness handler. Override per service when readiness differs from
/// liveness (e.g. waiting on a store connection).
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}
