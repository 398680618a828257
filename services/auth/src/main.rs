use std::sync::Arc;

use sea_orm::Database;
use tracing::info;

use gatehouse_auth::config::AuthConfig;
use gatehouse_auth::infra::mail::SmtpMailer;
use gatehouse_auth::migrate;
use gatehouse_auth::router::build_router;
use gatehouse_auth::state::AppState;

#[tokio::main]
async fn main() {
    gatehouse_core::tracing::init_tracing();

    let config = Arc::new(AuthConfig::from_env());

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    // Startup barrier: no handler serves until the store is at the expected
    // schema version. Any migration failure aborts the process.
    migrate::ensure(&db, migrate::SCHEMA_VERSION)
        .await
        .expect("schema migration failed");

    let mailer = SmtpMailer::from_config(&config).expect("failed to build SMTP mailer");

    let state = AppState {
        db,
        config: Arc::clone(&config),
        mailer,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
