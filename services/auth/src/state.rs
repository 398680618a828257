use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AuthConfig;
use crate::infra::db::{DbChallengeStore, DbGrantStore, DbUserDirectory};
use crate::infra::mail::SmtpMailer;

/// Shared application state passed to every handler via axum `State`.
/// Handlers hold no mutable state of their own; everything cross-request
/// lives behind the connection pool.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AuthConfig>,
    pub mailer: SmtpMailer,
}

impl AppState {
    pub fn user_directory(&self) -> DbUserDirectory {
        DbUserDirectory {
            db: self.db.clone(),
        }
    }

    pub fn challenge_store(&self) -> DbChallengeStore {
        DbChallengeStore {
            db: self.db.clone(),
        }
    }

    pub fn grant_store(&self) -> DbGrantStore {
        DbGrantStore {
            db: self.db.clone(),
        }
    }

    pub fn mailer(&self) -> SmtpMailer {
        self.mailer.clone()
    }
}
