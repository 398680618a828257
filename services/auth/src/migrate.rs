use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};

/// Schema version the running code expects. Bump together with a new entry
/// in [`MIGRATIONS`] and a refreshed `schema.sql`.
pub const SCHEMA_VERSION: i64 = 2;

/// Forward-only migration scripts, one per version, applied in ascending
/// order. Scripts must be safe to re-run (see `assets/sql/`).
const MIGRATIONS: &[(i64, &str)] = &[
    (1, include_str!("../assets/sql/0001_directory.sql")),
    (2, include_str!("../assets/sql/0002_user_grants.sql")),
];

/// Declarative full schema for [`SCHEMA_VERSION`]. Every statement is
/// `IF NOT EXISTS`, so re-application on an up-to-date store is a no-op.
const CURRENT_SCHEMA: &str = include_str!("../assets/sql/schema.sql");

#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    #[error("no migration script for schema version {0}")]
    MissingStep(i64),
    #[error("store records schema version {recorded}, newer than target {target}")]
    VersionAhead { recorded: i64, target: i64 },
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

/// Bring the store from its recorded schema version up to `target`, then
/// (re)apply the canonical schema. Runs once at startup, before the router
/// is built; no handler queries the store until this returns.
///
/// A step failure aborts immediately; steps already applied stay applied.
/// There is deliberately no rollback: scripts are forward-only.
pub async fn ensure(db: &DatabaseConnection, target: i64) -> Result<(), MigrateError> {
    let recorded = recorded_version(db).await?;
    if recorded > target {
        return Err(MigrateError::VersionAhead { recorded, target });
    }

    for version in recorded + 1..=target {
        let script = MIGRATIONS
            .iter()
            .find(|(v, _)| *v == version)
            .map(|(_, script)| *script)
            .ok_or(MigrateError::MissingStep(version))?;
        db.execute_unprepared(script).await?;
        set_recorded_version(db, version).await?;
        tracing::info!(version, "applied schema migration");
    }

    db.execute_unprepared(CURRENT_SCHEMA).await?;
    Ok(())
}

/// Highest migration the store has seen, kept by the engine itself in
/// SQLite's `user_version` pragma rather than in a table.
pub async fn recorded_version(db: &DatabaseConnection) -> Result<i64, sea_orm::DbErr> {
    let row = db
        .query_one(Statement::from_string(
            db.get_database_backend(),
            "PRAGMA user_version",
        ))
        .await?;
    match row {
        Some(row) => row.try_get_by::<i64, _>(0),
        None => Ok(0),
    }
}

async fn set_recorded_version(db: &DatabaseConnection, version: i64) -> Result<(), sea_orm::DbErr> {
    // PRAGMA takes no bind parameters; `version` is an integer we produced.
    db.execute_unprepared(&format!("PRAGMA user_version = {version}"))
        .await?;
    Ok(())
}
