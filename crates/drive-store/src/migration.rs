//! Embedded schema migrations.
//!
//! Migrations are plain SQL scripts applied sequentially; the
//! `schema_version` table tracks which have run. Timestamp columns are
//! always bound from Rust, never filled by SQL defaults, so values decode
//! uniformly.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use drive_core::error::{AppError, ErrorKind};

/// Database migrations, applied in order.
pub const MIGRATIONS: &[&str] = &[
    // v1: principals and teams
    r#"
CREATE TABLE users (
    id          BLOB PRIMARY KEY,
    email       TEXT NOT NULL UNIQUE,
    full_name   TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE teams (
    id          BLOB PRIMARY KEY,
    title       TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE team_members (
    team_id     BLOB NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
    user_id     BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL,
    PRIMARY KEY (team_id, user_id)
);
"#,
    // v2: the entity tree
    r#"
CREATE TABLE entities (
    id          BLOB PRIMARY KEY,
    team_id     BLOB NOT NULL REFERENCES teams(id),
    parent_id   BLOB REFERENCES entities(id),
    title       TEXT NOT NULL,
    mime_type   TEXT NOT NULL DEFAULT '',
    file_kind   TEXT NOT NULL DEFAULT '',
    file_size   INTEGER NOT NULL DEFAULT 0 CHECK (file_size >= 0),
    is_group    INTEGER NOT NULL DEFAULT 0,
    owner_id    BLOB NOT NULL REFERENCES users(id),
    is_private  INTEGER NOT NULL DEFAULT 0,
    is_active   INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT NOT NULL,
    modified_at TEXT NOT NULL
);

CREATE INDEX idx_entities_parent ON entities(parent_id);
CREATE INDEX idx_entities_team ON entities(team_id);
CREATE INDEX idx_entities_owner ON entities(owner_id);
"#,
    // v3: grants, favourites, recents, tags
    r#"
CREATE TABLE permission_grants (
    entity_id   BLOB NOT NULL REFERENCES entities(id) ON DELETE CASCADE,
    user_id     BLOB NOT NULL REFERENCES users(id),
    granted_by  BLOB NOT NULL REFERENCES users(id),
    can_read    INTEGER,
    can_write   INTEGER,
    can_comment INTEGER,
    can_share   INTEGER,
    created_at  TEXT NOT NULL,
    PRIMARY KEY (entity_id, user_id)
);

CREATE TABLE favourites (
    entity_id   BLOB NOT NULL REFERENCES entities(id) ON DELETE CASCADE,
    user_id     BLOB NOT NULL REFERENCES users(id),
    created_at  TEXT NOT NULL,
    PRIMARY KEY (entity_id, user_id)
);

CREATE TABLE recents (
    entity_id           BLOB NOT NULL REFERENCES entities(id) ON DELETE CASCADE,
    user_id             BLOB NOT NULL REFERENCES users(id),
    last_interaction_at TEXT NOT NULL,
    PRIMARY KEY (entity_id, user_id)
);

CREATE TABLE entity_tags (
    entity_id   BLOB NOT NULL REFERENCES entities(id) ON DELETE CASCADE,
    tag         TEXT NOT NULL,
    PRIMARY KEY (entity_id, tag)
);

CREATE INDEX idx_entity_tags_tag ON entity_tags(tag);
"#,
    // v4: per-user configured quotas
    r#"
CREATE TABLE storage_quotas (
    user_id     BLOB PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
    limit_mib   INTEGER NOT NULL
);
"#,
];

/// Run all pending database migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| {
        AppError::with_source(ErrorKind::Database, "Failed to create schema_version", e)
    })?;

    let current: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM schema_version")
        .fetch_one(pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to read schema version", e)
        })?;

    for (idx, migration) in MIGRATIONS.iter().enumerate() {
        let version = (idx + 1) as i64;
        if version <= current {
            continue;
        }

        debug!(version, "Applying migration");
        let mut tx = pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin migration", e)
        })?;

        sqlx::raw_sql(migration).execute(&mut *tx).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Migration v{version} failed: {e}"),
                e,
            )
        })?;

        sqlx::query("INSERT INTO schema_version (version, applied_at) VALUES (?, ?)")
            .bind(version)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to record migration v{version}"),
                    e,
                )
            })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit migration", e)
        })?;
    }

    info!(version = MIGRATIONS.len(), "Database schema up to date");
    Ok(())
}
