//! Permission grant repository.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use drive_core::error::{AppError, ErrorKind};
use drive_core::result::AppResult;
use drive_entity::permission::PermissionGrant;

/// Fields of a grant being issued or replaced. `None` fields fall through
/// to the ownership/team defaults at resolution time.
#[derive(Debug, Clone, Default)]
pub struct GrantUpdate {
    /// Read override.
    pub can_read: Option<bool>,
    /// Write override.
    pub can_write: Option<bool>,
    /// Comment override.
    pub can_comment: Option<bool>,
    /// Share override.
    pub can_share: Option<bool>,
}

/// Repository for explicit per-user permission grants.
#[derive(Debug, Clone)]
pub struct GrantRepository {
    pool: SqlitePool,
}

impl GrantRepository {
    /// Create a new grant repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find the grant for a (entity, user) pair, if any.
    pub async fn find(&self, entity_id: Uuid, user_id: Uuid) -> AppResult<Option<PermissionGrant>> {
        sqlx::query_as::<_, PermissionGrant>(
            "SELECT * FROM permission_grants WHERE entity_id = ? AND user_id = ?",
        )
        .bind(entity_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to load grant for entity {entity_id}, user {user_id}"),
                e,
            )
        })
    }

    /// Issue or replace the grant for a (entity, user) pair.
    pub async fn upsert(
        &self,
        entity_id: Uuid,
        user_id: Uuid,
        granted_by: Uuid,
        update: &GrantUpdate,
    ) -> AppResult<PermissionGrant> {
        sqlx::query_as::<_, PermissionGrant>(
            "INSERT INTO permission_grants \
             (entity_id, user_id, granted_by, can_read, can_write, can_comment, can_share, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT (entity_id, user_id) DO UPDATE SET \
             granted_by = excluded.granted_by, \
             can_read = excluded.can_read, \
             can_write = excluded.can_write, \
             can_comment = excluded.can_comment, \
             can_share = excluded.can_share \
             RETURNING *",
        )
        .bind(entity_id)
        .bind(user_id)
        .bind(granted_by)
        .bind(update.can_read)
        .bind(update.can_write)
        .bind(update.can_comment)
        .bind(update.can_share)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to upsert grant for entity {entity_id}, user {user_id}"),
                e,
            )
        })
    }

    /// Remove the grant for a (entity, user) pair.
    pub async fn revoke(&self, entity_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM permission_grants WHERE entity_id = ? AND user_id = ?")
                .bind(entity_id)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Database,
                        format!("Failed to revoke grant for entity {entity_id}, user {user_id}"),
                        e,
                    )
                })?;
        Ok(result.rows_affected() > 0)
    }
}
