//! Favourite markers and recents (last-interaction log).

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use drive_core::error::{AppError, ErrorKind};
use drive_core::result::AppResult;
use drive_entity::activity::{Favourite, RecentEntry};

/// Repository for per-user favourites and recents.
#[derive(Debug, Clone)]
pub struct ActivityRepository {
    pool: SqlitePool,
}

impl ActivityRepository {
    /// Create a new activity repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Mark an entity as a favourite of a user. Idempotent.
    pub async fn add_favourite(&self, entity_id: Uuid, user_id: Uuid) -> AppResult<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO favourites (entity_id, user_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(entity_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to favourite entity {entity_id} for user {user_id}"),
                e,
            )
        })?;
        Ok(())
    }

    /// Remove a favourite marker.
    pub async fn remove_favourite(&self, entity_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM favourites WHERE entity_id = ? AND user_id = ?")
            .bind(entity_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to unfavourite entity {entity_id} for user {user_id}"),
                    e,
                )
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Check whether a user has favourited an entity.
    pub async fn is_favourite(&self, entity_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM favourites WHERE entity_id = ? AND user_id = ?",
        )
        .bind(entity_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to check favourite on entity {entity_id}"),
                e,
            )
        })?;
        Ok(count > 0)
    }

    /// List a user's favourite markers, oldest first.
    pub async fn favourites_for_user(&self, user_id: Uuid) -> AppResult<Vec<Favourite>> {
        sqlx::query_as::<_, Favourite>(
            "SELECT * FROM favourites WHERE user_id = ? ORDER BY created_at ASC, entity_id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to list favourites of user {user_id}"),
                e,
            )
        })
    }

    /// Record an interaction of a user with an entity. One row per pair,
    /// updated in place on repeat access.
    pub async fn record_interaction(
        &self,
        entity_id: Uuid,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO recents (entity_id, user_id, last_interaction_at) VALUES (?, ?, ?) \
             ON CONFLICT (entity_id, user_id) DO UPDATE SET \
             last_interaction_at = excluded.last_interaction_at",
        )
        .bind(entity_id)
        .bind(user_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to record interaction on entity {entity_id}"),
                e,
            )
        })?;
        Ok(())
    }

    /// The last interaction of a user with an entity, if any.
    pub async fn last_interaction(
        &self,
        entity_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<RecentEntry>> {
        sqlx::query_as::<_, RecentEntry>(
            "SELECT * FROM recents WHERE entity_id = ? AND user_id = ?",
        )
        .bind(entity_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to load recent entry for entity {entity_id}"),
                e,
            )
        })
    }
}
