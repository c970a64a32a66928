//! Entity tag repository.

use sqlx::SqlitePool;
use uuid::Uuid;

use drive_core::error::{AppError, ErrorKind};
use drive_core::result::AppResult;

/// Repository for the entity/tag many-to-many relation.
#[derive(Debug, Clone)]
pub struct TagRepository {
    pool: SqlitePool,
}

impl TagRepository {
    /// Create a new tag repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Attach a tag to an entity. Idempotent.
    pub async fn add(&self, entity_id: Uuid, tag: &str) -> AppResult<()> {
        if tag.trim().is_empty() {
            return Err(AppError::invalid_argument(format!(
                "Empty tag for entity {entity_id}"
            )));
        }
        sqlx::query("INSERT OR IGNORE INTO entity_tags (entity_id, tag) VALUES (?, ?)")
            .bind(entity_id)
            .bind(tag)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to tag entity {entity_id} with '{tag}'"),
                    e,
                )
            })?;
        Ok(())
    }

    /// Detach a tag from an entity.
    pub async fn remove(&self, entity_id: Uuid, tag: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM entity_tags WHERE entity_id = ? AND tag = ?")
            .bind(entity_id)
            .bind(tag)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to untag entity {entity_id} from '{tag}'"),
                    e,
                )
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// List the tags on one entity.
    pub async fn for_entity(&self, entity_id: Uuid) -> AppResult<Vec<String>> {
        sqlx::query_scalar("SELECT tag FROM entity_tags WHERE entity_id = ? ORDER BY tag ASC")
            .bind(entity_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to list tags of entity {entity_id}"),
                    e,
                )
            })
    }
}
