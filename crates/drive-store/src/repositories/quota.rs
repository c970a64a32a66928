//! Storage usage aggregates and per-user quota rows.
//!
//! The aggregates are pure reads over the entity table; folders are never
//! charged, and only active files count.

use sqlx::SqlitePool;
use uuid::Uuid;

use drive_core::error::{AppError, ErrorKind};
use drive_core::result::AppResult;
use drive_entity::entity::Entity;
use drive_entity::storage::{KindUsage, StorageQuotaRow};

/// Repository for storage aggregates and configured quota rows.
#[derive(Debug, Clone)]
pub struct QuotaRepository {
    pool: SqlitePool,
}

impl QuotaRepository {
    /// Create a new quota repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Total bytes consumed by a user's active files.
    pub async fn usage_by_owner(&self, owner_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(file_size), 0) FROM entities \
             WHERE owner_id = ? AND is_group = 0 AND is_active = 1",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to sum usage of owner {owner_id}"),
                e,
            )
        })
    }

    /// Per-kind byte totals, globally or scoped to one owner.
    pub async fn usage_by_kind(&self, owner_id: Option<Uuid>) -> AppResult<Vec<KindUsage>> {
        let result = match owner_id {
            Some(owner) => {
                sqlx::query_as::<_, KindUsage>(
                    "SELECT file_kind, COALESCE(SUM(file_size), 0) AS total_bytes \
                     FROM entities WHERE is_group = 0 AND is_active = 1 AND owner_id = ? \
                     GROUP BY file_kind ORDER BY file_kind ASC",
                )
                .bind(owner)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, KindUsage>(
                    "SELECT file_kind, COALESCE(SUM(file_size), 0) AS total_bytes \
                     FROM entities WHERE is_group = 0 AND is_active = 1 \
                     GROUP BY file_kind ORDER BY file_kind ASC",
                )
                .fetch_all(&self.pool)
                .await
            }
        };
        result.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to sum usage by kind", e)
        })
    }

    /// Total bytes consumed by all active files.
    pub async fn total_usage(&self) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(file_size), 0) FROM entities \
             WHERE is_group = 0 AND is_active = 1",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to sum total usage", e)
        })
    }

    /// A user's active files, largest first.
    pub async fn owned_files(&self, owner_id: Uuid) -> AppResult<Vec<Entity>> {
        sqlx::query_as::<_, Entity>(
            "SELECT * FROM entities \
             WHERE owner_id = ? AND is_group = 0 AND is_active = 1 \
             ORDER BY file_size DESC, id ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to list files of owner {owner_id}"),
                e,
            )
        })
    }

    /// The configured quota row for a user, if any.
    pub async fn quota_row(&self, user_id: Uuid) -> AppResult<Option<StorageQuotaRow>> {
        sqlx::query_as::<_, StorageQuotaRow>(
            "SELECT * FROM storage_quotas WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to load quota row of user {user_id}"),
                e,
            )
        })
    }

    /// Set (or replace) the configured quota row for a user.
    pub async fn set_quota_row(&self, user_id: Uuid, limit_mib: i64) -> AppResult<()> {
        if limit_mib <= 0 {
            return Err(AppError::invalid_argument(format!(
                "Quota for user {user_id} must be positive, got {limit_mib} MiB"
            )));
        }
        sqlx::query(
            "INSERT INTO storage_quotas (user_id, limit_mib) VALUES (?, ?) \
             ON CONFLICT (user_id) DO UPDATE SET limit_mib = excluded.limit_mib",
        )
        .bind(user_id)
        .bind(limit_mib)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to set quota row of user {user_id}"),
                e,
            )
        })?;
        Ok(())
    }
}
