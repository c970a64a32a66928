//! Team and membership repository.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use drive_core::error::{AppError, ErrorKind};
use drive_core::result::AppResult;
use drive_entity::team::Team;

/// Repository for teams and team membership.
#[derive(Debug, Clone)]
pub struct TeamRepository {
    pool: SqlitePool,
}

impl TeamRepository {
    /// Create a new team repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a team.
    pub async fn create(&self, title: &str) -> AppResult<Team> {
        sqlx::query_as::<_, Team>(
            "INSERT INTO teams (id, title, created_at) VALUES (?, ?, ?) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to create team '{title}'"),
                e,
            )
        })
    }

    /// Find a team by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Team>> {
        sqlx::query_as::<_, Team>("SELECT * FROM teams WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, format!("Failed to find team {id}"), e)
            })
    }

    /// Add a user to a team. Idempotent.
    pub async fn add_member(&self, team_id: Uuid, user_id: Uuid) -> AppResult<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO team_members (team_id, user_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(team_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to add user {user_id} to team {team_id}"),
                e,
            )
        })?;
        Ok(())
    }

    /// Remove a user from a team.
    pub async fn remove_member(&self, team_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM team_members WHERE team_id = ? AND user_id = ?")
            .bind(team_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to remove user {user_id} from team {team_id}"),
                    e,
                )
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Check whether a user belongs to a team.
    pub async fn is_member(&self, team_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM team_members WHERE team_id = ? AND user_id = ?",
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to check membership of {user_id} in {team_id}"),
                e,
            )
        })?;
        Ok(count > 0)
    }
}
