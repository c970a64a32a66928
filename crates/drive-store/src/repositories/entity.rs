//! Entity repository: tree CRUD, descendant enumeration, and the
//! transactional deactivation cascade.

use std::collections::{HashSet, VecDeque};

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::info;
use uuid::Uuid;

use drive_core::error::{AppError, ErrorKind};
use drive_core::result::AppResult;
use drive_entity::entity::{CreateEntity, Entity, UpdateEntity};

/// Repository for entity-tree CRUD and cascade operations.
#[derive(Debug, Clone)]
pub struct EntityRepository {
    pool: SqlitePool,
}

impl EntityRepository {
    /// Create a new entity repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find an entity by ID, failing with `NotFound` when absent.
    pub async fn get(&self, id: Uuid) -> AppResult<Entity> {
        sqlx::query_as::<_, Entity>("SELECT * FROM entities WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, format!("Failed to load entity {id}"), e)
            })?
            .ok_or_else(|| AppError::not_found(format!("Entity {id} not found")))
    }

    /// List direct children of a folder. No ordering is promised; callers
    /// supply their own sort.
    pub async fn children(&self, parent_id: Uuid, active_only: bool) -> AppResult<Vec<Entity>> {
        let sql = if active_only {
            "SELECT * FROM entities WHERE parent_id = ? AND is_active = 1"
        } else {
            "SELECT * FROM entities WHERE parent_id = ?"
        };
        sqlx::query_as::<_, Entity>(sql)
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to list children of {parent_id}"),
                    e,
                )
            })
    }

    /// Enumerate all descendants of an entity, excluding the entity itself.
    ///
    /// The walk is breadth-first with a visited set: a malformed cycle in
    /// the stored tree fails fast with `CorruptTree` instead of looping.
    pub async fn descendants(&self, id: Uuid) -> AppResult<Vec<Entity>> {
        // Surface NotFound before walking.
        self.get(id).await?;

        let mut visited: HashSet<Uuid> = HashSet::from([id]);
        let mut queue: VecDeque<Uuid> = VecDeque::from([id]);
        let mut result = Vec::new();

        while let Some(next) = queue.pop_front() {
            for child in self.children(next, false).await? {
                if !visited.insert(child.id) {
                    return Err(AppError::corrupt_tree(format!(
                        "Cycle detected at entity {} while walking descendants of {id}",
                        child.id
                    )));
                }
                queue.push_back(child.id);
                result.push(child);
            }
        }

        Ok(result)
    }

    /// Create a new entity, enforcing the tree invariants: the parent must
    /// exist, be a folder, and belong to the same team; a team gets exactly
    /// one root.
    pub async fn create(&self, data: &CreateEntity) -> AppResult<Entity> {
        if data.file_size < 0 {
            return Err(AppError::invalid_argument(format!(
                "Negative file_size {} for '{}'",
                data.file_size, data.title
            )));
        }

        match data.parent_id {
            Some(parent_id) => {
                let parent = self.get(parent_id).await?;
                if !parent.is_group {
                    return Err(AppError::invalid_argument(format!(
                        "Parent {parent_id} is not a folder"
                    )));
                }
                if parent.team_id != data.team_id {
                    return Err(AppError::corrupt_tree(format!(
                        "Parent {parent_id} belongs to team {}, not {}",
                        parent.team_id, data.team_id
                    )));
                }
            }
            None => {
                if !data.is_group {
                    return Err(AppError::invalid_argument(
                        "A team home folder must be a folder",
                    ));
                }
                let roots: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM entities WHERE team_id = ? AND parent_id IS NULL",
                )
                .bind(data.team_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count team roots", e)
                })?;
                if roots > 0 {
                    return Err(AppError::invalid_argument(format!(
                        "Team {} already has a home folder",
                        data.team_id
                    )));
                }
            }
        }

        let now = Utc::now();
        let id = Uuid::new_v4();
        let entity = sqlx::query_as::<_, Entity>(
            "INSERT INTO entities (id, team_id, parent_id, title, mime_type, file_kind, \
             file_size, is_group, owner_id, is_private, is_active, created_at, modified_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?) RETURNING *",
        )
        .bind(id)
        .bind(data.team_id)
        .bind(data.parent_id)
        .bind(&data.title)
        .bind(&data.mime_type)
        .bind(&data.file_kind)
        .bind(data.file_size)
        .bind(data.is_group)
        .bind(data.owner_id)
        .bind(data.is_private)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to create entity '{}'", data.title),
                e,
            )
        })?;

        info!(entity_id = %entity.id, team_id = %entity.team_id, "Entity created");
        Ok(entity)
    }

    /// Apply a partial update, enforcing re-parent invariants: the new
    /// parent must exist in the same team, be a folder, and must not be the
    /// entity itself or any of its descendants.
    pub async fn update(&self, id: Uuid, update: &UpdateEntity) -> AppResult<Entity> {
        let current = self.get(id).await?;
        if update.is_empty() {
            return Ok(current);
        }

        if let Some(size) = update.file_size {
            if size < 0 {
                return Err(AppError::invalid_argument(format!(
                    "Negative file_size {size} for entity {id}"
                )));
            }
        }

        if let Some(new_parent) = update.parent_id {
            if new_parent == id {
                return Err(AppError::corrupt_tree(format!(
                    "Entity {id} cannot be its own parent"
                )));
            }
            let parent = self.get(new_parent).await?;
            if parent.team_id != current.team_id {
                return Err(AppError::corrupt_tree(format!(
                    "Parent {new_parent} belongs to team {}, not {}",
                    parent.team_id, current.team_id
                )));
            }
            if !parent.is_group {
                return Err(AppError::invalid_argument(format!(
                    "Parent {new_parent} is not a folder"
                )));
            }
            let descendants = self.descendants(id).await?;
            if descendants.iter().any(|e| e.id == new_parent) {
                return Err(AppError::corrupt_tree(format!(
                    "Cannot re-parent {id} under its own descendant {new_parent}"
                )));
            }
        }

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE entities SET ");
        let mut separated = query.separated(", ");

        if let Some(ref title) = update.title {
            separated.push("title = ");
            separated.push_bind_unseparated(title.clone());
        }
        if let Some(parent_id) = update.parent_id {
            separated.push("parent_id = ");
            separated.push_bind_unseparated(parent_id);
        }
        if let Some(file_size) = update.file_size {
            separated.push("file_size = ");
            separated.push_bind_unseparated(file_size);
        }
        if let Some(ref mime_type) = update.mime_type {
            separated.push("mime_type = ");
            separated.push_bind_unseparated(mime_type.clone());
        }
        if let Some(ref file_kind) = update.file_kind {
            separated.push("file_kind = ");
            separated.push_bind_unseparated(file_kind.clone());
        }
        if let Some(is_private) = update.is_private {
            separated.push("is_private = ");
            separated.push_bind_unseparated(is_private);
        }
        separated.push("modified_at = ");
        separated.push_bind_unseparated(Utc::now());

        query.push(" WHERE id = ");
        query.push_bind(id);

        query.build().execute(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, format!("Failed to update entity {id}"), e)
        })?;

        self.get(id).await
    }

    /// Deactivate an entity and every descendant atomically.
    ///
    /// The walk and the flips happen inside one transaction; a cycle
    /// discovered mid-walk aborts and rolls the whole batch back, so no
    /// partial cascade is ever observable. Returns the number of entities
    /// that were active before and are inactive now.
    pub async fn deactivate(&self, id: Uuid) -> AppResult<u64> {
        let root = self.get(id).await?;
        let now = Utc::now();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin deactivation", e)
        })?;

        let mut flipped = 0u64;
        let mut visited: HashSet<Uuid> = HashSet::from([id]);
        let mut queue: VecDeque<Uuid> = VecDeque::from([id]);

        let result = sqlx::query(
            "UPDATE entities SET is_active = 0, modified_at = ? WHERE id = ? AND is_active = 1",
        )
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, format!("Failed to deactivate {id}"), e)
        })?;
        flipped += result.rows_affected();

        while let Some(next) = queue.pop_front() {
            let children: Vec<Uuid> =
                sqlx::query_scalar("SELECT id FROM entities WHERE parent_id = ?")
                    .bind(next)
                    .fetch_all(&mut *tx)
                    .await
                    .map_err(|e| {
                        AppError::with_source(
                            ErrorKind::Database,
                            format!("Failed to list children of {next}"),
                            e,
                        )
                    })?;

            for child in children {
                if !visited.insert(child) {
                    // Dropping the transaction rolls back every flip.
                    return Err(AppError::corrupt_tree(format!(
                        "Cycle detected at entity {child} while deactivating {id}"
                    )));
                }
                let result = sqlx::query(
                    "UPDATE entities SET is_active = 0, modified_at = ? \
                     WHERE id = ? AND is_active = 1",
                )
                .bind(now)
                .bind(child)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Database,
                        format!("Failed to deactivate {child}"),
                        e,
                    )
                })?;
                flipped += result.rows_affected();
                queue.push_back(child);
            }
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit deactivation", e)
        })?;

        info!(entity_id = %root.id, flipped, "Entity deactivated with cascade");
        Ok(flipped)
    }

    /// Find the home folder (root entity) of a team.
    pub async fn home_folder(&self, team_id: Uuid) -> AppResult<Entity> {
        sqlx::query_as::<_, Entity>(
            "SELECT * FROM entities WHERE team_id = ? AND parent_id IS NULL",
        )
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to load home folder of team {team_id}"),
                e,
            )
        })?
        .ok_or_else(|| AppError::not_found(format!("Team {team_id} has no home folder")))
    }
}
