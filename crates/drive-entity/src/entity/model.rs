//! Entity model: a file or folder node in a team's tree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A file or folder in a team's entity tree.
///
/// The parent chain is a strict tree: exactly one parent per non-root
/// entity, and the per-team home folder is the only entity with
/// `parent_id = None`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Entity {
    /// Unique entity identifier, immutable.
    pub id: Uuid,
    /// Owning team, immutable after creation.
    pub team_id: Uuid,
    /// Parent folder ID (None only for the team home folder).
    pub parent_id: Option<Uuid>,
    /// Display title.
    pub title: String,
    /// Mime type (empty for folders).
    pub mime_type: String,
    /// Coarse kind bucket used for storage breakdowns ("Image",
    /// "Document", ...).
    pub file_kind: String,
    /// Size in bytes; folders are never charged directly.
    pub file_size: i64,
    /// True iff this entity is a folder.
    pub is_group: bool,
    /// The owning user.
    pub owner_id: Uuid,
    /// Private entities are visible only to their owner unless explicitly
    /// shared.
    pub is_private: bool,
    /// Soft-delete flag; inactive entities are excluded from normal
    /// listings.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub modified_at: DateTime<Utc>,
}

impl Entity {
    /// Check if this is a team home folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Data required to create a new entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntity {
    /// Owning team.
    pub team_id: Uuid,
    /// Parent folder (None only when creating the team home folder).
    pub parent_id: Option<Uuid>,
    /// Display title.
    pub title: String,
    /// Mime type.
    pub mime_type: String,
    /// Kind bucket.
    pub file_kind: String,
    /// Size in bytes.
    pub file_size: i64,
    /// Folder flag.
    pub is_group: bool,
    /// Owning user.
    pub owner_id: Uuid,
    /// Private flag.
    pub is_private: bool,
}

impl CreateEntity {
    /// Convenience constructor for a folder.
    pub fn folder(team_id: Uuid, parent_id: Option<Uuid>, title: &str, owner_id: Uuid) -> Self {
        Self {
            team_id,
            parent_id,
            title: title.to_string(),
            mime_type: String::new(),
            file_kind: "Folder".to_string(),
            file_size: 0,
            is_group: true,
            owner_id,
            is_private: false,
        }
    }
}

/// Partial update for an entity. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEntity {
    /// New title.
    pub title: Option<String>,
    /// New parent folder; validated against the tree invariants.
    pub parent_id: Option<Uuid>,
    /// New size in bytes.
    pub file_size: Option<i64>,
    /// New mime type.
    pub mime_type: Option<String>,
    /// New kind bucket.
    pub file_kind: Option<String>,
    /// New private flag.
    pub is_private: Option<bool>,
}

impl UpdateEntity {
    /// Check if no fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.parent_id.is_none()
            && self.file_size.is_none()
            && self.mime_type.is_none()
            && self.file_kind.is_none()
            && self.is_private.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_constructor() {
        let team = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let folder = CreateEntity::folder(team, None, "Home", owner);
        assert!(folder.is_group);
        assert_eq!(folder.file_size, 0);
        assert_eq!(folder.parent_id, None);
        assert!(!folder.is_private);
    }

    #[test]
    fn test_update_is_empty() {
        assert!(UpdateEntity::default().is_empty());
        let update = UpdateEntity {
            title: Some("renamed".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
