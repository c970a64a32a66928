//! Annotated listing row shapes.
//!
//! These are flat so the joined listing SELECTs map straight onto them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::permission::EffectivePermissions;

/// An entity annotated with the requester's resolved rights, favourite
/// marker, and last interaction time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EntityView {
    /// Entity identifier.
    pub id: Uuid,
    /// Owning team.
    pub team_id: Uuid,
    /// Parent folder.
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
    /// Soft-delete flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub modified_at: DateTime<Utc>,
    /// Resolved read right for the requester.
    pub read: bool,
    /// Resolved write right for the requester.
    pub write: bool,
    /// Resolved comment right for the requester.
    pub comment: bool,
    /// Resolved share right for the requester.
    pub share: bool,
    /// Whether the requester has favourited this entity.
    pub is_favourite: bool,
    /// The requester's last interaction with this entity, if any.
    pub last_interaction_at: Option<DateTime<Utc>>,
}

impl EntityView {
    /// The annotated rights as an [`EffectivePermissions`] value.
    pub fn permissions(&self) -> EffectivePermissions {
        EffectivePermissions {
            read: self.read,
            write: self.write,
            comment: self.comment,
            share: self.share,
        }
    }
}

/// An entity row in a shared-by-me / shared-with-me view, annotated with
/// the grant's literal rights and both ends of the share.
///
/// Unlike [`EntityView`], rights here come straight from the grant row with
/// no default fallback: absence of a right means the right is absent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SharedEntityView {
    /// Entity identifier.
    pub id: Uuid,
    /// Owning team.
    pub team_id: Uuid,
    /// Parent folder.
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
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub modified_at: DateTime<Utc>,
    /// The user who issued the grant.
    pub sharer_id: Uuid,
    /// The user the entity is shared with.
    pub recipient_id: Uuid,
    /// Granted read right.
    pub read: bool,
    /// Granted write right.
    pub write: bool,
    /// Granted comment right.
    pub comment: bool,
    /// Granted share right.
    pub share: bool,
}
