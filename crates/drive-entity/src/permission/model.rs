//! Permission grant and resolved-rights models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An explicit per-user permission override on one entity.
///
/// Each field is independently nullable: a null field falls through to the
/// ownership/team defaults for that field only. Grants do not inherit from
/// parent folders.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PermissionGrant {
    /// The entity the grant applies to.
    pub entity_id: Uuid,
    /// The user the grant applies to.
    pub user_id: Uuid,
    /// The user who issued the grant (the sharer).
    pub granted_by: Uuid,
    /// Read override.
    pub can_read: Option<bool>,
    /// Write override.
    pub can_write: Option<bool>,
    /// Comment override.
    pub can_comment: Option<bool>,
    /// Share override.
    pub can_share: Option<bool>,
    /// When the grant was issued.
    pub created_at: DateTime<Utc>,
}

/// Effective read/write/comment/share rights for a (user, entity) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectivePermissions {
    /// Whether the user may read the entity.
    pub read: bool,
    /// Whether the user may modify the entity.
    pub write: bool,
    /// Whether the user may comment on the entity.
    pub comment: bool,
    /// Whether the user may share the entity onward.
    pub share: bool,
}

impl EffectivePermissions {
    /// Full rights (owner).
    pub fn full() -> Self {
        Self {
            read: true,
            write: true,
            comment: true,
            share: true,
        }
    }

    /// Read/comment/share without write (team-member default on a
    /// non-private entity).
    pub fn member_default() -> Self {
        Self {
            read: true,
            write: false,
            comment: true,
            share: true,
        }
    }

    /// No rights at all (outsider).
    pub fn none() -> Self {
        Self {
            read: false,
            write: false,
            comment: false,
            share: false,
        }
    }
}
