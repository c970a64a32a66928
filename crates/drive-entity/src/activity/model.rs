//! Per-user activity markers: favourites and recents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A (entity, user) favourite marker, unique per pair. Carries no ordering
/// semantics beyond insertion.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Favourite {
    /// The favourited entity.
    pub entity_id: Uuid,
    /// The user who favourited it.
    pub user_id: Uuid,
    /// When the marker was created.
    pub created_at: DateTime<Utc>,
}

/// The requester's last interaction with an entity. One row per
/// (entity, user) pair, updated in place on repeat access.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecentEntry {
    /// The accessed entity.
    pub entity_id: Uuid,
    /// The accessing user.
    pub user_id: Uuid,
    /// Timestamp of the most recent interaction.
    pub last_interaction_at: DateTime<Utc>,
}
