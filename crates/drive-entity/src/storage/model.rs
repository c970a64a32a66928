//! Storage accounting value objects.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::entity::Entity;

/// The resolved storage ceiling for a user, in bytes.
///
/// `limit` is the plan-derived or default ceiling. `quota` is reported in
/// addition when per-user quota enforcement is enabled and a quota row
/// exists for the user; a configured plan limit suppresses it entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLimit {
    /// Plan-derived or default ceiling in bytes.
    pub limit: i64,
    /// Per-user configured quota in bytes, when applicable.
    pub quota: Option<i64>,
}

/// A per-user configured quota row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StorageQuotaRow {
    /// The user the quota applies to.
    pub user_id: Uuid,
    /// Configured ceiling in MiB.
    pub limit_mib: i64,
}

/// Aggregate bytes per file kind.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct KindUsage {
    /// The kind bucket ("Image", "Document", ...).
    pub file_kind: String,
    /// Total bytes consumed by active files of this kind.
    pub total_bytes: i64,
}

/// A user's owned files ordered by size plus their per-kind totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnedStorageBreakdown {
    /// Active owned files, largest first.
    pub entities: Vec<Entity>,
    /// Per-kind aggregate bytes.
    pub totals_by_kind: Vec<KindUsage>,
}
