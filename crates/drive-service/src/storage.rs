//! Storage reporting endpoints: limits, per-user breakdowns, and
//! deployment-wide usage.

use uuid::Uuid;

use drive_core::result::AppResult;
use drive_entity::storage::{KindUsage, OwnedStorageBreakdown, StorageLimit};
use drive_quota::QuotaAccountant;

use crate::context::RequestContext;

/// Read-side storage reporting over the quota accountant.
#[derive(Debug, Clone)]
pub struct StorageService {
    accountant: QuotaAccountant,
}

impl StorageService {
    /// Create a storage service over the given accountant.
    pub fn new(accountant: QuotaAccountant) -> Self {
        Self { accountant }
    }

    /// The acting user's resolved storage ceiling.
    pub async fn storage_limit(&self, ctx: &RequestContext) -> AppResult<StorageLimit> {
        self.accountant.limit_for(ctx.user_id).await
    }

    /// Bytes the acting user has left under their ceiling.
    pub async fn remaining(&self, ctx: &RequestContext) -> AppResult<i64> {
        self.accountant.remaining(ctx.user_id).await
    }

    /// The acting user's owned files largest first, with per-kind totals.
    pub async fn owned_breakdown(&self, ctx: &RequestContext) -> AppResult<OwnedStorageBreakdown> {
        self.accountant.owned_breakdown(ctx.user_id).await
    }

    /// Admit incoming bytes for a user against their ceiling.
    pub async fn check_admission(&self, user_id: Uuid, incoming_bytes: i64) -> AppResult<()> {
        self.accountant.check_admission(user_id, incoming_bytes).await
    }

    /// Total bytes consumed across the deployment.
    pub async fn global_usage(&self) -> AppResult<i64> {
        self.accountant.total_usage().await
    }

    /// Per-kind byte totals across the deployment.
    pub async fn global_usage_by_kind(&self) -> AppResult<Vec<KindUsage>> {
        self.accountant.total_usage_by_kind().await
    }
}
