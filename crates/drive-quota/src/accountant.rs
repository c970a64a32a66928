//! Storage ceiling resolution and admission checks.
//!
//! All limits are configured in MiB and converted to bytes with base-1024
//! units. A plan-derived limit wins outright over everything else; the
//! per-user quota row only participates when enforcement is switched on.

use tracing::debug;
use uuid::Uuid;

use drive_core::config::QuotaConfig;
use drive_core::error::AppError;
use drive_core::result::AppResult;
use drive_entity::storage::{KindUsage, OwnedStorageBreakdown, StorageLimit};
use drive_store::repositories::QuotaRepository;

const BYTES_PER_MIB: i64 = 1024 * 1024;

/// Resolves storage ceilings and admits (or rejects) incoming bytes.
#[derive(Debug, Clone)]
pub struct QuotaAccountant {
    config: QuotaConfig,
    repository: QuotaRepository,
}

impl QuotaAccountant {
    /// Create an accountant from the loaded quota configuration.
    pub fn new(config: QuotaConfig, repository: QuotaRepository) -> Self {
        Self { config, repository }
    }

    /// Total bytes consumed by a user's active files.
    pub async fn usage_by_owner(&self, owner_id: Uuid) -> AppResult<i64> {
        self.repository.usage_by_owner(owner_id).await
    }

    /// Per-kind byte totals for one owner's active files.
    pub async fn usage_by_kind(&self, owner_id: Uuid) -> AppResult<Vec<KindUsage>> {
        self.repository.usage_by_kind(Some(owner_id)).await
    }

    /// Total bytes consumed by all active files across the deployment.
    pub async fn total_usage(&self) -> AppResult<i64> {
        self.repository.total_usage().await
    }

    /// Per-kind byte totals across the deployment.
    pub async fn total_usage_by_kind(&self) -> AppResult<Vec<KindUsage>> {
        self.repository.usage_by_kind(None).await
    }

    /// A user's owned files largest first, with per-kind totals.
    pub async fn owned_breakdown(&self, owner_id: Uuid) -> AppResult<OwnedStorageBreakdown> {
        let entities = self.repository.owned_files(owner_id).await?;
        let totals_by_kind = self.repository.usage_by_kind(Some(owner_id)).await?;
        Ok(OwnedStorageBreakdown {
            entities,
            totals_by_kind,
        })
    }

    /// Resolve the storage ceiling for a user, in bytes.
    ///
    /// A configured plan limit wins outright and suppresses the per-user
    /// quota. Otherwise the default ceiling applies, and the quota row is
    /// reported alongside it when enforcement is enabled.
    pub async fn limit_for(&self, user_id: Uuid) -> AppResult<StorageLimit> {
        if let Some(plan_mib) = self.config.plan_limit_mib {
            return Ok(StorageLimit {
                limit: plan_mib * BYTES_PER_MIB,
                quota: None,
            });
        }

        let quota = if self.config.enforce_user_quota {
            self.repository
                .quota_row(user_id)
                .await?
                .map(|row| row.limit_mib * BYTES_PER_MIB)
        } else {
            None
        };

        Ok(StorageLimit {
            limit: self.config.default_limit_mib * BYTES_PER_MIB,
            quota,
        })
    }

    /// Bytes left under a user's ceiling. Negative when the user is already
    /// over it (a lowered limit does not retroactively delete files).
    pub async fn remaining(&self, user_id: Uuid) -> AppResult<i64> {
        let limit = self.limit_for(user_id).await?;
        let usage = self.repository.usage_by_owner(user_id).await?;
        Ok(limit.limit - usage)
    }

    /// Admit `incoming_bytes` against the user's ceiling, or fail with
    /// `QUOTA_EXCEEDED`. Exactly filling the ceiling is admitted.
    ///
    /// When enforcement is on and a quota row exists, the stricter of the
    /// ceiling and the quota applies.
    pub async fn check_admission(&self, user_id: Uuid, incoming_bytes: i64) -> AppResult<()> {
        if incoming_bytes < 0 {
            return Err(AppError::invalid_argument(format!(
                "Incoming size must be non-negative, got {incoming_bytes}"
            )));
        }

        let resolved = self.limit_for(user_id).await?;
        let ceiling = match resolved.quota {
            Some(quota) => resolved.limit.min(quota),
            None => resolved.limit,
        };
        let usage = self.repository.usage_by_owner(user_id).await?;

        debug!(
            user_id = %user_id,
            usage,
            incoming_bytes,
            ceiling,
            "quota admission check"
        );

        if usage + incoming_bytes > ceiling {
            return Err(AppError::quota_exceeded(format!(
                "Admitting {incoming_bytes} bytes would put user {user_id} at {} of {ceiling} bytes",
                usage + incoming_bytes
            )));
        }
        Ok(())
    }
}
