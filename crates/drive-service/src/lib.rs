//! # drive-service
//!
//! Orchestration layer: request validation, identity threading, and the
//! wiring of repositories, the permission resolver, and the quota
//! accountant into callable services.

pub mod context;
pub mod listing;
pub mod storage;

pub use context::RequestContext;
pub use listing::{ListFilesRequest, ListSharedRequest, ListingService};
pub use storage::StorageService;

use drive_access::PermissionResolver;
use drive_core::config::AppConfig;
use drive_quota::QuotaAccountant;
use drive_store::DatabasePool;
use drive_store::repositories::{
    EntityRepository, GrantRepository, ListingRepository, QuotaRepository, TeamRepository,
    UserRepository,
};

/// The fully-wired service set for one database.
#[derive(Debug, Clone)]
pub struct AppServices {
    /// Listing orchestration.
    pub listing: ListingService,
    /// Storage reporting and admission.
    pub storage: StorageService,
    /// Per-entity permission resolution.
    pub access: PermissionResolver,
}

impl AppServices {
    /// Wire every service over one pool using the loaded configuration.
    pub fn new(db: &DatabasePool, config: &AppConfig) -> Self {
        let pool = db.pool().clone();
        let listing = ListingService::new(
            TeamRepository::new(pool.clone()),
            EntityRepository::new(pool.clone()),
            ListingRepository::new(pool.clone()),
        );
        let storage = StorageService::new(QuotaAccountant::new(
            config.quota.clone(),
            QuotaRepository::new(pool.clone()),
        ));
        let access = PermissionResolver::new(
            GrantRepository::new(pool.clone()),
            TeamRepository::new(pool.clone()),
            UserRepository::new(pool),
        );
        Self {
            listing,
            storage,
            access,
        }
    }
}
