//! # drive-entity
//!
//! Domain models for Team Drive: the entity tree, permission grants,
//! teams and users, activity markers (favourites/recents), and the
//! storage/quota value objects.

pub mod activity;
pub mod entity;
pub mod permission;
pub mod storage;
pub mod team;
pub mod user;

pub use activity::{Favourite, RecentEntry};
pub use entity::{CreateEntity, Entity, EntityView, SharedEntityView, UpdateEntity};
pub use permission::{EffectivePermissions, PermissionGrant};
pub use storage::{KindUsage, OwnedStorageBreakdown, StorageLimit, StorageQuotaRow};
pub use team::{Team, TeamMember};
pub use user::User;
