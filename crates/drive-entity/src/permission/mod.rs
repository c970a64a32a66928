//! Permission grant models.

pub mod model;

pub use model::{EffectivePermissions, PermissionGrant};
