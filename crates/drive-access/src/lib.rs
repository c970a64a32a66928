//! # drive-access
//!
//! Resolves effective read/write/comment/share rights for a (user, entity)
//! pair from ownership, team membership, visibility, and explicit grants.

pub mod resolver;

pub use resolver::PermissionResolver;
