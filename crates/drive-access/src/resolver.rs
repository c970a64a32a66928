//! Per-field permission resolution.
//!
//! Precedence, per field: explicit grant override, then the relationship
//! default. Owners get everything; team members get read/comment/share on
//! non-private entities; everyone else gets nothing. Grants never inherit
//! from parent folders.

use tracing::debug;
use uuid::Uuid;

use drive_core::error::AppError;
use drive_core::result::AppResult;
use drive_entity::entity::Entity;
use drive_entity::permission::EffectivePermissions;
use drive_store::repositories::{GrantRepository, TeamRepository, UserRepository};

/// Resolves effective rights for (user, entity) pairs.
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    grants: GrantRepository,
    teams: TeamRepository,
    users: UserRepository,
}

impl PermissionResolver {
    /// Create a new resolver over the given repositories.
    pub fn new(grants: GrantRepository, teams: TeamRepository, users: UserRepository) -> Self {
        Self {
            grants,
            teams,
            users,
        }
    }

    /// Resolve the effective rights of a user on one entity.
    ///
    /// Fails with `UNKNOWN_USER` when the id does not name a known
    /// principal; an unknown user is an error, not an outsider with no
    /// rights.
    pub async fn resolve(&self, entity: &Entity, user_id: Uuid) -> AppResult<EffectivePermissions> {
        if !self.users.exists(user_id).await? {
            return Err(AppError::unknown_user(format!(
                "User {user_id} is not a known principal"
            )));
        }

        let defaults = if entity.owner_id == user_id {
            EffectivePermissions::full()
        } else if !entity.is_private && self.teams.is_member(entity.team_id, user_id).await? {
            EffectivePermissions::member_default()
        } else {
            EffectivePermissions::none()
        };

        let grant = self.grants.find(entity.id, user_id).await?;
        let resolved = match grant {
            Some(grant) => EffectivePermissions {
                read: grant.can_read.unwrap_or(defaults.read),
                write: grant.can_write.unwrap_or(defaults.write),
                comment: grant.can_comment.unwrap_or(defaults.comment),
                share: grant.can_share.unwrap_or(defaults.share),
            },
            None => defaults,
        };

        debug!(
            entity_id = %entity.id,
            user_id = %user_id,
            read = resolved.read,
            write = resolved.write,
            "resolved permissions"
        );
        Ok(resolved)
    }

    /// Resolve and require read access, for gating fetch-style operations.
    pub async fn require_read(&self, entity: &Entity, user_id: Uuid) -> AppResult<EffectivePermissions> {
        let permissions = self.resolve(entity, user_id).await?;
        if !permissions.read {
            return Err(AppError::forbidden(format!(
                "User {user_id} may not read entity {}",
                entity.id
            )));
        }
        Ok(permissions)
    }
}
