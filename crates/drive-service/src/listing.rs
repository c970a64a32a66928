//! Listing orchestration: request validation, scope resolution, and the
//! hand-off to the listing repository.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use drive_core::error::AppError;
use drive_core::result::AppResult;
use drive_core::types::listing::{
    EntityListing, ListingScope, SharedDirection, SharedListing, Visibility,
};
use drive_core::types::sorting::SortField;
use drive_entity::entity::{EntityView, SharedEntityView};
use drive_store::repositories::{EntityRepository, ListingRepository, TeamRepository};

use crate::context::RequestContext;

/// Applied when a request does not name a row cap.
pub const DEFAULT_LIMIT: i64 = 100;

/// Applied when a files request does not name an order key.
pub const DEFAULT_ORDER: &str = "title";

/// Applied when a shared request does not name an order key.
pub const DEFAULT_SHARED_ORDER: &str = "modified";

/// A raw listing request as a caller would pose it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListFilesRequest {
    /// The team whose tree to list.
    pub team_id: Uuid,
    /// The folder to list; defaults to the team home folder.
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    /// Span the whole team instead of one folder.
    #[serde(default)]
    pub all: bool,
    /// Order key, e.g. `"title"` or `"modified desc"`.
    #[serde(default)]
    pub order_by: Option<String>,
    /// List active entities (true) or the trash view (false).
    #[serde(default = "default_active")]
    pub active: bool,
    /// Only the requester's private entities.
    #[serde(default)]
    pub personal: bool,
    /// Only entities the requester has favourited.
    #[serde(default)]
    pub favourites_only: bool,
    /// Only entities the requester recently interacted with, ordered by
    /// interaction recency.
    #[serde(default)]
    pub recents_only: bool,
    /// Only folders.
    #[serde(default)]
    pub folders_only: bool,
    /// Tag filter, OR semantics.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Mime-type filter, OR semantics.
    #[serde(default)]
    pub mime_types: Vec<String>,
    /// Row cap.
    #[serde(default)]
    pub limit: Option<i64>,
}

fn default_active() -> bool {
    true
}

impl ListFilesRequest {
    /// A plain browse request for one team's home folder.
    pub fn browse(team_id: Uuid) -> Self {
        Self {
            team_id,
            parent_id: None,
            all: false,
            order_by: None,
            active: true,
            personal: false,
            favourites_only: false,
            recents_only: false,
            folders_only: false,
            tags: Vec::new(),
            mime_types: Vec::new(),
            limit: None,
        }
    }
}

/// A raw shared-entities request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSharedRequest {
    /// Shared-by-me or shared-with-me.
    pub direction: SharedDirection,
    /// Tag filter, OR semantics.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Mime-type filter, OR semantics.
    #[serde(default)]
    pub mime_types: Vec<String>,
    /// Order key.
    #[serde(default)]
    pub order_by: Option<String>,
    /// Row cap.
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Validates listing requests and runs them against the store.
#[derive(Debug, Clone)]
pub struct ListingService {
    teams: TeamRepository,
    entities: EntityRepository,
    listings: ListingRepository,
}

impl ListingService {
    /// Create a listing service over the given repositories.
    pub fn new(
        teams: TeamRepository,
        entities: EntityRepository,
        listings: ListingRepository,
    ) -> Self {
        Self {
            teams,
            entities,
            listings,
        }
    }

    /// List a team's entities for the acting user.
    ///
    /// The team must be one the requester belongs to; a team the requester
    /// cannot see reads as absent, not forbidden. Every view is scoped to
    /// one folder (defaulting to the team home folder) unless `all` widens
    /// it to the whole team.
    pub async fn list_files(
        &self,
        ctx: &RequestContext,
        request: &ListFilesRequest,
    ) -> AppResult<Vec<EntityView>> {
        if !self.teams.is_member(request.team_id, ctx.user_id).await? {
            return Err(AppError::not_found(format!(
                "Team {} not found",
                request.team_id
            )));
        }

        let scope = if request.all {
            ListingScope::WholeTeam
        } else {
            let parent = match request.parent_id {
                Some(parent_id) => self.entities.get(parent_id).await?,
                None => self.entities.home_folder(request.team_id).await?,
            };
            if parent.team_id != request.team_id {
                return Err(AppError::not_found(format!(
                    "Folder {} not found in team {}",
                    parent.id, request.team_id
                )));
            }
            if !parent.is_group {
                return Err(AppError::invalid_argument(format!(
                    "Entity {} is not a folder",
                    parent.id
                )));
            }
            ListingScope::Parent(parent.id)
        };

        let order = SortField::parse(request.order_by.as_deref().unwrap_or(DEFAULT_ORDER))?;
        let limit = validate_limit(request.limit)?;
        let spec = EntityListing {
            team_id: request.team_id,
            requester: ctx.user_id,
            scope,
            active: request.active,
            visibility: Visibility::derive(
                request.personal,
                request.favourites_only,
                request.recents_only,
                request.active,
            ),
            favourites_only: request.favourites_only,
            recents_only: request.recents_only,
            folders_only: request.folders_only,
            tags: request.tags.clone(),
            mime_types: request.mime_types.clone(),
            order,
            limit,
        };

        debug!(team_id = %request.team_id, user_id = %ctx.user_id, ?scope, "listing files");
        self.listings.list(&spec).await
    }

    /// List entities the acting user shared out or had shared with them.
    pub async fn list_shared(
        &self,
        ctx: &RequestContext,
        request: &ListSharedRequest,
    ) -> AppResult<Vec<SharedEntityView>> {
        let order = SortField::parse(request.order_by.as_deref().unwrap_or(DEFAULT_SHARED_ORDER))?;
        let limit = validate_limit(request.limit)?;
        let spec = SharedListing {
            requester: ctx.user_id,
            direction: request.direction,
            tags: request.tags.clone(),
            mime_types: request.mime_types.clone(),
            order,
            limit,
        };
        self.listings.shared(&spec).await
    }
}

fn validate_limit(limit: Option<i64>) -> AppResult<i64> {
    match limit {
        None => Ok(DEFAULT_LIMIT),
        Some(limit) if limit > 0 => Ok(limit),
        Some(limit) => Err(AppError::invalid_argument(format!(
            "Limit must be positive, got {limit}"
        ))),
    }
}
