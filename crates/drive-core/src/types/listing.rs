//! Typed listing specifications.
//!
//! Each filter dimension (scope, visibility, tags, mime types, favourites,
//! recents, folders) is an independent field consumed by a single
//! parametrized query builder in the store crate, replacing ad-hoc
//! conditional query chaining.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::sorting::SortField;

/// Which slice of the tree a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingScope {
    /// Direct children of one folder.
    Parent(Uuid),
    /// Every entity in the team, regardless of parent.
    WholeTeam,
}

/// Visibility predicate for a listing. The variants are mutually exclusive
/// by request mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Only the requester's private entities (`personal` mode).
    Personal,
    /// Public entities plus the requester's own, public or not. Used for
    /// favourites, recents, and trash views.
    OwnOrPublic,
    /// Public entities only (the default browse mode).
    Public,
}

impl Visibility {
    /// Derive the visibility predicate from the request flags, mirroring
    /// the mutually-exclusive precedence of the listing contract.
    pub fn derive(personal: bool, favourites_only: bool, recents_only: bool, active: bool) -> Self {
        if personal {
            Self::Personal
        } else if favourites_only || recents_only || !active {
            Self::OwnOrPublic
        } else {
            Self::Public
        }
    }
}

/// A fully-validated listing request consumed by the listing repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityListing {
    /// The team whose tree is being listed.
    pub team_id: Uuid,
    /// The user the results are annotated for.
    pub requester: Uuid,
    /// Parent-scoped or whole-team listing.
    pub scope: ListingScope,
    /// Requested active flag; `false` lists the trash view.
    pub active: bool,
    /// Visibility predicate.
    pub visibility: Visibility,
    /// Restrict to entities the requester has favourited.
    pub favourites_only: bool,
    /// Restrict to entities the requester has recently interacted with.
    /// Forces `last_interaction_at DESC` ordering.
    pub recents_only: bool,
    /// Restrict to folders.
    pub folders_only: bool,
    /// Keep entities carrying at least one of these tags (OR semantics).
    /// Empty means no tag filtering.
    pub tags: Vec<String>,
    /// Keep entities whose mime type is in this set (OR semantics).
    /// Empty means no mime filtering.
    pub mime_types: Vec<String>,
    /// Order key, already validated against the sortable-field whitelist.
    pub order: SortField,
    /// Maximum number of rows returned.
    pub limit: i64,
}

/// Direction of a shared-entities listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharedDirection {
    /// Entities the requester shared out (grants they issued).
    ByMe,
    /// Entities shared with the requester (grants naming them).
    WithMe,
}

/// A validated shared-entities request consumed by the listing repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedListing {
    /// The user the view is anchored on.
    pub requester: Uuid,
    /// Shared-by-me or shared-with-me.
    pub direction: SharedDirection,
    /// Tag filter, OR semantics, empty disables.
    pub tags: Vec<String>,
    /// Mime-type filter, OR semantics, empty disables.
    pub mime_types: Vec<String>,
    /// Order key, already validated.
    pub order: SortField,
    /// Maximum number of rows returned.
    pub limit: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_precedence() {
        assert_eq!(Visibility::derive(true, true, false, true), Visibility::Personal);
        assert_eq!(
            Visibility::derive(false, true, false, true),
            Visibility::OwnOrPublic
        );
        assert_eq!(
            Visibility::derive(false, false, true, true),
            Visibility::OwnOrPublic
        );
        // Trash view widens visibility to own-or-public.
        assert_eq!(
            Visibility::derive(false, false, false, false),
            Visibility::OwnOrPublic
        );
        assert_eq!(Visibility::derive(false, false, false, true), Visibility::Public);
    }
}
