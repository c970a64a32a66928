//! The parametrized listing query builder.
//!
//! One builder consumes the typed listing specification; every filter
//! dimension (scope, visibility, read-gate, tags, mime types, folders,
//! favourites, recents) contributes an independent predicate. Rights are
//! annotated inline via COALESCE over the requester's grant row: read,
//! comment, and share default to granted, write defaults to ownership.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use drive_core::error::{AppError, ErrorKind};
use drive_core::result::AppResult;
use drive_core::types::listing::{EntityListing, ListingScope, SharedDirection, SharedListing, Visibility};
use drive_core::types::sorting::SortField;
use drive_entity::entity::{EntityView, SharedEntityView};

/// Entity columns selected by both listing queries.
const ENTITY_COLUMNS: &str = "e.id, e.team_id, e.parent_id, e.title, e.mime_type, e.file_kind, \
     e.file_size, e.is_group, e.owner_id, e.is_private, e.is_active, e.created_at, e.modified_at";

/// Repository answering filtered, ordered, annotated listing queries.
#[derive(Debug, Clone)]
pub struct ListingRepository {
    pool: SqlitePool,
}

impl ListingRepository {
    /// Create a new listing repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List entities per the given specification, annotated with resolved
    /// rights, the favourite marker, and the last interaction time.
    pub async fn list(&self, spec: &EntityListing) -> AppResult<Vec<EntityView>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT ");
        query.push(ENTITY_COLUMNS);

        query.push(
            ", COALESCE(g.can_read, 1) AS read\
             , COALESCE(g.can_comment, 1) AS comment\
             , COALESCE(g.can_share, 1) AS share\
             , COALESCE(g.can_write, e.owner_id = ",
        );
        query.push_bind(spec.requester);
        query.push(") AS write");
        query.push(", f.user_id IS NOT NULL AS is_favourite");
        query.push(", r.last_interaction_at AS last_interaction_at");

        query.push(" FROM entities e");
        query.push(" LEFT JOIN permission_grants g ON g.entity_id = e.id AND g.user_id = ");
        query.push_bind(spec.requester);

        // Favourites and recents flip to inner joins when the listing is
        // restricted to them.
        query.push(if spec.favourites_only {
            " INNER JOIN favourites f"
        } else {
            " LEFT JOIN favourites f"
        });
        query.push(" ON f.entity_id = e.id AND f.user_id = ");
        query.push_bind(spec.requester);

        query.push(if spec.recents_only {
            " INNER JOIN recents r"
        } else {
            " LEFT JOIN recents r"
        });
        query.push(" ON r.entity_id = e.id AND r.user_id = ");
        query.push_bind(spec.requester);

        query.push(" WHERE e.is_active = ");
        query.push_bind(spec.active);

        match spec.scope {
            ListingScope::WholeTeam => {
                query.push(" AND e.team_id = ");
                query.push_bind(spec.team_id);
            }
            ListingScope::Parent(parent_id) => {
                query.push(" AND e.parent_id = ");
                query.push_bind(parent_id);
            }
        }

        match spec.visibility {
            Visibility::Personal => {
                query.push(" AND e.is_private = 1 AND e.owner_id = ");
                query.push_bind(spec.requester);
            }
            Visibility::OwnOrPublic => {
                query.push(" AND (e.is_private = 0 OR e.owner_id = ");
                query.push_bind(spec.requester);
                query.push(")");
            }
            Visibility::Public => {
                query.push(" AND e.is_private = 0");
            }
        }

        query.push(" AND COALESCE(g.can_read, 1) = 1");

        push_tag_filter(&mut query, &spec.tags);
        push_mime_filter(&mut query, &spec.mime_types);

        if spec.folders_only {
            query.push(" AND e.is_group = 1");
        }

        if spec.recents_only {
            // Recents ordering overrides the caller-requested order key.
            query.push(" ORDER BY r.last_interaction_at DESC, e.id ASC");
        } else {
            let column = order_column(&spec.order)?;
            query.push(format!(
                " ORDER BY {column} {}, e.id ASC",
                spec.order.direction.as_sql()
            ));
        }

        query.push(" LIMIT ");
        query.push_bind(spec.limit);

        query
            .build_query_as::<EntityView>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Listing query failed for team {}", spec.team_id),
                    e,
                )
            })
    }

    /// List entities joined through explicit grant rows: shared out by the
    /// requester or shared with them. Rights come straight from the grant
    /// with no default fallback.
    pub async fn shared(&self, spec: &SharedListing) -> AppResult<Vec<SharedEntityView>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT ");
        query.push(ENTITY_COLUMNS);
        query.push(
            ", g.granted_by AS sharer_id\
             , g.user_id AS recipient_id\
             , COALESCE(g.can_read, 0) AS read\
             , COALESCE(g.can_write, 0) AS write\
             , COALESCE(g.can_comment, 0) AS comment\
             , COALESCE(g.can_share, 0) AS share",
        );
        query.push(" FROM permission_grants g INNER JOIN entities e ON e.id = g.entity_id");
        query.push(" WHERE g.can_read = 1 AND e.is_active = 1");

        match spec.direction {
            SharedDirection::ByMe => {
                query.push(" AND g.granted_by = ");
            }
            SharedDirection::WithMe => {
                query.push(" AND g.user_id = ");
            }
        }
        query.push_bind(spec.requester);

        push_tag_filter(&mut query, &spec.tags);
        push_mime_filter(&mut query, &spec.mime_types);

        let column = order_column(&spec.order)?;
        query.push(format!(
            " ORDER BY {column} {}, e.id ASC",
            spec.order.direction.as_sql()
        ));

        query.push(" LIMIT ");
        query.push_bind(spec.limit);

        query
            .build_query_as::<SharedEntityView>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Shared listing query failed for user {}", spec.requester),
                    e,
                )
            })
    }
}

/// Keep rows carrying at least one of the given tags (OR semantics).
///
/// An EXISTS subquery keeps an entity carrying several matching tags to a
/// single result row.
fn push_tag_filter(query: &mut QueryBuilder<'_, Sqlite>, tags: &[String]) {
    if tags.is_empty() {
        return;
    }
    query.push(" AND EXISTS (SELECT 1 FROM entity_tags t WHERE t.entity_id = e.id AND t.tag IN (");
    {
        let mut separated = query.separated(", ");
        for tag in tags {
            separated.push_bind(tag.clone());
        }
    }
    query.push("))");
}

/// Keep rows whose mime type is in the given set (OR semantics).
fn push_mime_filter(query: &mut QueryBuilder<'_, Sqlite>, mime_types: &[String]) {
    if mime_types.is_empty() {
        return;
    }
    query.push(" AND e.mime_type IN (");
    {
        let mut separated = query.separated(", ");
        for mime in mime_types {
            separated.push_bind(mime.clone());
        }
    }
    query.push(")");
}

/// Map a validated order key onto a sortable column.
///
/// The whitelist keeps caller-supplied order keys out of the SQL text.
fn order_column(order: &SortField) -> AppResult<&'static str> {
    match order.field.as_str() {
        "title" => Ok("e.title"),
        "modified" | "modified_at" => Ok("e.modified_at"),
        "created" | "created_at" => Ok("e.created_at"),
        "file_size" | "size" => Ok("e.file_size"),
        "mime_type" => Ok("e.mime_type"),
        "file_kind" => Ok("e.file_kind"),
        other => Err(AppError::invalid_argument(format!(
            "Unsupported order field '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drive_core::types::sorting::SortDirection;

    #[test]
    fn test_order_column_whitelist() {
        assert_eq!(order_column(&SortField::asc("title")).unwrap(), "e.title");
        assert_eq!(
            order_column(&SortField::desc("modified")).unwrap(),
            "e.modified_at"
        );
        let err = order_column(&SortField::new("owner_id; DROP TABLE", SortDirection::Asc))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }
}
