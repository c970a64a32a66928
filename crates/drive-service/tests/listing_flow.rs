//! End-to-end listing and storage flows over an in-memory database.

use uuid::Uuid;

use drive_core::config::{AppConfig, DatabaseConfig, LoggingConfig, QuotaConfig};
use drive_core::error::ErrorKind;
use drive_core::types::listing::SharedDirection;
use drive_entity::entity::{CreateEntity, Entity};
use drive_entity::user::User;
use drive_service::{AppServices, ListFilesRequest, ListSharedRequest, RequestContext};
use drive_store::DatabasePool;
use drive_store::repositories::{
    ActivityRepository, EntityRepository, GrantRepository, GrantUpdate, TagRepository,
    TeamRepository, UserRepository,
};

struct Fixture {
    db: DatabasePool,
    services: AppServices,
    team_id: Uuid,
    owner: User,
    member: User,
    outsider: User,
    root: Entity,
    folder: Entity,
    file: Entity,
}

fn test_config(quota: QuotaConfig) -> AppConfig {
    AppConfig {
        database: DatabaseConfig {
            path: "sqlite::memory:".into(),
            max_connections: 1,
            connect_timeout_seconds: 10,
        },
        quota,
        logging: LoggingConfig::default(),
    }
}

/// One team: a home folder holding folder "Projects", which holds a
/// 2048-byte document owned by the first member.
async fn fixture(quota: QuotaConfig) -> Fixture {
    let db = DatabasePool::open_in_memory().await.unwrap();
    let users = UserRepository::new(db.pool().clone());
    let teams = TeamRepository::new(db.pool().clone());
    let entities = EntityRepository::new(db.pool().clone());

    let owner = users.create("owner@example.com", "Owner").await.unwrap();
    let member = users.create("member@example.com", "Member").await.unwrap();
    let outsider = users.create("out@example.com", "Outsider").await.unwrap();

    let team = teams.create("Drive Team").await.unwrap();
    teams.add_member(team.id, owner.id).await.unwrap();
    teams.add_member(team.id, member.id).await.unwrap();

    let root = entities
        .create(&CreateEntity::folder(team.id, None, "Home", owner.id))
        .await
        .unwrap();
    let folder = entities
        .create(&CreateEntity::folder(team.id, Some(root.id), "Projects", owner.id))
        .await
        .unwrap();
    let file = entities
        .create(&CreateEntity {
            team_id: team.id,
            parent_id: Some(folder.id),
            title: "report.pdf".into(),
            mime_type: "application/pdf".into(),
            file_kind: "Document".into(),
            file_size: 2048,
            is_group: false,
            owner_id: owner.id,
            is_private: false,
        })
        .await
        .unwrap();

    let services = AppServices::new(&db, &test_config(quota));
    Fixture {
        db,
        services,
        team_id: team.id,
        owner,
        member,
        outsider,
        root,
        folder,
        file,
    }
}

fn add_file(team_id: Uuid, parent: Uuid, title: &str, mime: &str, size: i64, owner: Uuid) -> CreateEntity {
    CreateEntity {
        team_id,
        parent_id: Some(parent),
        title: title.into(),
        mime_type: mime.into(),
        file_kind: "Document".into(),
        file_size: size,
        is_group: false,
        owner_id: owner,
        is_private: false,
    }
}

#[tokio::test]
async fn test_browse_annotates_rights_per_requester() {
    let fx = fixture(QuotaConfig::default()).await;

    let request = ListFilesRequest {
        parent_id: Some(fx.folder.id),
        ..ListFilesRequest::browse(fx.team_id)
    };

    // Owner sees the file with full rights.
    let rows = fx
        .services
        .listing
        .list_files(&RequestContext::new(fx.owner.id), &request)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, fx.file.id);
    assert!(rows[0].write);

    // A plain member sees it too, but without write.
    let rows = fx
        .services
        .listing
        .list_files(&RequestContext::new(fx.member.id), &request)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].read);
    assert!(!rows[0].write);
    assert!(rows[0].comment);
    assert!(rows[0].share);
}

#[tokio::test]
async fn test_browse_defaults_to_home_folder() {
    let fx = fixture(QuotaConfig::default()).await;
    let rows = fx
        .services
        .listing
        .list_files(
            &RequestContext::new(fx.owner.id),
            &ListFilesRequest::browse(fx.team_id),
        )
        .await
        .unwrap();
    // Only the "Projects" folder is a direct child of home.
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, fx.folder.id);
    assert!(rows[0].is_group);
}

#[tokio::test]
async fn test_foreign_team_reads_as_not_found() {
    let fx = fixture(QuotaConfig::default()).await;
    let err = fx
        .services
        .listing
        .list_files(
            &RequestContext::new(fx.outsider.id),
            &ListFilesRequest::browse(fx.team_id),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_listing_a_file_as_parent_is_rejected() {
    let fx = fixture(QuotaConfig::default()).await;
    let err = fx
        .services
        .listing
        .list_files(
            &RequestContext::new(fx.owner.id),
            &ListFilesRequest {
                parent_id: Some(fx.file.id),
                ..ListFilesRequest::browse(fx.team_id)
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn test_revoked_read_hides_rows() {
    let fx = fixture(QuotaConfig::default()).await;
    GrantRepository::new(fx.db.pool().clone())
        .upsert(
            fx.file.id,
            fx.member.id,
            fx.owner.id,
            &GrantUpdate {
                can_read: Some(false),
                ..GrantUpdate::default()
            },
        )
        .await
        .unwrap();

    let rows = fx
        .services
        .listing
        .list_files(
            &RequestContext::new(fx.member.id),
            &ListFilesRequest {
                parent_id: Some(fx.folder.id),
                ..ListFilesRequest::browse(fx.team_id)
            },
        )
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_personal_view_is_private_and_own_only() {
    let fx = fixture(QuotaConfig::default()).await;
    let entities = EntityRepository::new(fx.db.pool().clone());
    let diary = entities
        .create(&CreateEntity {
            is_private: true,
            ..add_file(fx.team_id, fx.folder.id, "diary.md", "text/markdown", 10, fx.owner.id)
        })
        .await
        .unwrap();
    // A private file of another member must not leak in.
    entities
        .create(&CreateEntity {
            is_private: true,
            ..add_file(fx.team_id, fx.folder.id, "theirs.md", "text/markdown", 10, fx.member.id)
        })
        .await
        .unwrap();

    let rows = fx
        .services
        .listing
        .list_files(
            &RequestContext::new(fx.owner.id),
            &ListFilesRequest {
                personal: true,
                all: true,
                ..ListFilesRequest::browse(fx.team_id)
            },
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, diary.id);
}

#[tokio::test]
async fn test_favourites_view_is_a_strict_subset() {
    let fx = fixture(QuotaConfig::default()).await;
    ActivityRepository::new(fx.db.pool().clone())
        .add_favourite(fx.file.id, fx.member.id)
        .await
        .unwrap();

    let rows = fx
        .services
        .listing
        .list_files(
            &RequestContext::new(fx.member.id),
            &ListFilesRequest {
                favourites_only: true,
                parent_id: Some(fx.folder.id),
                ..ListFilesRequest::browse(fx.team_id)
            },
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, fx.file.id);
    assert!(rows[0].is_favourite);

    // The owner favourited nothing.
    let rows = fx
        .services
        .listing
        .list_files(
            &RequestContext::new(fx.owner.id),
            &ListFilesRequest {
                favourites_only: true,
                parent_id: Some(fx.folder.id),
                ..ListFilesRequest::browse(fx.team_id)
            },
        )
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_view_flags_do_not_widen_parent_scope() {
    let fx = fixture(QuotaConfig::default()).await;
    // The file sits two levels below the home folder.
    ActivityRepository::new(fx.db.pool().clone())
        .add_favourite(fx.file.id, fx.owner.id)
        .await
        .unwrap();

    // A favourites view of the home folder must not surface it.
    let rows = fx
        .services
        .listing
        .list_files(
            &RequestContext::new(fx.owner.id),
            &ListFilesRequest {
                favourites_only: true,
                ..ListFilesRequest::browse(fx.team_id)
            },
        )
        .await
        .unwrap();
    assert!(rows.is_empty());

    // Only an explicit `all` widens the scope to the whole team.
    let rows = fx
        .services
        .listing
        .list_files(
            &RequestContext::new(fx.owner.id),
            &ListFilesRequest {
                favourites_only: true,
                all: true,
                ..ListFilesRequest::browse(fx.team_id)
            },
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, fx.file.id);
}

#[tokio::test]
async fn test_recents_ordered_by_interaction_not_order_key() {
    let fx = fixture(QuotaConfig::default()).await;
    let entities = EntityRepository::new(fx.db.pool().clone());
    let older = entities
        .create(&add_file(fx.team_id, fx.folder.id, "a.txt", "text/plain", 1, fx.owner.id))
        .await
        .unwrap();

    let activity = ActivityRepository::new(fx.db.pool().clone());
    let t0 = chrono::Utc::now();
    activity
        .record_interaction(fx.file.id, fx.owner.id, t0)
        .await
        .unwrap();
    activity
        .record_interaction(older.id, fx.owner.id, t0 + chrono::Duration::seconds(5))
        .await
        .unwrap();

    let rows = fx
        .services
        .listing
        .list_files(
            &RequestContext::new(fx.owner.id),
            &ListFilesRequest {
                recents_only: true,
                parent_id: Some(fx.folder.id),
                // The title order key is overridden by interaction recency.
                order_by: Some("title".into()),
                ..ListFilesRequest::browse(fx.team_id)
            },
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, older.id);
    assert_eq!(rows[1].id, fx.file.id);
}

#[tokio::test]
async fn test_tag_filter_is_or_without_duplicates() {
    let fx = fixture(QuotaConfig::default()).await;
    let tags = TagRepository::new(fx.db.pool().clone());
    // Both requested tags on the same entity must still yield one row.
    tags.add(fx.file.id, "finance").await.unwrap();
    tags.add(fx.file.id, "quarterly").await.unwrap();

    let rows = fx
        .services
        .listing
        .list_files(
            &RequestContext::new(fx.owner.id),
            &ListFilesRequest {
                parent_id: Some(fx.folder.id),
                tags: vec!["finance".into(), "quarterly".into()],
                ..ListFilesRequest::browse(fx.team_id)
            },
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, fx.file.id);

    let rows = fx
        .services
        .listing
        .list_files(
            &RequestContext::new(fx.owner.id),
            &ListFilesRequest {
                parent_id: Some(fx.folder.id),
                tags: vec!["missing".into()],
                ..ListFilesRequest::browse(fx.team_id)
            },
        )
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_order_and_limit() {
    let fx = fixture(QuotaConfig::default()).await;
    let entities = EntityRepository::new(fx.db.pool().clone());
    for (title, size) in [("a.txt", 30), ("b.txt", 10), ("c.txt", 20)] {
        entities
            .create(&add_file(fx.team_id, fx.folder.id, title, "text/plain", size, fx.owner.id))
            .await
            .unwrap();
    }

    let rows = fx
        .services
        .listing
        .list_files(
            &RequestContext::new(fx.owner.id),
            &ListFilesRequest {
                parent_id: Some(fx.folder.id),
                order_by: Some("file_size desc".into()),
                limit: Some(2),
                ..ListFilesRequest::browse(fx.team_id)
            },
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].file_size, 2048);
    assert_eq!(rows[1].file_size, 30);
}

#[tokio::test]
async fn test_trash_view_lists_deactivated_entities() {
    let fx = fixture(QuotaConfig::default()).await;
    let entities = EntityRepository::new(fx.db.pool().clone());
    entities.deactivate(fx.folder.id).await.unwrap();

    let ctx = RequestContext::new(fx.owner.id);
    let active = fx
        .services
        .listing
        .list_files(&ctx, &ListFilesRequest::browse(fx.team_id))
        .await
        .unwrap();
    assert!(active.is_empty());

    // Scoped to home, only the folder itself shows up in the trash.
    let trash = fx
        .services
        .listing
        .list_files(
            &ctx,
            &ListFilesRequest {
                active: false,
                ..ListFilesRequest::browse(fx.team_id)
            },
        )
        .await
        .unwrap();
    assert_eq!(trash.len(), 1);
    assert_eq!(trash[0].id, fx.folder.id);

    // The whole-team trash holds the folder and the cascaded file, in the
    // default title order.
    let trash = fx
        .services
        .listing
        .list_files(
            &ctx,
            &ListFilesRequest {
                active: false,
                all: true,
                ..ListFilesRequest::browse(fx.team_id)
            },
        )
        .await
        .unwrap();
    assert_eq!(trash.len(), 2);
    assert!(trash.iter().all(|row| !row.is_active));
    assert_eq!(trash[0].id, fx.folder.id);
    assert_eq!(trash[1].id, fx.file.id);
}

#[tokio::test]
async fn test_shared_views_mirror_each_other() {
    let fx = fixture(QuotaConfig::default()).await;
    GrantRepository::new(fx.db.pool().clone())
        .upsert(
            fx.file.id,
            fx.outsider.id,
            fx.owner.id,
            &GrantUpdate {
                can_read: Some(true),
                can_write: Some(true),
                ..GrantUpdate::default()
            },
        )
        .await
        .unwrap();

    let by_me = fx
        .services
        .listing
        .list_shared(
            &RequestContext::new(fx.owner.id),
            &ListSharedRequest {
                direction: SharedDirection::ByMe,
                tags: Vec::new(),
                mime_types: Vec::new(),
                order_by: None,
                limit: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(by_me.len(), 1);
    assert_eq!(by_me[0].id, fx.file.id);
    assert_eq!(by_me[0].sharer_id, fx.owner.id);
    assert_eq!(by_me[0].recipient_id, fx.outsider.id);
    assert!(by_me[0].write);
    // Null comment coalesces to absent in the shared view.
    assert!(!by_me[0].comment);

    let with_me = fx
        .services
        .listing
        .list_shared(
            &RequestContext::new(fx.outsider.id),
            &ListSharedRequest {
                direction: SharedDirection::WithMe,
                tags: Vec::new(),
                mime_types: Vec::new(),
                order_by: None,
                limit: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(with_me.len(), 1);
    assert_eq!(with_me[0].id, fx.file.id);

    // A grant without read never surfaces in either view.
    let nothing = fx
        .services
        .listing
        .list_shared(
            &RequestContext::new(fx.member.id),
            &ListSharedRequest {
                direction: SharedDirection::WithMe,
                tags: Vec::new(),
                mime_types: Vec::new(),
                order_by: None,
                limit: None,
            },
        )
        .await
        .unwrap();
    assert!(nothing.is_empty());
}

#[tokio::test]
async fn test_storage_reporting_flow() {
    let fx = fixture(QuotaConfig {
        plan_limit_mib: Some(1),
        ..QuotaConfig::default()
    })
    .await;

    let ctx = RequestContext::new(fx.owner.id);
    let limit = fx.services.storage.storage_limit(&ctx).await.unwrap();
    assert_eq!(limit.limit, 1024 * 1024);
    assert_eq!(limit.quota, None);
    assert_eq!(
        fx.services.storage.remaining(&ctx).await.unwrap(),
        1024 * 1024 - 2048
    );

    let breakdown = fx.services.storage.owned_breakdown(&ctx).await.unwrap();
    assert_eq!(breakdown.entities.len(), 1);
    assert_eq!(breakdown.entities[0].id, fx.file.id);
    assert_eq!(breakdown.totals_by_kind.len(), 1);
    assert_eq!(breakdown.totals_by_kind[0].total_bytes, 2048);

    assert_eq!(fx.services.storage.global_usage().await.unwrap(), 2048);

    let err = fx
        .services
        .storage
        .check_admission(fx.owner.id, 2 * 1024 * 1024)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::QuotaExceeded);

    // Deactivating the file releases its bytes.
    EntityRepository::new(fx.db.pool().clone())
        .deactivate(fx.file.id)
        .await
        .unwrap();
    assert_eq!(fx.services.storage.remaining(&ctx).await.unwrap(), 1024 * 1024);
    fx.services
        .storage
        .check_admission(fx.owner.id, 1024 * 1024)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_resolver_reachable_through_services() {
    let fx = fixture(QuotaConfig::default()).await;
    let permissions = fx
        .services
        .access
        .resolve(&fx.file, fx.member.id)
        .await
        .unwrap();
    assert!(permissions.read);
    assert!(!permissions.write);

    assert!(fx.root.is_root());
}
