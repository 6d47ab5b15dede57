//! Integration tests for PgStorage.
//! Run with: DATABASE_URL=... cargo test -p onyx-ext-storage -- --ignored pg_

#![allow(clippy::unwrap_used, reason = "integration test code")]

use onyx_ext_core::{
    AccessType, DatabaseConfig, FolderUpdate, NewFolder, NewProductAccess, NewProject, Permission,
    ProjectUpdate,
};
use onyx_ext_storage::traits::{
    AccessStore, FeatureFlagStore, FolderStore, ProjectStore, TrashStore, WorkspaceStore,
};
use onyx_ext_storage::{PgStorage, StorageError};
use serde_json::json;
use sqlx::Connection;
use uuid::Uuid;

async fn create_pg_storage() -> PgStorage {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for PgStorage integration tests");
    PgStorage::new(&DatabaseConfig::Url(url)).await.expect("Failed to connect to PostgreSQL")
}

/// Storage over a fresh schema seeded with `legacy_ddl` before migrations run.
async fn create_legacy_storage(legacy_ddl: &[&str]) -> PgStorage {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for PgStorage integration tests");
    let schema = format!("legacy_{}", Uuid::new_v4().simple());
    let mut conn = sqlx::PgConnection::connect(&url).await.unwrap();
    sqlx::query(&format!("CREATE SCHEMA {schema}")).execute(&mut conn).await.unwrap();
    sqlx::query(&format!("SET search_path TO {schema}")).execute(&mut conn).await.unwrap();
    for ddl in legacy_ddl {
        sqlx::query(ddl).execute(&mut conn).await.unwrap();
    }
    conn.close().await.unwrap();

    let sep = if url.contains('?') { '&' } else { '?' };
    let url = format!("{url}{sep}options=-c%20search_path%3D{schema}");
    PgStorage::new(&DatabaseConfig::Url(url)).await.expect("migrations on legacy schema")
}

fn unique_user() -> String {
    format!("test-{}", Uuid::new_v4())
}

fn new_project(name: &str, folder_id: Option<i64>) -> NewProject {
    NewProject {
        project_name: name.to_owned(),
        product_type: "training_plan".to_owned(),
        microproduct_name: None,
        microproduct_content: json!({"sections": [{"lessons": [{"completionTime": "30m"}]}], "extra": 1}),
        quality_tier: Some("Professional".to_owned()),
        folder_id,
        completion_time: None,
    }
}

fn new_folder(name: &str, parent_id: Option<i64>) -> NewFolder {
    NewFolder { name: name.to_owned(), parent_id, quality_tier: None }
}

#[tokio::test]
#[ignore]
async fn pg_migrations_are_idempotent() {
    let storage = create_pg_storage().await;
    storage.migrate().await.unwrap();
    storage.migrate().await.unwrap();
    storage.ping().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn pg_project_crud_preserves_content_and_canonicalizes_tier() {
    let storage = create_pg_storage().await;
    let user = unique_user();

    let created = storage.create_project(&user, &new_project("Alpha", None)).await.unwrap();
    assert_eq!(created.quality_tier.as_deref(), Some("immersive"));
    assert_eq!(created.microproduct_content["extra"], json!(1));
    assert_eq!(created.order, 0);

    let update = ProjectUpdate {
        project_name: Some("Beta".to_owned()),
        completion_time: Some(45),
        quality_tier: Some(String::new()),
        ..ProjectUpdate::default()
    };
    let updated = storage.update_project(created.id, &update).await.unwrap();
    assert_eq!(updated.project_name, "Beta");
    assert_eq!(updated.completion_time, Some(45));
    assert!(updated.quality_tier.is_none());

    let listed = storage.list_projects(&user, None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
}

#[tokio::test]
#[ignore]
async fn pg_update_unknown_project_is_not_found() {
    let storage = create_pg_storage().await;
    let update = ProjectUpdate { order: Some(3), ..ProjectUpdate::default() };
    let err = storage.update_project(i64::MAX, &update).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
}

#[tokio::test]
#[ignore]
async fn pg_move_project_between_folders() {
    let storage = create_pg_storage().await;
    let user = unique_user();
    let folder = storage.create_folder(&user, &new_folder("F", None)).await.unwrap();
    let project = storage.create_project(&user, &new_project("P", None)).await.unwrap();

    let moved = storage.move_project(project.id, Some(folder.id)).await.unwrap();
    assert_eq!(moved.folder_id, Some(folder.id));
    assert_eq!(storage.list_projects(&user, Some(folder.id)).await.unwrap().len(), 1);

    let back = storage.move_project(project.id, None).await.unwrap();
    assert!(back.folder_id.is_none());
}

#[tokio::test]
#[ignore]
async fn pg_trash_restore_and_purge() {
    let storage = create_pg_storage().await;
    let user = unique_user();
    let folder = storage.create_folder(&user, &new_folder("Gone", None)).await.unwrap();
    let project = storage.create_project(&user, &new_project("T", Some(folder.id))).await.unwrap();

    let trashed = storage.trash_project(project.id).await.unwrap();
    assert_eq!(trashed.project.id, project.id);
    assert!(storage.get_project(project.id).await.unwrap().is_none());
    assert_eq!(storage.list_trash(&user).await.unwrap().len(), 1);

    assert!(storage.delete_folder(folder.id).await.unwrap());
    let restored = storage.restore_project(project.id).await.unwrap();
    assert_eq!(restored.id, project.id);
    assert!(restored.folder_id.is_none());
    assert!(storage.get_trashed(project.id).await.unwrap().is_none());

    storage.trash_project(project.id).await.unwrap();
    assert!(storage.purge_project(project.id).await.unwrap());
    assert!(!storage.purge_project(project.id).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn pg_delete_folder_reparents_children_and_unfiles_projects() {
    let storage = create_pg_storage().await;
    let user = unique_user();
    let root = storage.create_folder(&user, &new_folder("Root", None)).await.unwrap();
    let mid = storage.create_folder(&user, &new_folder("Mid", Some(root.id))).await.unwrap();
    let leaf = storage.create_folder(&user, &new_folder("Leaf", Some(mid.id))).await.unwrap();
    let project = storage.create_project(&user, &new_project("P", Some(mid.id))).await.unwrap();

    assert!(storage.delete_folder(mid.id).await.unwrap());

    let leaf = storage.get_folder(leaf.id).await.unwrap().unwrap();
    assert_eq!(leaf.parent_id, Some(root.id));
    let project = storage.get_project(project.id).await.unwrap().unwrap();
    assert!(project.folder_id.is_none());
}

#[tokio::test]
#[ignore]
async fn pg_update_folder_renames_and_moves_to_root() {
    let storage = create_pg_storage().await;
    let user = unique_user();
    let parent = storage.create_folder(&user, &new_folder("Parent", None)).await.unwrap();
    let child = storage.create_folder(&user, &new_folder("Child", Some(parent.id))).await.unwrap();

    let update = FolderUpdate {
        name: Some("Renamed".to_owned()),
        move_to_root: true,
        quality_tier: Some("starter".to_owned()),
        ..FolderUpdate::default()
    };
    let updated = storage.update_folder(child.id, &update).await.unwrap();
    assert_eq!(updated.name, "Renamed");
    assert!(updated.parent_id.is_none());
    assert_eq!(updated.quality_tier.as_deref(), Some("basic"));
}

#[tokio::test]
#[ignore]
async fn pg_workspace_gets_default_roles_and_admin_creator() {
    let storage = create_pg_storage().await;
    let creator = unique_user();
    let workspace = storage.create_workspace("Team", &creator).await.unwrap();

    let roles = storage.list_roles(workspace.id).await.unwrap();
    let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Admin", "Editor", "Viewer"]);

    let (member, role) = storage.get_membership(workspace.id, &creator).await.unwrap().unwrap();
    assert!(member.is_active());
    assert_eq!(role.name, "Admin");
    assert!(role.allows(Permission::ManageMembers));

    let mine = storage.list_user_workspaces(&creator).await.unwrap();
    assert_eq!(mine.len(), 1);
}

#[tokio::test]
#[ignore]
async fn pg_add_member_rejects_foreign_role() {
    let storage = create_pg_storage().await;
    let a = storage.create_workspace("A", &unique_user()).await.unwrap();
    let b = storage.create_workspace("B", &unique_user()).await.unwrap();
    let foreign_role = storage.list_roles(b.id).await.unwrap()[0].id;

    let err = storage.add_member(a.id, &unique_user(), foreign_role).await.unwrap_err();
    assert!(matches!(err, StorageError::InvalidReference(_)));
}

#[tokio::test]
#[ignore]
async fn pg_add_member_twice_updates_role() {
    let storage = create_pg_storage().await;
    let workspace = storage.create_workspace("W", &unique_user()).await.unwrap();
    let roles = storage.list_roles(workspace.id).await.unwrap();
    let user = unique_user();

    storage.add_member(workspace.id, &user, roles[2].id).await.unwrap();
    let member = storage.add_member(workspace.id, &user, roles[1].id).await.unwrap();
    assert_eq!(member.role_id, roles[1].id);
    assert_eq!(storage.list_members(workspace.id).await.unwrap().len(), 2);

    assert!(storage.remove_member(workspace.id, &user).await.unwrap());
    assert!(storage.memberships_for_user(&user).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn pg_grant_list_and_revoke_access() {
    let storage = create_pg_storage().await;
    let owner = unique_user();
    let workspace = storage.create_workspace("W", &owner).await.unwrap();
    let project = storage.create_project(&owner, &new_project("Shared", None)).await.unwrap();

    let grant = NewProductAccess {
        workspace_id: workspace.id,
        access_type: AccessType::Workspace,
        target_id: None,
    };
    let access = storage.grant_access(project.id, &grant, &owner).await.unwrap();
    assert_eq!(access.access_type, AccessType::Workspace);

    let err = storage.grant_access(project.id, &grant, &owner).await.unwrap_err();
    assert!(err.is_duplicate());

    assert_eq!(storage.list_access(project.id).await.unwrap().len(), 1);
    assert!(storage.revoke_access(project.id, access.id).await.unwrap());
    assert!(storage.list_access(project.id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn pg_feature_flags_upsert() {
    let storage = create_pg_storage().await;
    let user = unique_user();
    assert!(storage.get_flag(&user, "hours_report").await.unwrap().is_none());

    storage.set_flag(&user, "hours_report", true).await.unwrap();
    let flag = storage.set_flag(&user, "hours_report", false).await.unwrap();
    assert!(!flag.is_enabled);

    let flags = storage.list_flags(&user).await.unwrap();
    assert_eq!(flags.len(), 1);
}

#[tokio::test]
#[ignore]
async fn pg_restore_keeps_sharing_grants() {
    let storage = create_pg_storage().await;
    let owner = unique_user();
    let workspace = storage.create_workspace("W", &owner).await.unwrap();
    let project = storage.create_project(&owner, &new_project("Shared", None)).await.unwrap();
    let grant = NewProductAccess {
        workspace_id: workspace.id,
        access_type: AccessType::Workspace,
        target_id: None,
    };
    let access = storage.grant_access(project.id, &grant, &owner).await.unwrap();

    storage.trash_project(project.id).await.unwrap();
    storage.restore_project(project.id).await.unwrap();
    let grants = storage.list_access(project.id).await.unwrap();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].id, access.id);

    storage.trash_project(project.id).await.unwrap();
    assert!(storage.purge_project(project.id).await.unwrap());
    assert!(storage.list_access(project.id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn pg_migrations_upgrade_legacy_tables() {
    let storage = create_legacy_storage(&[
        r#"CREATE TABLE projects (
            id BIGSERIAL PRIMARY KEY,
            onyx_user_id TEXT NOT NULL,
            project_name TEXT NOT NULL,
            product_type TEXT NOT NULL DEFAULT 'lesson_plan',
            microproduct_name TEXT,
            microproduct_content JSONB NOT NULL DEFAULT '{}',
            completion_time TEXT,
            "order" TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"#,
        r#"CREATE TABLE trashed_projects (
            id BIGINT PRIMARY KEY,
            onyx_user_id TEXT NOT NULL,
            project_name TEXT NOT NULL,
            product_type TEXT NOT NULL DEFAULT 'lesson_plan',
            microproduct_name TEXT,
            microproduct_content JSONB NOT NULL DEFAULT '{}',
            completion_time TEXT,
            "order" TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            trashed_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"#,
        r#"INSERT INTO projects (id, onyx_user_id, project_name, completion_time, "order") VALUES
            (1, 'legacy', 'a', '45', '3'),
            (2, 'legacy', 'b', 'soon', NULL),
            (3, 'legacy', 'c', '1h 30m', ' 2 '),
            (4, 'legacy', 'd', '30m', 'x')"#,
        "SELECT setval('projects_id_seq', 4)",
    ])
    .await;

    let minutes: Vec<(Option<i32>, i32)> = storage
        .list_projects("legacy", None)
        .await
        .unwrap()
        .into_iter()
        .map(|p| (p.completion_time, p.order))
        .collect();
    assert_eq!(minutes.len(), 4);
    for expected in [(Some(45), 3), (Some(0), 0), (Some(90), 2), (Some(30), 0)] {
        assert!(minutes.contains(&expected), "missing {expected:?} in {minutes:?}");
    }

    let trashed = storage.trash_project(4).await.unwrap();
    assert_eq!(trashed.project.completion_time, Some(30));
    assert!(trashed.project.quality_tier.is_none());
    let restored = storage.restore_project(4).await.unwrap();
    assert_eq!(restored.project_name, "d");

    storage.migrate().await.unwrap();
}
