//! PostgreSQL storage backend using sqlx.
//!
//! Split into modular files by domain concern.

mod access;
mod feature_flags;
mod folders;
mod projects;
mod trash;
mod workspaces;

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use onyx_ext_core::{
    AccessType, DatabaseConfig, FeatureFlag, Folder, Permission, ProductAccess, Project,
    TrashedProject, Workspace, WorkspaceMember, WorkspaceRole, PG_POOL_ACQUIRE_TIMEOUT_SECS,
    PG_POOL_IDLE_TIMEOUT_SECS, PG_POOL_MAX_CONNECTIONS,
};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

use crate::error::StorageError;
use crate::pg_migrations::run_pg_migrations;

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Connect and run migrations.
    pub async fn new(config: &DatabaseConfig) -> Result<Self, StorageError> {
        let storage = Self::connect(config).await?;
        storage.migrate().await?;
        tracing::info!("PgStorage initialized");
        Ok(storage)
    }

    /// Connect without touching the schema.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StorageError> {
        let pool = pool_options().connect_with(connect_options(config)?).await?;
        Ok(Self { pool })
    }

    /// Pool that opens connections on first use.
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self, StorageError> {
        Ok(Self { pool: pool_options().connect_lazy_with(connect_options(config)?) })
    }

    pub async fn migrate(&self) -> Result<(), StorageError> {
        run_pg_migrations(&self.pool).await.map_err(|e| StorageError::Migration(e.to_string()))
    }

    /// Cheap connectivity probe for readiness checks.
    pub async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, StorageError> {
    Ok(match config {
        DatabaseConfig::Url(url) => PgConnectOptions::from_str(url)?,
        DatabaseConfig::Parts { host, port, name, user, password } => PgConnectOptions::new()
            .host(host)
            .port(*port)
            .database(name)
            .username(user)
            .password(password),
    })
}

fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(PG_POOL_MAX_CONNECTIONS)
        .acquire_timeout(Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
        .idle_timeout(Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
        .test_before_acquire(true)
}

pub(crate) const PROJECT_COLUMNS: &str = r#"id, onyx_user_id, project_name, product_type,
     microproduct_name, microproduct_content, quality_tier, folder_id, completion_time,
     "order", created_at"#;

pub(crate) const FOLDER_COLUMNS: &str =
    r#"id, onyx_user_id, name, parent_id, quality_tier, "order", created_at"#;

pub(crate) const ACCESS_COLUMNS: &str =
    "id, product_id, workspace_id, access_type, target_id, granted_by, created_at";

pub(crate) const MEMBER_COLUMNS: &str = "id, workspace_id, user_id, role_id, status, created_at";

pub(crate) fn row_to_project(row: &PgRow) -> Result<Project, StorageError> {
    Ok(Project {
        id: row.try_get("id")?,
        onyx_user_id: row.try_get("onyx_user_id")?,
        project_name: row.try_get("project_name")?,
        product_type: row.try_get("product_type")?,
        microproduct_name: row.try_get("microproduct_name")?,
        microproduct_content: row.try_get("microproduct_content")?,
        quality_tier: row.try_get("quality_tier")?,
        folder_id: row.try_get("folder_id")?,
        completion_time: row.try_get("completion_time")?,
        order: row.try_get("order")?,
        created_at: row.try_get("created_at")?,
    })
}

pub(crate) fn row_to_trashed(row: &PgRow) -> Result<TrashedProject, StorageError> {
    let trashed_at: DateTime<Utc> = row.try_get("trashed_at")?;
    Ok(TrashedProject { project: row_to_project(row)?, trashed_at })
}

pub(crate) fn row_to_folder(row: &PgRow) -> Result<Folder, StorageError> {
    Ok(Folder {
        id: row.try_get("id")?,
        onyx_user_id: row.try_get("onyx_user_id")?,
        name: row.try_get("name")?,
        parent_id: row.try_get("parent_id")?,
        quality_tier: row.try_get("quality_tier")?,
        order: row.try_get("order")?,
        created_at: row.try_get("created_at")?,
    })
}

pub(crate) fn row_to_access(row: &PgRow) -> Result<ProductAccess, StorageError> {
    let access_type_str: String = row.try_get("access_type")?;
    let access_type = AccessType::from_str(&access_type_str).map_err(|e| {
        StorageError::DataCorruption {
            context: format!("product_access.access_type = {access_type_str}"),
            source: Box::new(e),
        }
    })?;
    Ok(ProductAccess {
        id: row.try_get("id")?,
        product_id: row.try_get("product_id")?,
        workspace_id: row.try_get("workspace_id")?,
        access_type,
        target_id: row.try_get("target_id")?,
        granted_by: row.try_get("granted_by")?,
        created_at: row.try_get("created_at")?,
    })
}

pub(crate) fn row_to_workspace(row: &PgRow) -> Result<Workspace, StorageError> {
    Ok(Workspace {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        created_by: row.try_get("created_by")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Parse role permissions, skipping unknown entries instead of failing.
pub(crate) fn parse_permissions(value: &serde_json::Value) -> Vec<Permission> {
    let raw: Vec<String> = serde_json::from_value(value.clone()).unwrap_or_default();
    raw.iter()
        .filter_map(|p| match p.parse::<Permission>() {
            Ok(perm) => Some(perm),
            Err(_) => {
                tracing::warn!(permission = %p, "unknown permission in DB, skipping");
                None
            },
        })
        .collect()
}

pub(crate) fn permissions_to_value(permissions: &[Permission]) -> serde_json::Value {
    serde_json::Value::Array(
        permissions.iter().map(|p| serde_json::Value::String(p.as_str().to_owned())).collect(),
    )
}

pub(crate) fn row_to_role(row: &PgRow) -> Result<WorkspaceRole, StorageError> {
    let permissions: serde_json::Value = row.try_get("permissions")?;
    Ok(WorkspaceRole {
        id: row.try_get("id")?,
        workspace_id: row.try_get("workspace_id")?,
        name: row.try_get("name")?,
        permissions: parse_permissions(&permissions),
    })
}

pub(crate) fn row_to_member(row: &PgRow) -> Result<WorkspaceMember, StorageError> {
    Ok(WorkspaceMember {
        id: row.try_get("id")?,
        workspace_id: row.try_get("workspace_id")?,
        user_id: row.try_get("user_id")?,
        role_id: row.try_get("role_id")?,
        status: row.try_get("status")?,
        created_at: row.try_get("created_at")?,
    })
}

pub(crate) fn row_to_flag(row: &PgRow) -> Result<FeatureFlag, StorageError> {
    Ok(FeatureFlag {
        user_id: row.try_get("user_id")?,
        feature_name: row.try_get("feature_name")?,
        is_enabled: row.try_get("is_enabled")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Normalize a tier before storing it: blank clears, anything else is kept
/// in canonical form when recognized and verbatim otherwise.
pub(crate) fn stored_tier(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    Some(raw.parse::<onyx_ext_core::QualityTier>().map_or_else(
        |_| {
            tracing::warn!(tier = %raw, "storing unrecognized quality tier verbatim");
            raw.to_owned()
        },
        |t| t.as_str().to_owned(),
    ))
}
