//! WorkspaceStore implementation for PgStorage.

use async_trait::async_trait;
use onyx_ext_core::{Permission, Workspace, WorkspaceMember, WorkspaceRole, DEFAULT_ROLES};
use sqlx::Row;

use super::{
    parse_permissions, permissions_to_value, row_to_member, row_to_role, row_to_workspace,
    PgStorage, MEMBER_COLUMNS,
};
use crate::error::StorageError;
use crate::traits::WorkspaceStore;

#[async_trait]
impl WorkspaceStore for PgStorage {
    async fn create_workspace(&self, name: &str, creator: &str) -> Result<Workspace, StorageError> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(
            "INSERT INTO workspaces (name, created_by) VALUES ($1, $2)
             RETURNING id, name, created_by, created_at",
        )
        .bind(name.trim())
        .bind(creator)
        .fetch_one(&mut *tx)
        .await?;
        let workspace = row_to_workspace(&row)?;

        let mut owner_role_id = None;
        for (role_name, permissions) in DEFAULT_ROLES {
            let role_id: i64 = sqlx::query_scalar(
                "INSERT INTO workspace_roles (workspace_id, name, permissions)
                 VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(workspace.id)
            .bind(role_name)
            .bind(permissions_to_value(permissions))
            .fetch_one(&mut *tx)
            .await?;
            owner_role_id.get_or_insert(role_id);
        }

        if let Some(role_id) = owner_role_id {
            sqlx::query(
                "INSERT INTO workspace_members (workspace_id, user_id, role_id, status)
                 VALUES ($1, $2, $3, 'active')",
            )
            .bind(workspace.id)
            .bind(creator)
            .bind(role_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::info!(workspace_id = workspace.id, creator, "workspace created");
        Ok(workspace)
    }

    async fn get_workspace(&self, id: i64) -> Result<Option<Workspace>, StorageError> {
        let row = sqlx::query("SELECT id, name, created_by, created_at FROM workspaces WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_workspace).transpose()
    }

    async fn list_user_workspaces(&self, user_id: &str) -> Result<Vec<Workspace>, StorageError> {
        let rows = sqlx::query(
            "SELECT w.id, w.name, w.created_by, w.created_at
             FROM workspaces w
             JOIN workspace_members m ON m.workspace_id = w.id
             WHERE m.user_id = $1 AND m.status = 'active'
             ORDER BY w.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_workspace).collect()
    }

    async fn list_members(&self, workspace_id: i64) -> Result<Vec<WorkspaceMember>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {MEMBER_COLUMNS} FROM workspace_members WHERE workspace_id = $1 ORDER BY id"
        ))
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_member).collect()
    }

    async fn get_membership(
        &self,
        workspace_id: i64,
        user_id: &str,
    ) -> Result<Option<(WorkspaceMember, WorkspaceRole)>, StorageError> {
        let row = sqlx::query(
            "SELECT m.id, m.workspace_id, m.user_id, m.role_id, m.status, m.created_at,
                    r.name AS role_name, r.permissions
             FROM workspace_members m
             JOIN workspace_roles r ON r.id = m.role_id
             WHERE m.workspace_id = $1 AND m.user_id = $2",
        )
        .bind(workspace_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let member = row_to_member(&row)?;
        let permissions: serde_json::Value = row.try_get("permissions")?;
        let role = WorkspaceRole {
            id: member.role_id,
            workspace_id: member.workspace_id,
            name: row.try_get("role_name")?,
            permissions: parse_permissions(&permissions),
        };
        Ok(Some((member, role)))
    }

    async fn memberships_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<WorkspaceMember>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {MEMBER_COLUMNS} FROM workspace_members WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_member).collect()
    }

    async fn add_member(
        &self,
        workspace_id: i64,
        user_id: &str,
        role_id: i64,
    ) -> Result<WorkspaceMember, StorageError> {
        let row = sqlx::query(&format!(
            "INSERT INTO workspace_members (workspace_id, user_id, role_id, status)
             SELECT $1, $2, r.id, 'active' FROM workspace_roles r
             WHERE r.id = $3 AND r.workspace_id = $1
             ON CONFLICT (workspace_id, user_id)
             DO UPDATE SET role_id = EXCLUDED.role_id, status = 'active'
             RETURNING {MEMBER_COLUMNS}"
        ))
        .bind(workspace_id)
        .bind(user_id)
        .bind(role_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            StorageError::InvalidReference(format!(
                "role {role_id} does not belong to workspace {workspace_id}"
            ))
        })?;
        tracing::info!(workspace_id, user_id, role_id, "workspace member added");
        row_to_member(&row)
    }

    async fn remove_member(&self, workspace_id: i64, user_id: &str) -> Result<bool, StorageError> {
        let result =
            sqlx::query("DELETE FROM workspace_members WHERE workspace_id = $1 AND user_id = $2")
                .bind(workspace_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_roles(&self, workspace_id: i64) -> Result<Vec<WorkspaceRole>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, workspace_id, name, permissions FROM workspace_roles
             WHERE workspace_id = $1 ORDER BY id",
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_role).collect()
    }

    async fn create_role(
        &self,
        workspace_id: i64,
        name: &str,
        permissions: &[Permission],
    ) -> Result<WorkspaceRole, StorageError> {
        let row = sqlx::query(
            "INSERT INTO workspace_roles (workspace_id, name, permissions) VALUES ($1, $2, $3)
             RETURNING id, workspace_id, name, permissions",
        )
        .bind(workspace_id)
        .bind(name.trim())
        .bind(permissions_to_value(permissions))
        .fetch_one(&self.pool)
        .await?;
        row_to_role(&row)
    }
}
