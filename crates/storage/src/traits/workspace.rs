use async_trait::async_trait;
use onyx_ext_core::{Permission, Workspace, WorkspaceMember, WorkspaceRole};

use crate::error::StorageError;

/// Workspaces, their roles and members.
#[async_trait]
pub trait WorkspaceStore: Send + Sync {
    /// Create a workspace with the default roles; the creator joins with the
    /// first (all-permissions) role.
    async fn create_workspace(&self, name: &str, creator: &str) -> Result<Workspace, StorageError>;

    async fn get_workspace(&self, id: i64) -> Result<Option<Workspace>, StorageError>;

    /// Workspaces where the user is an active member.
    async fn list_user_workspaces(&self, user_id: &str) -> Result<Vec<Workspace>, StorageError>;

    async fn list_members(&self, workspace_id: i64) -> Result<Vec<WorkspaceMember>, StorageError>;

    /// The user's membership in a workspace together with its role.
    async fn get_membership(
        &self,
        workspace_id: i64,
        user_id: &str,
    ) -> Result<Option<(WorkspaceMember, WorkspaceRole)>, StorageError>;

    async fn memberships_for_user(&self, user_id: &str)
    -> Result<Vec<WorkspaceMember>, StorageError>;

    /// Add or re-activate a member. The role must belong to the workspace.
    async fn add_member(
        &self,
        workspace_id: i64,
        user_id: &str,
        role_id: i64,
    ) -> Result<WorkspaceMember, StorageError>;

    async fn remove_member(&self, workspace_id: i64, user_id: &str) -> Result<bool, StorageError>;

    async fn list_roles(&self, workspace_id: i64) -> Result<Vec<WorkspaceRole>, StorageError>;

    async fn create_role(
        &self,
        workspace_id: i64,
        name: &str,
        permissions: &[Permission],
    ) -> Result<WorkspaceRole, StorageError>;
}
