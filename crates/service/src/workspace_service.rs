use std::sync::Arc;

use onyx_ext_core::{Permission, UserIdentity, Workspace, WorkspaceMember, WorkspaceRole};
use onyx_ext_storage::traits::WorkspaceStore;

use crate::validation::required_name;
use crate::ServiceError;

#[derive(Clone)]
pub struct WorkspaceService {
    workspaces: Arc<dyn WorkspaceStore>,
}

impl WorkspaceService {
    #[must_use]
    pub fn new(workspaces: Arc<dyn WorkspaceStore>) -> Self {
        Self { workspaces }
    }

    pub async fn list_mine(&self, user: &UserIdentity) -> Result<Vec<Workspace>, ServiceError> {
        Ok(self.workspaces.list_user_workspaces(&user.id).await?)
    }

    pub async fn create(&self, user: &UserIdentity, name: &str) -> Result<Workspace, ServiceError> {
        let name = required_name("name", name)?;
        let workspace = self.workspaces.create_workspace(&name, &user.id).await?;
        tracing::info!(workspace_id = workspace.id, user = %user.id, "workspace created");
        Ok(workspace)
    }

    /// Active members may read; platform admins may read anything. Outsiders
    /// see the workspace as missing.
    async fn require_member(&self, user: &UserIdentity, workspace_id: i64) -> Result<(), ServiceError> {
        if self.workspaces.get_workspace(workspace_id).await?.is_none() {
            return Err(ServiceError::not_found("workspace", workspace_id));
        }
        if user.is_admin() {
            return Ok(());
        }
        match self.workspaces.get_membership(workspace_id, &user.id).await? {
            Some((member, _)) if member.is_active() => Ok(()),
            _ => Err(ServiceError::not_found("workspace", workspace_id)),
        }
    }

    async fn require_permission(
        &self,
        user: &UserIdentity,
        workspace_id: i64,
        permission: Permission,
    ) -> Result<(), ServiceError> {
        self.require_member(user, workspace_id).await?;
        if user.is_admin() {
            return Ok(());
        }
        match self.workspaces.get_membership(workspace_id, &user.id).await? {
            Some((_, role)) if role.allows(permission) => Ok(()),
            _ => Err(ServiceError::Forbidden(format!(
                "{} permission required in workspace {workspace_id}",
                permission.as_str()
            ))),
        }
    }

    pub async fn list_members(
        &self,
        user: &UserIdentity,
        workspace_id: i64,
    ) -> Result<Vec<WorkspaceMember>, ServiceError> {
        self.require_member(user, workspace_id).await?;
        Ok(self.workspaces.list_members(workspace_id).await?)
    }

    pub async fn add_member(
        &self,
        user: &UserIdentity,
        workspace_id: i64,
        member_id: &str,
        role_id: i64,
    ) -> Result<WorkspaceMember, ServiceError> {
        self.require_permission(user, workspace_id, Permission::ManageMembers).await?;
        let member_id = required_name("user_id", member_id)?;
        let member = self.workspaces.add_member(workspace_id, &member_id, role_id).await?;
        tracing::info!(workspace_id, member = %member_id, role_id, "workspace member added");
        Ok(member)
    }

    pub async fn remove_member(
        &self,
        user: &UserIdentity,
        workspace_id: i64,
        member_id: &str,
    ) -> Result<(), ServiceError> {
        self.require_permission(user, workspace_id, Permission::ManageMembers).await?;
        if self.workspaces.remove_member(workspace_id, member_id).await? {
            tracing::info!(workspace_id, member = %member_id, "workspace member removed");
            Ok(())
        } else {
            Err(ServiceError::not_found("workspace member", member_id))
        }
    }

    pub async fn list_roles(
        &self,
        user: &UserIdentity,
        workspace_id: i64,
    ) -> Result<Vec<WorkspaceRole>, ServiceError> {
        self.require_member(user, workspace_id).await?;
        Ok(self.workspaces.list_roles(workspace_id).await?)
    }

    /// Permission names are parsed strictly; unknown names are rejected.
    pub async fn create_role(
        &self,
        user: &UserIdentity,
        workspace_id: i64,
        name: &str,
        permissions: &[String],
    ) -> Result<WorkspaceRole, ServiceError> {
        self.require_permission(user, workspace_id, Permission::ManageMembers).await?;
        let name = required_name("name", name)?;
        let mut parsed: Vec<Permission> = Vec::with_capacity(permissions.len());
        for raw in permissions {
            let permission =
                raw.parse::<Permission>().map_err(|e| ServiceError::InvalidInput(e.to_string()))?;
            if !parsed.contains(&permission) {
                parsed.push(permission);
            }
        }
        Ok(self.workspaces.create_role(workspace_id, &name, &parsed).await?)
    }
}

#[cfg(test)]
mod tests {
    use onyx_ext_storage::StorageError;

    use super::*;
    use crate::test_support::{admin, store, user};

    async fn role_id(svc: &WorkspaceService, owner: &UserIdentity, ws: i64, name: &str) -> i64 {
        svc.list_roles(owner, ws).await.unwrap().into_iter().find(|r| r.name == name).unwrap().id
    }

    #[tokio::test]
    async fn test_creator_can_manage_members() {
        let svc = WorkspaceService::new(store());
        let alice = user("alice");
        let ws = svc.create(&alice, " Team ").await.unwrap();
        assert_eq!(ws.name, "Team");
        assert_eq!(svc.list_mine(&alice).await.unwrap().len(), 1);

        let viewer = role_id(&svc, &alice, ws.id, "Viewer").await;
        svc.add_member(&alice, ws.id, "bob", viewer).await.unwrap();
        let members = svc.list_members(&alice, ws.id).await.unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(svc.list_mine(&user("bob")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_viewer_cannot_manage_members() {
        let svc = WorkspaceService::new(store());
        let alice = user("alice");
        let bob = user("bob");
        let ws = svc.create(&alice, "Team").await.unwrap();
        let viewer = role_id(&svc, &alice, ws.id, "Viewer").await;
        svc.add_member(&alice, ws.id, "bob", viewer).await.unwrap();

        assert_eq!(svc.list_members(&bob, ws.id).await.unwrap().len(), 2);
        let err = svc.add_member(&bob, ws.id, "carol", viewer).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
        assert!(matches!(
            svc.remove_member(&bob, ws.id, "alice").await,
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_outsiders_see_workspace_as_missing() {
        let svc = WorkspaceService::new(store());
        let ws = svc.create(&user("alice"), "Team").await.unwrap();

        assert!(svc.list_members(&user("mallory"), ws.id).await.unwrap_err().is_not_found());
        assert!(svc.list_roles(&user("mallory"), ws.id).await.unwrap_err().is_not_found());
        assert_eq!(svc.list_members(&admin("root"), ws.id).await.unwrap().len(), 1);
        assert!(svc.list_members(&user("alice"), 999).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_foreign_role_is_rejected() {
        let svc = WorkspaceService::new(store());
        let alice = user("alice");
        let a = svc.create(&alice, "A").await.unwrap();
        let b = svc.create(&alice, "B").await.unwrap();
        let b_viewer = role_id(&svc, &alice, b.id, "Viewer").await;

        let err = svc.add_member(&alice, a.id, "bob", b_viewer).await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage(StorageError::InvalidReference(_))));
    }

    #[tokio::test]
    async fn test_create_role_parses_permissions() {
        let svc = WorkspaceService::new(store());
        let alice = user("alice");
        let ws = svc.create(&alice, "Team").await.unwrap();

        let perms = vec!["view".to_owned(), "VIEW".to_owned(), "manage_access".to_owned()];
        let role = svc.create_role(&alice, ws.id, "Reviewer", &perms).await.unwrap();
        assert_eq!(role.permissions, vec![Permission::View, Permission::ManageAccess]);

        let bad = vec!["fly".to_owned()];
        assert!(matches!(
            svc.create_role(&alice, ws.id, "X", &bad).await,
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_remove_unknown_member_is_not_found() {
        let svc = WorkspaceService::new(store());
        let alice = user("alice");
        let ws = svc.create(&alice, "Team").await.unwrap();
        assert!(svc.remove_member(&alice, ws.id, "ghost").await.unwrap_err().is_not_found());
    }
}
