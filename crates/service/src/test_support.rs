//! In-memory store used by service tests; mirrors `PgStorage` semantics.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use onyx_ext_core::{
    FeatureFlag, Folder, FolderUpdate, NewFolder, NewProductAccess, NewProject, Permission,
    ProductAccess, Project, ProjectUpdate, QualityTier, TrashedProject, UserIdentity, Workspace,
    WorkspaceMember, WorkspaceRole, DEFAULT_ROLES,
};
use onyx_ext_storage::traits::{
    AccessStore, FeatureFlagStore, FolderStore, ProjectStore, TrashStore, WorkspaceStore,
};
use onyx_ext_storage::StorageError;

#[derive(Default)]
struct State {
    next_id: i64,
    projects: Vec<Project>,
    trash: Vec<TrashedProject>,
    folders: Vec<Folder>,
    access: Vec<ProductAccess>,
    workspaces: Vec<Workspace>,
    roles: Vec<WorkspaceRole>,
    members: Vec<WorkspaceMember>,
    flags: Vec<FeatureFlag>,
}

impl State {
    fn id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub(crate) struct MemoryStore {
    state: Mutex<State>,
}

pub(crate) fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::default())
}

pub(crate) fn user(id: &str) -> UserIdentity {
    UserIdentity { id: id.to_owned(), email: format!("{id}@example.com"), role: "basic".to_owned() }
}

pub(crate) fn admin(id: &str) -> UserIdentity {
    UserIdentity { role: "admin".to_owned(), ..user(id) }
}

fn tier(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    Some(raw.parse::<QualityTier>().map_or_else(|_| raw.to_owned(), |t| t.as_str().to_owned()))
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn list_projects(
        &self,
        user_id: &str,
        folder_id: Option<i64>,
    ) -> Result<Vec<Project>, StorageError> {
        let state = self.state.lock().unwrap();
        let mut projects: Vec<Project> = state
            .projects
            .iter()
            .filter(|p| p.onyx_user_id == user_id && folder_id.is_none_or(|f| p.folder_id == Some(f)))
            .cloned()
            .collect();
        projects.sort_by_key(|p| (p.order, p.id));
        Ok(projects)
    }

    async fn get_project(&self, id: i64) -> Result<Option<Project>, StorageError> {
        Ok(self.state.lock().unwrap().projects.iter().find(|p| p.id == id).cloned())
    }

    async fn create_project(
        &self,
        user_id: &str,
        input: &NewProject,
    ) -> Result<Project, StorageError> {
        let mut state = self.state.lock().unwrap();
        let project = Project {
            id: state.id(),
            onyx_user_id: user_id.to_owned(),
            project_name: input.project_name.trim().to_owned(),
            product_type: input.product_type.clone(),
            microproduct_name: input.microproduct_name.clone(),
            microproduct_content: input.microproduct_content.clone(),
            quality_tier: tier(input.quality_tier.as_deref()),
            folder_id: input.folder_id,
            completion_time: input.completion_time,
            order: 0,
            created_at: Utc::now(),
        };
        state.projects.push(project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        id: i64,
        update: &ProjectUpdate,
    ) -> Result<Project, StorageError> {
        let mut state = self.state.lock().unwrap();
        let project = state
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StorageError::not_found("project", id))?;
        if let Some(name) = &update.project_name {
            project.project_name = name.trim().to_owned();
        }
        if let Some(name) = &update.microproduct_name {
            project.microproduct_name = Some(name.clone());
        }
        if let Some(content) = &update.microproduct_content {
            project.microproduct_content = content.clone();
        }
        if let Some(raw) = &update.quality_tier {
            project.quality_tier = tier(Some(raw));
        }
        if let Some(minutes) = update.completion_time {
            project.completion_time = Some(minutes);
        }
        if let Some(order) = update.order {
            project.order = order;
        }
        Ok(project.clone())
    }

    async fn move_project(
        &self,
        id: i64,
        folder_id: Option<i64>,
    ) -> Result<Project, StorageError> {
        let mut state = self.state.lock().unwrap();
        if folder_id.is_some_and(|f| !state.folders.iter().any(|folder| folder.id == f)) {
            return Err(StorageError::InvalidReference("folder".to_owned()));
        }
        let project = state
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StorageError::not_found("project", id))?;
        project.folder_id = folder_id;
        Ok(project.clone())
    }
}

#[async_trait]
impl TrashStore for MemoryStore {
    async fn trash_project(&self, id: i64) -> Result<TrashedProject, StorageError> {
        let mut state = self.state.lock().unwrap();
        let index = state
            .projects
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StorageError::not_found("project", id))?;
        let project = state.projects.remove(index);
        let trashed = TrashedProject { project, trashed_at: Utc::now() };
        state.trash.push(trashed.clone());
        Ok(trashed)
    }

    async fn list_trash(&self, user_id: &str) -> Result<Vec<TrashedProject>, StorageError> {
        let state = self.state.lock().unwrap();
        Ok(state.trash.iter().filter(|t| t.project.onyx_user_id == user_id).cloned().collect())
    }

    async fn get_trashed(&self, id: i64) -> Result<Option<TrashedProject>, StorageError> {
        Ok(self.state.lock().unwrap().trash.iter().find(|t| t.project.id == id).cloned())
    }

    async fn restore_project(&self, id: i64) -> Result<Project, StorageError> {
        let mut state = self.state.lock().unwrap();
        let index = state
            .trash
            .iter()
            .position(|t| t.project.id == id)
            .ok_or_else(|| StorageError::not_found("trashed project", id))?;
        let mut project = state.trash.remove(index).project;
        if project.folder_id.is_some_and(|f| !state.folders.iter().any(|folder| folder.id == f)) {
            project.folder_id = None;
        }
        state.projects.push(project.clone());
        Ok(project)
    }

    async fn purge_project(&self, id: i64) -> Result<bool, StorageError> {
        let mut state = self.state.lock().unwrap();
        let before = state.trash.len();
        state.trash.retain(|t| t.project.id != id);
        let purged = state.trash.len() < before;
        if purged {
            state.access.retain(|a| a.product_id != id);
        }
        Ok(purged)
    }
}

#[async_trait]
impl FolderStore for MemoryStore {
    async fn list_folders(&self, user_id: &str) -> Result<Vec<Folder>, StorageError> {
        let state = self.state.lock().unwrap();
        Ok(state.folders.iter().filter(|f| f.onyx_user_id == user_id).cloned().collect())
    }

    async fn get_folder(&self, id: i64) -> Result<Option<Folder>, StorageError> {
        Ok(self.state.lock().unwrap().folders.iter().find(|f| f.id == id).cloned())
    }

    async fn create_folder(
        &self,
        user_id: &str,
        input: &NewFolder,
    ) -> Result<Folder, StorageError> {
        let mut state = self.state.lock().unwrap();
        let folder = Folder {
            id: state.id(),
            onyx_user_id: user_id.to_owned(),
            name: input.name.trim().to_owned(),
            parent_id: input.parent_id,
            quality_tier: tier(input.quality_tier.as_deref()),
            order: 0,
            created_at: Utc::now(),
        };
        state.folders.push(folder.clone());
        Ok(folder)
    }

    async fn update_folder(&self, id: i64, update: &FolderUpdate) -> Result<Folder, StorageError> {
        let mut state = self.state.lock().unwrap();
        let folder = state
            .folders
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| StorageError::not_found("folder", id))?;
        if let Some(name) = &update.name {
            folder.name = name.trim().to_owned();
        }
        if update.move_to_root {
            folder.parent_id = None;
        } else if let Some(parent) = update.parent_id {
            folder.parent_id = Some(parent);
        }
        if let Some(raw) = &update.quality_tier {
            folder.quality_tier = tier(Some(raw));
        }
        if let Some(order) = update.order {
            folder.order = order;
        }
        Ok(folder.clone())
    }

    async fn delete_folder(&self, id: i64) -> Result<bool, StorageError> {
        let mut state = self.state.lock().unwrap();
        let Some(index) = state.folders.iter().position(|f| f.id == id) else {
            return Ok(false);
        };
        let removed = state.folders.remove(index);
        for child in state.folders.iter_mut().filter(|f| f.parent_id == Some(id)) {
            child.parent_id = removed.parent_id;
        }
        for project in state.projects.iter_mut().filter(|p| p.folder_id == Some(id)) {
            project.folder_id = None;
        }
        Ok(true)
    }
}

#[async_trait]
impl AccessStore for MemoryStore {
    async fn list_access(&self, product_id: i64) -> Result<Vec<ProductAccess>, StorageError> {
        let state = self.state.lock().unwrap();
        Ok(state.access.iter().filter(|a| a.product_id == product_id).cloned().collect())
    }

    async fn grant_access(
        &self,
        product_id: i64,
        input: &NewProductAccess,
        granted_by: &str,
    ) -> Result<ProductAccess, StorageError> {
        let mut state = self.state.lock().unwrap();
        let target = input.target_id.as_deref().map(str::trim).filter(|t| !t.is_empty()).map(str::to_owned);
        if state.access.iter().any(|a| {
            a.product_id == product_id
                && a.workspace_id == input.workspace_id
                && a.access_type == input.access_type
                && a.target_id == target
        }) {
            return Err(StorageError::Duplicate("product_access".to_owned()));
        }
        let access = ProductAccess {
            id: state.id(),
            product_id,
            workspace_id: input.workspace_id,
            access_type: input.access_type,
            target_id: target,
            granted_by: granted_by.to_owned(),
            created_at: Utc::now(),
        };
        state.access.push(access.clone());
        Ok(access)
    }

    async fn revoke_access(&self, product_id: i64, access_id: i64) -> Result<bool, StorageError> {
        let mut state = self.state.lock().unwrap();
        let before = state.access.len();
        state.access.retain(|a| !(a.id == access_id && a.product_id == product_id));
        Ok(state.access.len() < before)
    }
}

#[async_trait]
impl WorkspaceStore for MemoryStore {
    async fn create_workspace(&self, name: &str, creator: &str) -> Result<Workspace, StorageError> {
        let mut state = self.state.lock().unwrap();
        let workspace = Workspace {
            id: state.id(),
            name: name.trim().to_owned(),
            created_by: creator.to_owned(),
            created_at: Utc::now(),
        };
        state.workspaces.push(workspace.clone());
        let mut owner_role = None;
        for (role_name, permissions) in DEFAULT_ROLES {
            let role = WorkspaceRole {
                id: state.id(),
                workspace_id: workspace.id,
                name: role_name.to_owned(),
                permissions: permissions.to_vec(),
            };
            owner_role.get_or_insert(role.id);
            state.roles.push(role);
        }
        if let Some(role_id) = owner_role {
            let member = WorkspaceMember {
                id: state.id(),
                workspace_id: workspace.id,
                user_id: creator.to_owned(),
                role_id,
                status: "active".to_owned(),
                created_at: Utc::now(),
            };
            state.members.push(member);
        }
        Ok(workspace)
    }

    async fn get_workspace(&self, id: i64) -> Result<Option<Workspace>, StorageError> {
        Ok(self.state.lock().unwrap().workspaces.iter().find(|w| w.id == id).cloned())
    }

    async fn list_user_workspaces(&self, user_id: &str) -> Result<Vec<Workspace>, StorageError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .workspaces
            .iter()
            .filter(|w| {
                state.members.iter().any(|m| m.workspace_id == w.id && m.user_id == user_id && m.is_active())
            })
            .cloned()
            .collect())
    }

    async fn list_members(&self, workspace_id: i64) -> Result<Vec<WorkspaceMember>, StorageError> {
        let state = self.state.lock().unwrap();
        Ok(state.members.iter().filter(|m| m.workspace_id == workspace_id).cloned().collect())
    }

    async fn get_membership(
        &self,
        workspace_id: i64,
        user_id: &str,
    ) -> Result<Option<(WorkspaceMember, WorkspaceRole)>, StorageError> {
        let state = self.state.lock().unwrap();
        let member = state.members.iter().find(|m| m.workspace_id == workspace_id && m.user_id == user_id);
        Ok(member.and_then(|m| {
            state.roles.iter().find(|r| r.id == m.role_id).map(|r| (m.clone(), r.clone()))
        }))
    }

    async fn memberships_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<WorkspaceMember>, StorageError> {
        let state = self.state.lock().unwrap();
        Ok(state.members.iter().filter(|m| m.user_id == user_id).cloned().collect())
    }

    async fn add_member(
        &self,
        workspace_id: i64,
        user_id: &str,
        role_id: i64,
    ) -> Result<WorkspaceMember, StorageError> {
        let mut state = self.state.lock().unwrap();
        if !state.roles.iter().any(|r| r.id == role_id && r.workspace_id == workspace_id) {
            return Err(StorageError::InvalidReference(format!("role {role_id}")));
        }
        if let Some(existing) =
            state.members.iter_mut().find(|m| m.workspace_id == workspace_id && m.user_id == user_id)
        {
            existing.role_id = role_id;
            existing.status = "active".to_owned();
            return Ok(existing.clone());
        }
        let member = WorkspaceMember {
            id: state.id(),
            workspace_id,
            user_id: user_id.to_owned(),
            role_id,
            status: "active".to_owned(),
            created_at: Utc::now(),
        };
        state.members.push(member.clone());
        Ok(member)
    }

    async fn remove_member(&self, workspace_id: i64, user_id: &str) -> Result<bool, StorageError> {
        let mut state = self.state.lock().unwrap();
        let before = state.members.len();
        state.members.retain(|m| !(m.workspace_id == workspace_id && m.user_id == user_id));
        Ok(state.members.len() < before)
    }

    async fn list_roles(&self, workspace_id: i64) -> Result<Vec<WorkspaceRole>, StorageError> {
        let state = self.state.lock().unwrap();
        Ok(state.roles.iter().filter(|r| r.workspace_id == workspace_id).cloned().collect())
    }

    async fn create_role(
        &self,
        workspace_id: i64,
        name: &str,
        permissions: &[Permission],
    ) -> Result<WorkspaceRole, StorageError> {
        let mut state = self.state.lock().unwrap();
        if state.roles.iter().any(|r| r.workspace_id == workspace_id && r.name == name.trim()) {
            return Err(StorageError::Duplicate("workspace_roles".to_owned()));
        }
        let role = WorkspaceRole {
            id: state.id(),
            workspace_id,
            name: name.trim().to_owned(),
            permissions: permissions.to_vec(),
        };
        state.roles.push(role.clone());
        Ok(role)
    }
}

#[async_trait]
impl FeatureFlagStore for MemoryStore {
    async fn list_flags(&self, user_id: &str) -> Result<Vec<FeatureFlag>, StorageError> {
        let state = self.state.lock().unwrap();
        Ok(state.flags.iter().filter(|f| f.user_id == user_id).cloned().collect())
    }

    async fn get_flag(
        &self,
        user_id: &str,
        feature_name: &str,
    ) -> Result<Option<FeatureFlag>, StorageError> {
        let state = self.state.lock().unwrap();
        Ok(state.flags.iter().find(|f| f.user_id == user_id && f.feature_name == feature_name).cloned())
    }

    async fn set_flag(
        &self,
        user_id: &str,
        feature_name: &str,
        enabled: bool,
    ) -> Result<FeatureFlag, StorageError> {
        let mut state = self.state.lock().unwrap();
        state.flags.retain(|f| !(f.user_id == user_id && f.feature_name == feature_name));
        let flag = FeatureFlag {
            user_id: user_id.to_owned(),
            feature_name: feature_name.to_owned(),
            is_enabled: enabled,
            updated_at: Utc::now(),
        };
        state.flags.push(flag.clone());
        Ok(flag)
    }
}
