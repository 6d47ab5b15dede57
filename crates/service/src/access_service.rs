use std::sync::Arc;

use onyx_ext_core::{
    can_view_product, AccessType, NewProductAccess, ProductAccess, Project, UserIdentity,
};
use onyx_ext_storage::traits::{AccessStore, ProjectStore, WorkspaceStore};

use crate::ServiceError;

/// Product sharing: grants owned by the product owner, checked on read.
#[derive(Clone)]
pub struct AccessService {
    access: Arc<dyn AccessStore>,
    workspaces: Arc<dyn WorkspaceStore>,
    projects: Arc<dyn ProjectStore>,
}

impl AccessService {
    #[must_use]
    pub fn new(
        access: Arc<dyn AccessStore>,
        workspaces: Arc<dyn WorkspaceStore>,
        projects: Arc<dyn ProjectStore>,
    ) -> Self {
        Self { access, workspaces, projects }
    }

    /// The project, if `user` owns it. Other users' projects read as missing.
    async fn owned_product(&self, user: &UserIdentity, product_id: i64) -> Result<Project, ServiceError> {
        match self.projects.get_project(product_id).await? {
            Some(p) if p.onyx_user_id == user.id => Ok(p),
            _ => Err(ServiceError::not_found("product", product_id)),
        }
    }

    pub async fn list(
        &self,
        user: &UserIdentity,
        product_id: i64,
    ) -> Result<Vec<ProductAccess>, ServiceError> {
        self.owned_product(user, product_id).await?;
        Ok(self.access.list_access(product_id).await?)
    }

    pub async fn grant(
        &self,
        user: &UserIdentity,
        product_id: i64,
        input: &NewProductAccess,
    ) -> Result<ProductAccess, ServiceError> {
        self.owned_product(user, product_id).await?;
        input.validate().map_err(ServiceError::InvalidInput)?;
        if self.workspaces.get_workspace(input.workspace_id).await?.is_none() {
            return Err(ServiceError::InvalidInput(format!(
                "workspace {} does not exist",
                input.workspace_id
            )));
        }
        if input.access_type == AccessType::Role {
            let role_id = input.target_id.as_deref().map(str::trim).unwrap_or_default();
            let roles = self.workspaces.list_roles(input.workspace_id).await?;
            if !roles.iter().any(|r| r.id.to_string() == role_id) {
                return Err(ServiceError::InvalidInput(format!(
                    "role {role_id} does not belong to workspace {}",
                    input.workspace_id
                )));
            }
        }
        Ok(self.access.grant_access(product_id, input, &user.id).await?)
    }

    pub async fn revoke(
        &self,
        user: &UserIdentity,
        product_id: i64,
        access_id: i64,
    ) -> Result<(), ServiceError> {
        self.owned_product(user, product_id).await?;
        if self.access.revoke_access(product_id, access_id).await? {
            tracing::info!(product_id, access_id, "product access revoked");
            Ok(())
        } else {
            Err(ServiceError::not_found("access grant", access_id))
        }
    }

    /// Whether `user` may view `project`.
    pub async fn can_view_project(
        &self,
        user: &UserIdentity,
        project: &Project,
    ) -> Result<bool, ServiceError> {
        if project.onyx_user_id == user.id {
            return Ok(true);
        }
        let grants = self.access.list_access(project.id).await?;
        if grants.is_empty() {
            return Ok(false);
        }
        let memberships = self.workspaces.memberships_for_user(&user.id).await?;
        Ok(can_view_product(user, &project.onyx_user_id, &grants, &memberships))
    }

    /// Missing products read as not viewable.
    pub async fn can_view(&self, user: &UserIdentity, product_id: i64) -> Result<bool, ServiceError> {
        match self.projects.get_project(product_id).await? {
            Some(project) => self.can_view_project(user, &project).await,
            None => Ok(false),
        }
    }
}
