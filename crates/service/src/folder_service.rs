use std::sync::Arc;

use onyx_ext_core::{subtree_folder_ids, Folder, FolderUpdate, NewFolder, UserIdentity};
use onyx_ext_storage::traits::FolderStore;

use crate::validation::{check_tier, required_name};
use crate::ServiceError;

#[derive(Clone)]
pub struct FolderService {
    folders: Arc<dyn FolderStore>,
}

impl FolderService {
    #[must_use]
    pub fn new(folders: Arc<dyn FolderStore>) -> Self {
        Self { folders }
    }

    pub async fn list(&self, user: &UserIdentity) -> Result<Vec<Folder>, ServiceError> {
        let mut folders = self.folders.list_folders(&user.id).await?;
        folders.sort_by_key(|f| (f.order, f.id));
        Ok(folders)
    }

    async fn owned(&self, user: &UserIdentity, id: i64) -> Result<Folder, ServiceError> {
        match self.folders.get_folder(id).await? {
            Some(f) if f.onyx_user_id == user.id => Ok(f),
            _ => Err(ServiceError::not_found("folder", id)),
        }
    }

    pub async fn create(&self, user: &UserIdentity, mut input: NewFolder) -> Result<Folder, ServiceError> {
        input.name = required_name("name", &input.name)?;
        check_tier(input.quality_tier.as_deref())?;
        if let Some(parent) = input.parent_id {
            self.owned(user, parent)
                .await
                .map_err(|_| ServiceError::InvalidInput(format!("parent folder {parent} does not exist")))?;
        }
        let folder = self.folders.create_folder(&user.id, &input).await?;
        tracing::info!(folder_id = folder.id, user = %user.id, "folder created");
        Ok(folder)
    }

    /// Rename, retier or reparent a folder. Moving a folder under itself or
    /// one of its descendants is rejected.
    pub async fn update(
        &self,
        user: &UserIdentity,
        id: i64,
        mut update: FolderUpdate,
    ) -> Result<Folder, ServiceError> {
        self.owned(user, id).await?;
        if let Some(name) = update.name.as_deref() {
            update.name = Some(required_name("name", name)?);
        }
        check_tier(update.quality_tier.as_deref())?;
        if let (Some(parent), false) = (update.parent_id, update.move_to_root) {
            let folders = self.folders.list_folders(&user.id).await?;
            if !folders.iter().any(|f| f.id == parent) {
                return Err(ServiceError::InvalidInput(format!("parent folder {parent} does not exist")));
            }
            if subtree_folder_ids(&folders, id).contains(&parent) {
                return Err(ServiceError::InvalidInput(
                    "a folder cannot be moved into itself or its descendants".to_owned(),
                ));
            }
        }
        Ok(self.folders.update_folder(id, &update).await?)
    }

    /// Delete a folder; its children move up one level and its projects
    /// become unfiled.
    pub async fn delete(&self, user: &UserIdentity, id: i64) -> Result<(), ServiceError> {
        self.owned(user, id).await?;
        self.folders.delete_folder(id).await?;
        tracing::info!(folder_id = id, "folder deleted");
        Ok(())
    }
}
