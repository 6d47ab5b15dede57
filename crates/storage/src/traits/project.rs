use async_trait::async_trait;
use onyx_ext_core::{NewProject, Project, ProjectUpdate, TrashedProject};

use crate::error::StorageError;

/// Project CRUD.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// List a user's projects ordered by `"order"`, then id. `folder_id`
    /// restricts to one folder.
    async fn list_projects(
        &self,
        user_id: &str,
        folder_id: Option<i64>,
    ) -> Result<Vec<Project>, StorageError>;

    async fn get_project(&self, id: i64) -> Result<Option<Project>, StorageError>;

    async fn create_project(
        &self,
        user_id: &str,
        input: &NewProject,
    ) -> Result<Project, StorageError>;

    /// Apply a partial update. Fails with `NotFound` for unknown ids.
    async fn update_project(
        &self,
        id: i64,
        update: &ProjectUpdate,
    ) -> Result<Project, StorageError>;

    /// Move into `folder_id`, or to the root when `None`.
    async fn move_project(&self, id: i64, folder_id: Option<i64>)
    -> Result<Project, StorageError>;
}

/// Soft delete into `trashed_projects`.
#[async_trait]
pub trait TrashStore: Send + Sync {
    /// Move a project into the trash, keeping its sharing grants. Fails with
    /// `NotFound` for unknown ids.
    async fn trash_project(&self, id: i64) -> Result<TrashedProject, StorageError>;

    async fn list_trash(&self, user_id: &str) -> Result<Vec<TrashedProject>, StorageError>;

    async fn get_trashed(&self, id: i64) -> Result<Option<TrashedProject>, StorageError>;

    /// Move back into `projects`, unfiling it if its folder no longer exists.
    async fn restore_project(&self, id: i64) -> Result<Project, StorageError>;

    /// Permanently delete, grants included. Returns `true` if a row was removed.
    async fn purge_project(&self, id: i64) -> Result<bool, StorageError>;
}
