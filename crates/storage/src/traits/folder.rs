use async_trait::async_trait;
use onyx_ext_core::{Folder, FolderUpdate, NewFolder};

use crate::error::StorageError;

/// Folder tree operations.
#[async_trait]
pub trait FolderStore: Send + Sync {
    async fn list_folders(&self, user_id: &str) -> Result<Vec<Folder>, StorageError>;

    async fn get_folder(&self, id: i64) -> Result<Option<Folder>, StorageError>;

    async fn create_folder(&self, user_id: &str, input: &NewFolder)
    -> Result<Folder, StorageError>;

    async fn update_folder(&self, id: i64, update: &FolderUpdate) -> Result<Folder, StorageError>;

    /// Delete a folder. Child folders move up to its parent and its projects
    /// become unfiled. Returns `true` if deleted.
    async fn delete_folder(&self, id: i64) -> Result<bool, StorageError>;
}
