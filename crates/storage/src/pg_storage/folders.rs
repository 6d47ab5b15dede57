//! FolderStore implementation for PgStorage.

use async_trait::async_trait;
use onyx_ext_core::{Folder, FolderUpdate, NewFolder};

use super::{row_to_folder, stored_tier, PgStorage, FOLDER_COLUMNS};
use crate::error::StorageError;
use crate::traits::FolderStore;

#[async_trait]
impl FolderStore for PgStorage {
    async fn list_folders(&self, user_id: &str) -> Result<Vec<Folder>, StorageError> {
        let rows = sqlx::query(&format!(
            r#"SELECT {FOLDER_COLUMNS} FROM project_folders
               WHERE onyx_user_id = $1 ORDER BY "order" ASC, id ASC"#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_folder).collect()
    }

    async fn get_folder(&self, id: i64) -> Result<Option<Folder>, StorageError> {
        let row =
            sqlx::query(&format!("SELECT {FOLDER_COLUMNS} FROM project_folders WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.as_ref().map(row_to_folder).transpose()
    }

    async fn create_folder(
        &self,
        user_id: &str,
        input: &NewFolder,
    ) -> Result<Folder, StorageError> {
        let row = sqlx::query(&format!(
            r#"INSERT INTO project_folders (onyx_user_id, name, parent_id, quality_tier, "order")
               VALUES ($1, $2, $3, $4,
                   COALESCE((SELECT MAX("order") + 1 FROM project_folders WHERE onyx_user_id = $1), 0))
               RETURNING {FOLDER_COLUMNS}"#
        ))
        .bind(user_id)
        .bind(input.name.trim())
        .bind(input.parent_id)
        .bind(stored_tier(input.quality_tier.as_deref()))
        .fetch_one(&self.pool)
        .await?;
        let folder = row_to_folder(&row)?;
        tracing::info!(folder_id = folder.id, user_id, "folder created");
        Ok(folder)
    }

    async fn update_folder(&self, id: i64, update: &FolderUpdate) -> Result<Folder, StorageError> {
        let row = sqlx::query(&format!(
            r#"UPDATE project_folders SET
                   name = COALESCE($2, name),
                   parent_id = CASE WHEN $3 THEN NULL ELSE COALESCE($4, parent_id) END,
                   quality_tier = CASE WHEN $5 THEN $6 ELSE quality_tier END,
                   "order" = COALESCE($7, "order")
               WHERE id = $1
               RETURNING {FOLDER_COLUMNS}"#
        ))
        .bind(id)
        .bind(update.name.as_deref().map(str::trim))
        .bind(update.move_to_root)
        .bind(update.parent_id)
        .bind(update.quality_tier.is_some())
        .bind(stored_tier(update.quality_tier.as_deref()))
        .bind(update.order)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StorageError::not_found("folder", id))?;
        row_to_folder(&row)
    }

    async fn delete_folder(&self, id: i64) -> Result<bool, StorageError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "UPDATE project_folders
             SET parent_id = (SELECT parent_id FROM project_folders WHERE id = $1)
             WHERE parent_id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("UPDATE projects SET folder_id = NULL WHERE folder_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM project_folders WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(folder_id = id, "folder deleted");
        }
        Ok(deleted)
    }
}
