//! TrashStore implementation for PgStorage.

use async_trait::async_trait;
use onyx_ext_core::{Project, TrashedProject};

use super::{row_to_project, row_to_trashed, PgStorage, PROJECT_COLUMNS};
use crate::error::StorageError;
use crate::traits::TrashStore;

#[async_trait]
impl TrashStore for PgStorage {
    async fn trash_project(&self, id: i64) -> Result<TrashedProject, StorageError> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(&format!(
            r#"INSERT INTO trashed_projects ({PROJECT_COLUMNS}, trashed_at)
               SELECT {PROJECT_COLUMNS}, NOW() FROM projects WHERE id = $1
               RETURNING {PROJECT_COLUMNS}, trashed_at"#
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StorageError::not_found("project", id))?;
        let trashed = row_to_trashed(&row)?;

        sqlx::query("DELETE FROM projects WHERE id = $1").bind(id).execute(&mut *tx).await?;
        tx.commit().await?;
        tracing::info!(project_id = id, "project moved to trash");
        Ok(trashed)
    }

    async fn list_trash(&self, user_id: &str) -> Result<Vec<TrashedProject>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {PROJECT_COLUMNS}, trashed_at FROM trashed_projects
             WHERE onyx_user_id = $1 ORDER BY trashed_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_trashed).collect()
    }

    async fn get_trashed(&self, id: i64) -> Result<Option<TrashedProject>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {PROJECT_COLUMNS}, trashed_at FROM trashed_projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_trashed).transpose()
    }

    async fn restore_project(&self, id: i64) -> Result<Project, StorageError> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(&format!(
            r#"INSERT INTO projects ({PROJECT_COLUMNS})
               SELECT t.id, t.onyx_user_id, t.project_name, t.product_type, t.microproduct_name,
                      t.microproduct_content, t.quality_tier,
                      (SELECT f.id FROM project_folders f WHERE f.id = t.folder_id),
                      t.completion_time, t."order", t.created_at
               FROM trashed_projects t WHERE t.id = $1
               RETURNING {PROJECT_COLUMNS}"#
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StorageError::not_found("trashed project", id))?;
        let project = row_to_project(&row)?;

        sqlx::query("DELETE FROM trashed_projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::info!(project_id = id, "project restored from trash");
        Ok(project)
    }

    async fn purge_project(&self, id: i64) -> Result<bool, StorageError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM trashed_projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }
        let grants = sqlx::query("DELETE FROM product_access WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::info!(project_id = id, grants = grants.rows_affected(), "project purged");
        Ok(true)
    }
}
