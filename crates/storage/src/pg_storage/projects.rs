//! ProjectStore implementation for PgStorage.

use async_trait::async_trait;
use onyx_ext_core::{NewProject, Project, ProjectUpdate};

use super::{row_to_project, stored_tier, PgStorage, PROJECT_COLUMNS};
use crate::error::StorageError;
use crate::traits::ProjectStore;

#[async_trait]
impl ProjectStore for PgStorage {
    async fn list_projects(
        &self,
        user_id: &str,
        folder_id: Option<i64>,
    ) -> Result<Vec<Project>, StorageError> {
        let rows = sqlx::query(&format!(
            r#"SELECT {PROJECT_COLUMNS} FROM projects
               WHERE onyx_user_id = $1 AND ($2::BIGINT IS NULL OR folder_id = $2)
               ORDER BY "order" ASC, id ASC"#
        ))
        .bind(user_id)
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_project).collect()
    }

    async fn get_project(&self, id: i64) -> Result<Option<Project>, StorageError> {
        let row = sqlx::query(&format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_project).transpose()
    }

    async fn create_project(
        &self,
        user_id: &str,
        input: &NewProject,
    ) -> Result<Project, StorageError> {
        let row = sqlx::query(&format!(
            r#"INSERT INTO projects
                   (onyx_user_id, project_name, product_type, microproduct_name,
                    microproduct_content, quality_tier, folder_id, completion_time, "order")
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8,
                   COALESCE((SELECT MAX("order") + 1 FROM projects WHERE onyx_user_id = $1), 0))
               RETURNING {PROJECT_COLUMNS}"#
        ))
        .bind(user_id)
        .bind(&input.project_name)
        .bind(&input.product_type)
        .bind(&input.microproduct_name)
        .bind(&input.microproduct_content)
        .bind(stored_tier(input.quality_tier.as_deref()))
        .bind(input.folder_id)
        .bind(input.completion_time)
        .fetch_one(&self.pool)
        .await?;
        let project = row_to_project(&row)?;
        tracing::info!(project_id = project.id, user_id, "project created");
        Ok(project)
    }

    async fn update_project(
        &self,
        id: i64,
        update: &ProjectUpdate,
    ) -> Result<Project, StorageError> {
        let row = sqlx::query(&format!(
            r#"UPDATE projects SET
                   project_name = COALESCE($2, project_name),
                   microproduct_name = COALESCE($3, microproduct_name),
                   microproduct_content = COALESCE($4, microproduct_content),
                   quality_tier = CASE WHEN $5 THEN $6 ELSE quality_tier END,
                   completion_time = COALESCE($7, completion_time),
                   "order" = COALESCE($8, "order")
               WHERE id = $1
               RETURNING {PROJECT_COLUMNS}"#
        ))
        .bind(id)
        .bind(&update.project_name)
        .bind(&update.microproduct_name)
        .bind(&update.microproduct_content)
        .bind(update.quality_tier.is_some())
        .bind(stored_tier(update.quality_tier.as_deref()))
        .bind(update.completion_time)
        .bind(update.order)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StorageError::not_found("project", id))?;
        row_to_project(&row)
    }

    async fn move_project(
        &self,
        id: i64,
        folder_id: Option<i64>,
    ) -> Result<Project, StorageError> {
        let row = sqlx::query(&format!(
            "UPDATE projects SET folder_id = $2 WHERE id = $1 RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(id)
        .bind(folder_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StorageError::not_found("project", id))?;
        tracing::info!(project_id = id, ?folder_id, "project moved");
        row_to_project(&row)
    }
}
