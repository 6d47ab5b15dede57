//! AccessStore implementation for PgStorage.

use async_trait::async_trait;
use onyx_ext_core::{NewProductAccess, ProductAccess};

use super::{row_to_access, PgStorage, ACCESS_COLUMNS};
use crate::error::StorageError;
use crate::traits::AccessStore;

#[async_trait]
impl AccessStore for PgStorage {
    async fn list_access(&self, product_id: i64) -> Result<Vec<ProductAccess>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {ACCESS_COLUMNS} FROM product_access WHERE product_id = $1 ORDER BY id"
        ))
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_access).collect()
    }

    async fn grant_access(
        &self,
        product_id: i64,
        input: &NewProductAccess,
        granted_by: &str,
    ) -> Result<ProductAccess, StorageError> {
        let target = input.target_id.as_deref().map(str::trim).filter(|t| !t.is_empty());
        let row = sqlx::query(&format!(
            "INSERT INTO product_access (product_id, workspace_id, access_type, target_id, granted_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {ACCESS_COLUMNS}"
        ))
        .bind(product_id)
        .bind(input.workspace_id)
        .bind(input.access_type.as_str())
        .bind(target)
        .bind(granted_by)
        .fetch_one(&self.pool)
        .await?;
        let access = row_to_access(&row)?;
        tracing::info!(
            product_id,
            access_id = access.id,
            access_type = input.access_type.as_str(),
            "product access granted"
        );
        Ok(access)
    }

    async fn revoke_access(&self, product_id: i64, access_id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM product_access WHERE id = $1 AND product_id = $2")
            .bind(access_id)
            .bind(product_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
