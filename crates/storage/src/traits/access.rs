use async_trait::async_trait;
use onyx_ext_core::{NewProductAccess, ProductAccess};

use crate::error::StorageError;

/// Product access grants.
#[async_trait]
pub trait AccessStore: Send + Sync {
    async fn list_access(&self, product_id: i64) -> Result<Vec<ProductAccess>, StorageError>;

    /// Insert a grant. A repeated grant fails with `Duplicate`.
    async fn grant_access(
        &self,
        product_id: i64,
        input: &NewProductAccess,
        granted_by: &str,
    ) -> Result<ProductAccess, StorageError>;

    /// Returns `true` if the grant existed on this product.
    async fn revoke_access(&self, product_id: i64, access_id: i64) -> Result<bool, StorageError>;
}
