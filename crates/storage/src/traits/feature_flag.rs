use async_trait::async_trait;
use onyx_ext_core::FeatureFlag;

use crate::error::StorageError;

/// Per-user feature flags.
#[async_trait]
pub trait FeatureFlagStore: Send + Sync {
    async fn list_flags(&self, user_id: &str) -> Result<Vec<FeatureFlag>, StorageError>;

    async fn get_flag(
        &self,
        user_id: &str,
        feature_name: &str,
    ) -> Result<Option<FeatureFlag>, StorageError>;

    /// Upsert a flag value.
    async fn set_flag(
        &self,
        user_id: &str,
        feature_name: &str,
        enabled: bool,
    ) -> Result<FeatureFlag, StorageError>;
}
