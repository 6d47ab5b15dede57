//! FeatureFlagStore implementation for PgStorage.

use async_trait::async_trait;
use onyx_ext_core::FeatureFlag;

use super::{row_to_flag, PgStorage};
use crate::error::StorageError;
use crate::traits::FeatureFlagStore;

#[async_trait]
impl FeatureFlagStore for PgStorage {
    async fn list_flags(&self, user_id: &str) -> Result<Vec<FeatureFlag>, StorageError> {
        let rows = sqlx::query(
            "SELECT user_id, feature_name, is_enabled, updated_at FROM user_feature_flags
             WHERE user_id = $1 ORDER BY feature_name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_flag).collect()
    }

    async fn get_flag(
        &self,
        user_id: &str,
        feature_name: &str,
    ) -> Result<Option<FeatureFlag>, StorageError> {
        let row = sqlx::query(
            "SELECT user_id, feature_name, is_enabled, updated_at FROM user_feature_flags
             WHERE user_id = $1 AND feature_name = $2",
        )
        .bind(user_id)
        .bind(feature_name)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_flag).transpose()
    }

    async fn set_flag(
        &self,
        user_id: &str,
        feature_name: &str,
        enabled: bool,
    ) -> Result<FeatureFlag, StorageError> {
        let row = sqlx::query(
            "INSERT INTO user_feature_flags (user_id, feature_name, is_enabled)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id, feature_name)
             DO UPDATE SET is_enabled = EXCLUDED.is_enabled, updated_at = NOW()
             RETURNING user_id, feature_name, is_enabled, updated_at",
        )
        .bind(user_id)
        .bind(feature_name)
        .bind(enabled)
        .fetch_one(&self.pool)
        .await?;
        tracing::info!(user_id, feature_name, enabled, "feature flag updated");
        row_to_flag(&row)
    }
}
