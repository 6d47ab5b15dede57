use std::sync::Arc;

use onyx_ext_core::{FeatureFlag, UserIdentity};
use onyx_ext_storage::traits::FeatureFlagStore;
use serde::Serialize;

use crate::validation::check_feature_name;
use crate::ServiceError;

/// Flag state as seen by a caller; unknown flags are reported disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagState {
    pub feature_name: String,
    pub is_enabled: bool,
}

#[derive(Clone)]
pub struct FeatureFlagService {
    flags: Arc<dyn FeatureFlagStore>,
}

impl FeatureFlagService {
    #[must_use]
    pub fn new(flags: Arc<dyn FeatureFlagStore>) -> Self {
        Self { flags }
    }

    pub async fn list(&self, user: &UserIdentity) -> Result<Vec<FeatureFlag>, ServiceError> {
        Ok(self.flags.list_flags(&user.id).await?)
    }

    pub async fn get(&self, user: &UserIdentity, name: &str) -> Result<FlagState, ServiceError> {
        Ok(FlagState { feature_name: name.to_owned(), is_enabled: self.is_enabled(&user.id, name).await? })
    }

    pub async fn is_enabled(&self, user_id: &str, name: &str) -> Result<bool, ServiceError> {
        Ok(self.flags.get_flag(user_id, name).await?.is_some_and(|f| f.is_enabled))
    }

    /// Platform admins only.
    pub async fn set(
        &self,
        caller: &UserIdentity,
        user_id: &str,
        name: &str,
        enabled: bool,
    ) -> Result<FeatureFlag, ServiceError> {
        if !caller.is_admin() {
            return Err(ServiceError::Forbidden("admin role required".to_owned()));
        }
        check_feature_name(name)?;
        let flag = self.flags.set_flag(user_id, name, enabled).await?;
        tracing::info!(target_user = %user_id, feature = %name, enabled, by = %caller.id, "feature flag set");
        Ok(flag)
    }
}
