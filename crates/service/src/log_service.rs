use chrono::Utc;
use onyx_ext_core::UserIdentity;
use onyx_ext_upstream::{LogEntry, LogQuery, LokiClient};

use crate::ServiceError;

/// Admin-only read access to Loki.
#[derive(Clone)]
pub struct LogService {
    loki: Option<LokiClient>,
}

impl LogService {
    #[must_use]
    pub fn new(loki: Option<LokiClient>) -> Self {
        Self { loki }
    }

    pub async fn query(&self, user: &UserIdentity, query: &LogQuery) -> Result<Vec<LogEntry>, ServiceError> {
        if !user.is_admin() {
            return Err(ServiceError::Forbidden("admin role required".to_owned()));
        }
        let loki = self
            .loki
            .as_ref()
            .ok_or_else(|| ServiceError::NotConfigured("LOKI_URL is not set".to_owned()))?;
        tracing::debug!(logql = %query.to_logql(), "querying loki");
        Ok(loki.query_range(query, Utc::now()).await?)
    }
}
