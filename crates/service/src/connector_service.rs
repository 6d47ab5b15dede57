use onyx_ext_upstream::{ConnectorRequest, CreatedConnector, OnyxClient};
use serde_json::Value;

use crate::validation::required_name;
use crate::ServiceError;

/// Thin proxy over the Onyx connector admin API; calls run with the
/// caller's session cookie so Onyx applies its own authorization.
#[derive(Clone)]
pub struct ConnectorService {
    onyx: OnyxClient,
}

impl ConnectorService {
    #[must_use]
    pub fn new(onyx: OnyxClient) -> Self {
        Self { onyx }
    }

    pub async fn create(
        &self,
        cookie: &str,
        mut request: ConnectorRequest,
    ) -> Result<CreatedConnector, ServiceError> {
        request.name = required_name("name", &request.name)?;
        request.source = required_name("source", &request.source)?.to_lowercase();
        if request.connector_specific_config.is_null() {
            request.connector_specific_config = Value::Object(serde_json::Map::new());
        }
        if !request.connector_specific_config.is_object() {
            return Err(ServiceError::InvalidInput(
                "connector_specific_config must be an object".to_owned(),
            ));
        }
        Ok(self.onyx.create_connector(cookie, &request).await?)
    }

    pub async fn status(&self, cookie: &str) -> Result<Value, ServiceError> {
        Ok(self.onyx.connector_status(cookie).await?)
    }
}
