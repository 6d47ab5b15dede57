use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use onyx_ext_upstream::{ConnectorRequest, CreatedConnector};
use serde_json::Value;

use crate::{ApiError, AppState, CurrentUser};

pub async fn create(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(req): Json<ConnectorRequest>,
) -> Result<Json<CreatedConnector>, ApiError> {
    Ok(Json(state.connectors.create(&current.cookie, req).await?))
}

pub async fn status(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.connectors.status(&current.cookie).await?))
}
