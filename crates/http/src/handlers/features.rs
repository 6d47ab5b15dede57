use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use onyx_ext_core::FeatureFlag;
use onyx_ext_service::FlagState;

use crate::query_types::SetFlagRequest;
use crate::{ApiError, AppState, CurrentUser};

pub async fn list(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> Result<Json<Vec<FeatureFlag>>, ApiError> {
    Ok(Json(state.features.list(&current.user).await?))
}

pub async fn get_flag(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(name): Path<String>,
) -> Result<Json<FlagState>, ApiError> {
    Ok(Json(state.features.get(&current.user, &name).await?))
}

pub async fn set_flag(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path((user_id, name)): Path<(String, String)>,
    Json(req): Json<SetFlagRequest>,
) -> Result<Json<FeatureFlag>, ApiError> {
    Ok(Json(state.features.set(&current.user, &user_id, &name, req.is_enabled).await?))
}
