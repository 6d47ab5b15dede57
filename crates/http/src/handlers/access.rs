use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use onyx_ext_core::{NewProductAccess, ProductAccess};

use crate::response_types::{AccessCheckResponse, DeletedResponse};
use crate::{ApiError, AppState, CurrentUser};

pub async fn list(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(product_id): Path<i64>,
) -> Result<Json<Vec<ProductAccess>>, ApiError> {
    Ok(Json(state.access.list(&current.user, product_id).await?))
}

pub async fn grant(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(product_id): Path<i64>,
    Json(input): Json<NewProductAccess>,
) -> Result<(StatusCode, Json<ProductAccess>), ApiError> {
    let grant = state.access.grant(&current.user, product_id, &input).await?;
    tracing::info!(product_id, access_id = grant.id, access_type = grant.access_type.as_str(), "access granted");
    Ok((StatusCode::CREATED, Json(grant)))
}

pub async fn revoke(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path((product_id, access_id)): Path<(i64, i64)>,
) -> Result<Json<DeletedResponse>, ApiError> {
    state.access.revoke(&current.user, product_id, access_id).await?;
    Ok(Json(DeletedResponse { deleted: true, id: access_id.to_string() }))
}

pub async fn check(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(product_id): Path<i64>,
) -> Result<Json<AccessCheckResponse>, ApiError> {
    let can_view = state.access.can_view(&current.user, product_id).await?;
    Ok(Json(AccessCheckResponse { product_id, can_view }))
}
