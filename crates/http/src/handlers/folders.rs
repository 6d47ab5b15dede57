use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use onyx_ext_core::{Folder, FolderUpdate, NewFolder};

use crate::response_types::DeletedResponse;
use crate::{ApiError, AppState, CurrentUser};

pub async fn list(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> Result<Json<Vec<Folder>>, ApiError> {
    Ok(Json(state.folders.list(&current.user).await?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(input): Json<NewFolder>,
) -> Result<(StatusCode, Json<Folder>), ApiError> {
    Ok((StatusCode::CREATED, Json(state.folders.create(&current.user, input).await?)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(update): Json<FolderUpdate>,
) -> Result<Json<Folder>, ApiError> {
    Ok(Json(state.folders.update(&current.user, id, update).await?))
}

pub async fn delete_folder(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>, ApiError> {
    state.folders.delete(&current.user, id).await?;
    Ok(Json(DeletedResponse { deleted: true, id: id.to_string() }))
}
