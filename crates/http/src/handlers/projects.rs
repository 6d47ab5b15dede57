use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use onyx_ext_core::{NewProject, Project, ProjectUpdate, TrashedProject};
use onyx_ext_service::ProjectSummary;

use super::attachment;
use crate::query_types::{FolderQuery, MoveProjectRequest};
use crate::response_types::DeletedResponse;
use crate::{ApiError, AppState, CurrentUser};

pub async fn list(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Query(query): Query<FolderQuery>,
) -> Result<Json<Vec<ProjectSummary>>, ApiError> {
    Ok(Json(state.projects.list(&current.user, query.folder_id).await?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(input): Json<NewProject>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let project = state.projects.create(&current.user, input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get_project(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Project>, ApiError> {
    Ok(Json(state.projects.get(&current.user, id).await?))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(update): Json<ProjectUpdate>,
) -> Result<Json<Project>, ApiError> {
    Ok(Json(state.projects.update(&current.user, id, update).await?))
}

pub async fn trash(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<TrashedProject>, ApiError> {
    Ok(Json(state.projects.trash(&current.user, id).await?))
}

pub async fn move_to_folder(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<MoveProjectRequest>,
) -> Result<Json<Project>, ApiError> {
    Ok(Json(state.projects.move_to_folder(&current.user, id, req.folder_id).await?))
}

pub async fn export_pdf(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let (file_name, bytes) = state.projects.export_pdf(&current.user, id).await?;
    Ok(attachment("application/pdf", &file_name, bytes))
}

pub async fn list_trash(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> Result<Json<Vec<TrashedProject>>, ApiError> {
    Ok(Json(state.projects.list_trash(&current.user).await?))
}

pub async fn restore(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Project>, ApiError> {
    Ok(Json(state.projects.restore(&current.user, id).await?))
}

pub async fn purge(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>, ApiError> {
    state.projects.purge(&current.user, id).await?;
    Ok(Json(DeletedResponse { deleted: true, id: id.to_string() }))
}
