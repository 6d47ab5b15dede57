use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use onyx_ext_core::{Workspace, WorkspaceMember, WorkspaceRole};

use crate::query_types::{AddMemberRequest, CreateRoleRequest, CreateWorkspaceRequest};
use crate::response_types::DeletedResponse;
use crate::{ApiError, AppState, CurrentUser};

pub async fn list_mine(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> Result<Json<Vec<Workspace>>, ApiError> {
    Ok(Json(state.workspaces.list_mine(&current.user).await?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(req): Json<CreateWorkspaceRequest>,
) -> Result<(StatusCode, Json<Workspace>), ApiError> {
    Ok((StatusCode::CREATED, Json(state.workspaces.create(&current.user, &req.name).await?)))
}

pub async fn list_members(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<WorkspaceMember>>, ApiError> {
    Ok(Json(state.workspaces.list_members(&current.user, id).await?))
}

pub async fn add_member(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<WorkspaceMember>), ApiError> {
    let member = state.workspaces.add_member(&current.user, id, &req.user_id, req.role_id).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn remove_member(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path((id, user_id)): Path<(i64, String)>,
) -> Result<Json<DeletedResponse>, ApiError> {
    state.workspaces.remove_member(&current.user, id, &user_id).await?;
    Ok(Json(DeletedResponse { deleted: true, id: user_id }))
}

pub async fn list_roles(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<WorkspaceRole>>, ApiError> {
    Ok(Json(state.workspaces.list_roles(&current.user, id).await?))
}

pub async fn create_role(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<CreateRoleRequest>,
) -> Result<(StatusCode, Json<WorkspaceRole>), ApiError> {
    let role = state.workspaces.create_role(&current.user, id, &req.name, &req.permissions).await?;
    Ok((StatusCode::CREATED, Json(role)))
}
