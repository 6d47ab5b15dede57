use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Response;
use axum::Json;
use onyx_ext_service::HoursPreview;

use super::attachment;
use crate::query_types::FolderQuery;
use crate::{ApiError, AppState, CurrentUser};

pub async fn preview(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Query(query): Query<FolderQuery>,
) -> Result<Json<HoursPreview>, ApiError> {
    Ok(Json(state.reports.preview(&current.user, query.folder_id).await?))
}

pub async fn pdf(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Query(query): Query<FolderQuery>,
) -> Result<Response, ApiError> {
    let (file_name, bytes) = state.reports.pdf(&current.user, query.folder_id).await?;
    Ok(attachment("application/pdf", &file_name, bytes))
}
