use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use onyx_ext_upstream::{LogEntry, LogQuery};

use crate::{ApiError, AppState, CurrentUser};

pub async fn query(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Query(query): Query<LogQuery>,
) -> Result<Json<Vec<LogEntry>>, ApiError> {
    Ok(Json(state.logs.query(&current.user, &query).await?))
}
