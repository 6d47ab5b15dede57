use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use onyx_ext_core::Project;
use onyx_ext_llm::LessonPlanRequest;

use crate::{ApiError, AppState, CurrentUser};

pub async fn generate(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(req): Json<LessonPlanRequest>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let project = state.lesson_plans.generate(&current.user, req).await?;
    Ok((StatusCode::CREATED, Json(project)))
}
