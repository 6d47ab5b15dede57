use axum::extract::Query;
use axum::response::{Html, Response};
use onyx_ext_service::charts;

use super::svg;
use crate::query_types::ChartQuery;
use crate::{ApiError, CurrentUser};

pub async fn demo(_current: CurrentUser) -> Response {
    svg(charts::demo_svg())
}

pub async fn compare(_current: CurrentUser) -> Html<String> {
    Html(charts::compare_html())
}

pub async fn generate(
    _current: CurrentUser,
    Query(query): Query<ChartQuery>,
) -> Result<Response, ApiError> {
    let body = charts::generate(
        &query.labels,
        &query.values,
        query.title.as_deref(),
        query.style.unwrap_or_default(),
    )?;
    Ok(svg(body))
}
