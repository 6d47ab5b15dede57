pub mod access;
pub mod charts;
pub mod connectors;
pub mod features;
pub mod folders;
pub mod lesson_plans;
pub mod logs;
pub mod projects;
pub mod reports;
pub mod workspaces;

use axum::http::header;
use axum::response::{IntoResponse, Response};

/// Binary download with a `Content-Disposition` file name.
pub(crate) fn attachment(content_type: &'static str, file_name: &str, bytes: Vec<u8>) -> Response {
    let disposition = format!("attachment; filename=\"{file_name}\"");
    (
        [(header::CONTENT_TYPE, content_type.to_owned()), (header::CONTENT_DISPOSITION, disposition)],
        bytes,
    )
        .into_response()
}

pub(crate) fn svg(body: String) -> Response {
    ([(header::CONTENT_TYPE, "image/svg+xml")], body).into_response()
}
