//! HTTP API for onyx-ext.
//!
//! Everything lives under `/api/custom` and authenticates with the Onyx
//! session cookie; `/health` and `/health/ready` are open.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(clippy::single_call_fn, reason = "HTTP handlers are called once from router")]

pub mod api_error;
mod auth;
mod handlers;
mod query_types;
mod response_types;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use onyx_ext_core::AppConfig;
use onyx_ext_llm::LlmClient;
use onyx_ext_render::{ChromiumPdf, PdfRenderer};
use onyx_ext_service::{
    AccessService, ConnectorService, FeatureFlagService, FolderService, LessonPlanService,
    LogService, ProjectService, ReportService, WorkspaceService,
};
use onyx_ext_storage::PgStorage;
use onyx_ext_upstream::{LokiClient, OnyxClient};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use api_error::ApiError;
pub use auth::CurrentUser;
use response_types::ReadinessResponse;

/// Shared application state. Every backend is an explicit field; nothing is
/// process-global.
pub struct AppState {
    pub storage: PgStorage,
    pub onyx: OnyxClient,
    pub projects: ProjectService,
    pub folders: FolderService,
    pub reports: ReportService,
    pub access: AccessService,
    pub workspaces: WorkspaceService,
    pub features: FeatureFlagService,
    pub connectors: ConnectorService,
    pub lesson_plans: LessonPlanService,
    pub logs: LogService,
}

impl AppState {
    #[must_use]
    pub fn new(
        storage: PgStorage,
        onyx: OnyxClient,
        loki: Option<LokiClient>,
        llm: Option<Arc<LlmClient>>,
        pdf: Arc<dyn PdfRenderer>,
    ) -> Self {
        let store = Arc::new(storage.clone());
        let access = AccessService::new(store.clone(), store.clone(), store.clone());
        Self {
            projects: ProjectService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                access.clone(),
                pdf.clone(),
            ),
            folders: FolderService::new(store.clone()),
            reports: ReportService::new(store.clone(), store.clone(), pdf),
            access,
            workspaces: WorkspaceService::new(store.clone()),
            features: FeatureFlagService::new(store.clone()),
            connectors: ConnectorService::new(onyx.clone()),
            lesson_plans: LessonPlanService::new(llm, store.clone(), store),
            logs: LogService::new(loki),
            storage,
            onyx,
        }
    }

    /// Build every client from configuration. Optional backends stay off
    /// when their variables are unset.
    pub fn from_config(config: &AppConfig, storage: PgStorage) -> anyhow::Result<Self> {
        let onyx = OnyxClient::new(&config.onyx_api_url)?;
        let loki = config.loki_url.as_deref().map(LokiClient::new).transpose()?;
        let llm = config.llm.as_ref().map(LlmClient::from_config).transpose()?.map(Arc::new);
        if llm.is_none() {
            tracing::info!("LLM not configured, lesson plan generation disabled");
        }
        if loki.is_none() {
            tracing::info!("LOKI_URL not set, log proxy disabled");
        }
        let pdf = Arc::new(ChromiumPdf::new(config.chromium_path.clone(), config.pdf_timeout_secs));
        Ok(Self::new(storage, onyx, loki, llm, pdf))
    }
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let Some(origin) = origin else {
        return CorsLayer::new();
    };
    match HeaderValue::from_str(origin) {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE]),
        Err(e) => {
            tracing::warn!(origin, error = %e, "invalid CORS_ORIGIN, cross-origin requests disabled");
            CorsLayer::new()
        },
    }
}

pub fn create_router(state: Arc<AppState>, cors_origin: Option<&str>) -> Router {
    use crate::handlers::{
        access, charts, connectors, features, folders, lesson_plans, logs, projects, reports,
        workspaces,
    };

    let api = Router::new()
        .route("/projects", get(projects::list).post(projects::create))
        .route("/projects/trash", get(projects::list_trash))
        .route("/projects/trash/{id}", delete(projects::purge))
        .route("/projects/trash/{id}/restore", post(projects::restore))
        .route(
            "/projects/{id}",
            get(projects::get_project).put(projects::update).delete(projects::trash),
        )
        .route("/projects/{id}/folder", put(projects::move_to_folder))
        .route("/projects/{id}/pdf", get(projects::export_pdf))
        .route("/folders", get(folders::list).post(folders::create))
        .route("/folders/{id}", put(folders::update).delete(folders::delete_folder))
        .route("/reports/hours/preview", get(reports::preview))
        .route("/reports/hours/pdf", get(reports::pdf))
        .route("/products/{id}/access", get(access::list).post(access::grant))
        .route("/products/{id}/access/check", get(access::check))
        .route("/products/{id}/access/{access_id}", delete(access::revoke))
        .route("/workspaces", get(workspaces::list_mine).post(workspaces::create))
        .route(
            "/workspaces/{id}/members",
            get(workspaces::list_members).post(workspaces::add_member),
        )
        .route("/workspaces/{id}/members/{user_id}", delete(workspaces::remove_member))
        .route("/workspaces/{id}/roles", get(workspaces::list_roles).post(workspaces::create_role))
        .route("/features", get(features::list))
        .route("/features/{name}", get(features::get_flag))
        .route("/admin/features/{user_id}/{name}", put(features::set_flag))
        .route("/admin/logs", get(logs::query))
        .route("/connectors/create", post(connectors::create))
        .route("/connectors/status", get(connectors::status))
        .route("/lesson-plans/generate", post(lesson_plans::generate))
        .route("/charts/demo", get(charts::demo))
        .route("/charts/compare", get(charts::compare))
        .route("/charts/generate", get(charts::generate));

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api/custom", api)
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                path = %req.uri().path(),
                user = tracing::field::Empty,
            )
        }))
        .layer(cors_layer(cors_origin))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn readiness(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    match state.storage.ping().await {
        Ok(()) => (StatusCode::OK, Json(ReadinessResponse { status: "ready", message: None })),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse { status: "unavailable", message: Some(e.to_string()) }),
            )
        },
    }
}
