//! Service layer for onyx-ext
//!
//! Centralizes business logic between HTTP handlers and storage, upstream
//! clients and renderers.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]

mod access_service;
pub mod charts;
mod connector_service;
mod error;
mod feature_flag_service;
mod folder_service;
mod lesson_plan_service;
mod log_service;
mod project_service;
pub mod report;
#[cfg(test)]
mod test_support;
mod validation;
mod workspace_service;

pub use access_service::AccessService;
pub use connector_service::ConnectorService;
pub use error::ServiceError;
pub use feature_flag_service::{FeatureFlagService, FlagState};
pub use folder_service::FolderService;
pub use lesson_plan_service::LessonPlanService;
pub use log_service::LogService;
pub use project_service::{ProjectService, ProjectSummary};
pub use report::{HoursPreview, ReportService};
pub use workspace_service::WorkspaceService;
