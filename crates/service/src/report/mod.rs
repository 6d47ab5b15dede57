//! Hours reports: one rollup, two presentations.
//!
//! [`ReportService::load`] runs `build_hours_report` exactly once per request;
//! the result then goes through either the JSON [`preview`] adapter or the
//! HTML/PDF [`pdf`] adapter.

pub mod pdf;
pub mod preview;

use std::sync::Arc;

use chrono::Utc;
use onyx_ext_core::{build_hours_report, HoursReport, ReportScope, UserIdentity};
use onyx_ext_render::{PdfRenderer, ReportMeta};
use onyx_ext_storage::traits::{FolderStore, ProjectStore};

pub use preview::HoursPreview;

use crate::ServiceError;

const REPORT_TITLE: &str = "Hours report";

#[derive(Clone)]
pub struct ReportService {
    projects: Arc<dyn ProjectStore>,
    folders: Arc<dyn FolderStore>,
    pdf: Arc<dyn PdfRenderer>,
}

impl ReportService {
    #[must_use]
    pub fn new(
        projects: Arc<dyn ProjectStore>,
        folders: Arc<dyn FolderStore>,
        pdf: Arc<dyn PdfRenderer>,
    ) -> Self {
        Self { projects, folders, pdf }
    }

    /// Load the user's data and compute the report for `folder_id` (or
    /// everything).
    pub async fn load(
        &self,
        user: &UserIdentity,
        folder_id: Option<i64>,
    ) -> Result<(HoursReport, ReportMeta), ServiceError> {
        let folders = self.folders.list_folders(&user.id).await?;
        let (scope, scope_label) = match folder_id {
            None => (ReportScope::All, None),
            Some(id) => {
                let folder = folders
                    .iter()
                    .find(|f| f.id == id)
                    .ok_or_else(|| ServiceError::not_found("folder", id))?;
                (ReportScope::Folder(id), Some(folder.name.clone()))
            },
        };
        let projects = self.projects.list_projects(&user.id, None).await?;
        let report = build_hours_report(&projects, &folders, scope);
        tracing::debug!(
            user = %user.id,
            projects = report.projects.len(),
            lessons = report.summary.lesson_count,
            "hours report computed"
        );
        let meta = ReportMeta { title: REPORT_TITLE.to_owned(), scope_label, generated_at: Utc::now() };
        Ok((report, meta))
    }

    pub async fn preview(
        &self,
        user: &UserIdentity,
        folder_id: Option<i64>,
    ) -> Result<HoursPreview, ServiceError> {
        let (report, meta) = self.load(user, folder_id).await?;
        Ok(preview::to_preview(&report, &meta, folder_id))
    }

    /// Returns the file name and PDF bytes.
    pub async fn pdf(
        &self,
        user: &UserIdentity,
        folder_id: Option<i64>,
    ) -> Result<(String, Vec<u8>), ServiceError> {
        let (report, meta) = self.load(user, folder_id).await?;
        let html = pdf::to_html(&report, &meta);
        let bytes = self.pdf.render_pdf(&html).await?;
        let name = format!("hours-report-{}.pdf", meta.generated_at.format("%Y%m%d"));
        Ok((name, bytes))
    }
}
