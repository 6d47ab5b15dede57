use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};
use onyx_ext_core::{AppConfig, UserIdentity};
use onyx_ext_render::ChromiumPdf;
use onyx_ext_service::report::{pdf, preview};
use onyx_ext_service::ReportService;
use onyx_ext_storage::PgStorage;

use crate::ReportFormat;

pub(crate) async fn run(
    config: &AppConfig,
    user_id: &str,
    folder: Option<i64>,
    format: ReportFormat,
    output: Option<&Path>,
) -> Result<()> {
    if matches!(format, ReportFormat::Pdf) && output.is_none() {
        bail!("--output is required for pdf reports");
    }
    let storage = Arc::new(PgStorage::connect(&config.database).await?);
    let renderer = Arc::new(ChromiumPdf::new(config.chromium_path.clone(), config.pdf_timeout_secs));
    let reports = ReportService::new(storage.clone(), storage, renderer);
    let user = UserIdentity { id: user_id.to_owned(), email: String::new(), role: String::new() };

    let bytes = match format {
        ReportFormat::Json => {
            let (report, meta) = reports.load(&user, folder).await?;
            serde_json::to_vec_pretty(&preview::to_preview(&report, &meta, folder))?
        },
        ReportFormat::Html => {
            let (report, meta) = reports.load(&user, folder).await?;
            pdf::to_html(&report, &meta).into_bytes()
        },
        ReportFormat::Pdf => reports.pdf(&user, folder).await?.1,
    };

    match output {
        Some(path) => {
            tokio::fs::write(path, &bytes).await?;
            tracing::info!(path = %path.display(), bytes = bytes.len(), "report written");
        },
        None => println!("{}", String::from_utf8_lossy(&bytes)),
    }
    Ok(())
}
