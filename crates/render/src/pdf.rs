//! HTML to PDF through a headless Chromium.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::RenderError;

#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, RenderError>;
}

#[derive(Debug, Clone)]
pub struct ChromiumPdf {
    binary: PathBuf,
    timeout: Duration,
}

impl ChromiumPdf {
    #[must_use]
    pub fn new(binary: PathBuf, timeout_secs: u64) -> Self {
        Self { binary, timeout: Duration::from_secs(timeout_secs.max(1)) }
    }
}

#[async_trait]
impl PdfRenderer for ChromiumPdf {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("document.html");
        let output = dir.path().join("document.pdf");
        tokio::fs::write(&input, html).await?;

        let mut command = Command::new(&self.binary);
        command
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--no-pdf-header-footer")
            .arg(format!("--print-to-pdf={}", output.display()))
            .arg(&input)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let result = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| RenderError::Timeout(self.timeout.as_secs()))??;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_owned();
            tracing::error!(status = %result.status, %stderr, "headless browser failed");
            return Err(RenderError::Browser { status: result.status.to_string(), stderr });
        }

        let pdf = tokio::fs::read(&output).await?;
        tracing::debug!(bytes = pdf.len(), "PDF rendered");
        Ok(pdf)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::os::unix::fs::PermissionsExt;

    use super::*;

    /// Stand-in browser: copies the input path's content into the
    /// `--print-to-pdf` target.
    fn fake_browser(dir: &std::path::Path, script: &str) -> PathBuf {
        let path = dir.join("fake-chromium");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    const COPYING_BROWSER: &str = r#"#!/bin/sh
out=""
for arg in "$@"; do
  case "$arg" in
    --print-to-pdf=*) out="${arg#--print-to-pdf=}" ;;
    --*) ;;
    *) in="$arg" ;;
  esac
done
printf '%%PDF-1.4\n' > "$out"
cat "$in" >> "$out"
"#;

    #[tokio::test]
    async fn test_renders_through_browser_binary() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ChromiumPdf::new(fake_browser(dir.path(), COPYING_BROWSER), 10);
        let pdf = renderer.render_pdf("<p>hello</p>").await.unwrap();
        let text = String::from_utf8(pdf).unwrap();
        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.contains("<p>hello</p>"));
    }

    #[tokio::test]
    async fn test_failing_browser_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let script = "#!/bin/sh\necho 'no display' >&2\nexit 3\n";
        let renderer = ChromiumPdf::new(fake_browser(dir.path(), script), 10);
        let err = renderer.render_pdf("<p/>").await.unwrap_err();
        match err {
            RenderError::Browser { stderr, .. } => assert_eq!(stderr, "no display"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_slow_browser_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ChromiumPdf::new(fake_browser(dir.path(), "#!/bin/sh\nsleep 5\n"), 1);
        let err = renderer.render_pdf("<p/>").await.unwrap_err();
        assert!(matches!(err, RenderError::Timeout(1)));
    }

    #[tokio::test]
    async fn test_missing_binary_is_io_error() {
        let renderer = ChromiumPdf::new(PathBuf::from("/nonexistent/chromium"), 5);
        assert!(matches!(renderer.render_pdf("<p/>").await, Err(RenderError::Io(_))));
    }
}
