use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The headless browser exited unsuccessfully.
    #[error("browser exited with {status}: {stderr}")]
    Browser { status: String, stderr: String },
    #[error("PDF conversion timed out after {0}s")]
    Timeout(u64),
    #[error("invalid chart input: {0}")]
    InvalidChart(String),
}
