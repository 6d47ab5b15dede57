//! Typed error enum for the service layer.
//!
//! Unifies storage, upstream, LLM and render failures into a single error
//! type so handlers can map each failure mode to a status code.

use onyx_ext_llm::LlmError;
use onyx_ext_render::RenderError;
use onyx_ext_storage::StorageError;
use onyx_ext_upstream::UpstreamError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage operation failed (DB, not found, duplicate, etc.).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Call to the Onyx API or Loki failed.
    #[error("upstream: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    /// HTML/PDF rendering failed.
    #[error("render: {0}")]
    Render(#[from] RenderError),

    /// Caller provided invalid input (empty name, malformed grant).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Caller is authenticated but lacks the permission.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Required backend (LLM, Loki) is not configured.
    #[error("not configured: {0}")]
    NotConfigured(String),

    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::Storage(StorageError::not_found(entity, id))
    }

    /// Whether this error is likely transient (worth retrying).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_transient(),
            Self::Llm(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Whether this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(StorageError::NotFound { .. }))
    }

    /// Whether this error represents a duplicate/conflict.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_duplicate())
    }
}
