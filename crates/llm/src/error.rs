use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("LLM returned HTTP {code}: {body}")]
    Status { code: u16, body: String },
    #[error("malformed LLM reply in {context}: {source}")]
    MalformedReply {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("LLM reply had no choices")]
    NoChoices,
    /// The model answered, but the plan it produced is unusable.
    #[error("invalid lesson plan: {0}")]
    InvalidPlan(String),
    #[error("cannot build LLM client: {0}")]
    ClientInit(String),
    #[error("LLM still failing after {attempts} attempts: {last}")]
    GaveUp { attempts: u32, last: Box<LlmError> },
}

impl LlmError {
    /// Network failures, rate limits and server-side errors are worth another try.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => !e.is_builder(),
            Self::Status { code, .. } => *code == 408 || *code == 429 || *code >= 500,
            _ => false,
        }
    }
}
