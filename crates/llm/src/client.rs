use std::time::Duration;

use onyx_ext_core::LlmConfig;

use crate::ai_types::{ChatRequest, ChatResponse};
use crate::error::LlmError;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
/// Attempts per completion, the first one included.
const MAX_ATTEMPTS: u32 = 4;
/// Wait before the second attempt; doubles after each failure.
const FIRST_BACKOFF: Duration = Duration::from_secs(1);
const ERROR_BODY_LEN: usize = 500;

/// Chat-completions client for an OpenAI-compatible endpoint.
pub struct LlmClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    pub(crate) model: String,
    backoff: Duration,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl LlmClient {
    /// # Errors
    /// `ClientInit` when the HTTP client cannot be built.
    pub fn new(api_key: String, base_url: String) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LlmError::ClientInit(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: format!("{}/v1/chat/completions", base_url.trim_end_matches('/')),
            api_key,
            model: DEFAULT_MODEL.to_owned(),
            backoff: FIRST_BACKOFF,
        })
    }

    /// # Errors
    /// Same as [`LlmClient::new`].
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = Self::new(config.api_key.clone(), config.api_url.clone())?;
        Ok(match &config.model {
            Some(model) => client.with_model(model.clone()),
            None => client,
        })
    }

    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    #[must_use]
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask for a JSON object and return the text of the first choice.
    /// Retryable failures are attempted again with doubling waits.
    pub(crate) async fn complete_json(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let body = ChatRequest::json_object(&self.model, system, user);
        let mut wait = self.backoff;
        let mut attempt = 1;
        loop {
            let err = match self.send(&body).await {
                Ok(text) => return Ok(text),
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => err,
            };
            if attempt == MAX_ATTEMPTS {
                return Err(LlmError::GaveUp { attempts: attempt, last: Box::new(err) });
            }
            tracing::warn!(attempt, error = %err, ?wait, "LLM call failed, retrying");
            tokio::time::sleep(wait).await;
            wait = wait.saturating_mul(2);
            attempt += 1;
        }
    }

    async fn send(&self, body: &ChatRequest<'_>) -> Result<String, LlmError> {
        let response =
            self.http.post(&self.endpoint).bearer_auth(&self.api_key).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(LlmError::Status {
                code: status.as_u16(),
                body: clip(&text, ERROR_BODY_LEN).to_owned(),
            });
        }

        let reply: ChatResponse =
            serde_json::from_str(&text).map_err(|source| LlmError::MalformedReply {
                context: format!("chat completion (body: {})", clip(&text, 200)),
                source,
            })?;
        reply.choices.into_iter().next().map(|c| c.message.content).ok_or(LlmError::NoChoices)
    }
}

/// Longest prefix of `s` within `max_len` bytes that ends on a char boundary.
pub(crate) fn clip(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let end = (0..=max_len).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0);
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_keeps_short_text() {
        assert_eq!(clip("plan", 10), "plan");
        assert_eq!(clip("lesson plan", 6), "lesson");
    }

    #[test]
    fn test_clip_respects_char_boundaries() {
        assert_eq!(clip("урок", 5), "ур");
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = LlmClient::new("sk-secret".to_owned(), "http://llm/".to_owned()).unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("http://llm/v1/chat/completions"));
        assert!(!debug.contains("sk-secret"));
    }
}
