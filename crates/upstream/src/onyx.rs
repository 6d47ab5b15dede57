//! Onyx API client. Every call forwards the caller's session cookie.

use std::time::Duration;

use onyx_ext_core::{UserIdentity, UPSTREAM_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::UpstreamError;

const BODY_PREVIEW_LEN: usize = 300;

#[derive(Debug, Clone)]
pub struct OnyxClient {
    client: reqwest::Client,
    base_url: String,
}

/// Payload for creating a connector and attaching it to a credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorRequest {
    pub name: String,
    pub source: String,
    #[serde(default = "default_input_type")]
    pub input_type: String,
    #[serde(default)]
    pub connector_specific_config: Value,
    #[serde(default)]
    pub refresh_freq: Option<u64>,
    /// `0` is the public credential for sources that need none.
    #[serde(default)]
    pub credential_id: i64,
    #[serde(default = "default_access_type")]
    pub access_type: String,
}

fn default_input_type() -> String {
    "poll".to_owned()
}

fn default_access_type() -> String {
    "private".to_owned()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatedConnector {
    pub connector_id: i64,
    pub credential_id: i64,
    /// Raw body of the CC-pair association response.
    pub cc_pair: Value,
}

#[derive(Deserialize)]
struct MeResponse {
    id: String,
    email: String,
    #[serde(default)]
    role: String,
}

#[derive(Deserialize)]
struct IdResponse {
    id: i64,
}

impl OnyxClient {
    /// # Errors
    /// Returns `ClientInit` if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
            .build()
            .map_err(|e| UpstreamError::ClientInit(e.to_string()))?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve the user behind a session cookie via `GET /me`.
    ///
    /// # Errors
    /// `Unauthorized` when the upstream rejects the session.
    pub async fn current_user(&self, cookie: &str) -> Result<UserIdentity, UpstreamError> {
        let body = self.send(self.client.get(self.url("/me")), cookie).await?;
        let me: MeResponse = parse_json(&body, "/me response")?;
        Ok(UserIdentity { id: me.id, email: me.email, role: me.role })
    }

    /// Create a connector, then associate it with a credential (the CC pair).
    ///
    /// # Errors
    /// Fails on the first upstream call that fails; a connector created before
    /// a failed association is left in place upstream.
    pub async fn create_connector(
        &self,
        cookie: &str,
        request: &ConnectorRequest,
    ) -> Result<CreatedConnector, UpstreamError> {
        let connector = serde_json::json!({
            "name": request.name,
            "source": request.source,
            "input_type": request.input_type,
            "connector_specific_config": request.connector_specific_config,
            "refresh_freq": request.refresh_freq,
            "access_type": request.access_type,
        });
        let body = self
            .send(self.client.post(self.url("/manage/admin/connector")).json(&connector), cookie)
            .await?;
        let created: IdResponse = parse_json(&body, "connector creation response")?;
        tracing::info!(connector_id = created.id, source = %request.source, "connector created upstream");

        let pair = serde_json::json!({ "name": request.name, "access_type": request.access_type });
        let path =
            format!("/manage/connector/{}/credential/{}", created.id, request.credential_id);
        let body = self.send(self.client.put(self.url(&path)).json(&pair), cookie).await?;
        let cc_pair = if body.trim().is_empty() {
            Value::Null
        } else {
            parse_json(&body, "CC pair response")?
        };

        Ok(CreatedConnector {
            connector_id: created.id,
            credential_id: request.credential_id,
            cc_pair,
        })
    }

    /// Indexing status of every connector visible to the session.
    pub async fn connector_status(&self, cookie: &str) -> Result<Value, UpstreamError> {
        let body = self
            .send(self.client.get(self.url("/manage/admin/connector/indexing-status")), cookie)
            .await?;
        parse_json(&body, "connector status response")
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        cookie: &str,
    ) -> Result<String, UpstreamError> {
        let response = builder.header(reqwest::header::COOKIE, cookie).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            return Ok(body);
        }
        tracing::warn!(status = status.as_u16(), body = %truncate(&body, BODY_PREVIEW_LEN), "upstream Onyx call failed");
        Err(UpstreamError::from_status(status.as_u16(), body))
    }
}

pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(
    body: &str,
    context: &str,
) -> Result<T, UpstreamError> {
    serde_json::from_str(body).map_err(|source| UpstreamError::JsonParse {
        context: format!("{context} (body: {})", truncate(body, BODY_PREVIEW_LEN)),
        source,
    })
}

fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end = end.saturating_sub(1);
    }
    s.get(..end).unwrap_or("")
}
