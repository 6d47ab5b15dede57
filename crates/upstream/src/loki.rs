//! Loki log query client, used by the admin log viewer.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use onyx_ext_core::{DEFAULT_LOG_LIMIT, MAX_LIST_LIMIT, UPSTREAM_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;
use crate::onyx::parse_json;

const DEFAULT_SELECTOR: &str = r#"{service_name=~".+"}"#;
const DEFAULT_WINDOW_MINUTES: i64 = 60;

#[derive(Debug, Clone)]
pub struct LokiClient {
    client: reqwest::Client,
    base_url: String,
}

/// Filters for a log range query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogQuery {
    /// Raw LogQL stream selector; defaults to every stream.
    #[serde(default)]
    pub selector: Option<String>,
    /// Substring filter (`|=`).
    #[serde(default)]
    pub contains: Option<String>,
    /// Level label filter applied after `| json`.
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub since_minutes: Option<i64>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl LogQuery {
    /// Build the LogQL expression.
    #[must_use]
    pub fn to_logql(&self) -> String {
        let mut logql = self
            .selector
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SELECTOR)
            .to_owned();
        if let Some(text) = self.contains.as_deref().filter(|t| !t.is_empty()) {
            logql.push_str(&format!(" |= \"{}\"", escape_logql(text)));
        }
        if let Some(level) = self.level.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            logql.push_str(&format!(" | json | level=\"{}\"", escape_logql(&level.to_lowercase())));
        }
        logql
    }

    #[must_use]
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LOG_LIMIT).clamp(1, MAX_LIST_LIMIT)
    }
}

fn escape_logql(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub labels: BTreeMap<String, String>,
    pub line: String,
}

#[derive(Deserialize)]
struct QueryRangeResponse {
    data: QueryRangeData,
}

#[derive(Deserialize)]
struct QueryRangeData {
    #[serde(default)]
    result: Vec<LokiStream>,
}

#[derive(Deserialize)]
struct LokiStream {
    #[serde(default)]
    stream: BTreeMap<String, String>,
    #[serde(default)]
    values: Vec<(String, String)>,
}

impl LokiClient {
    /// # Errors
    /// Returns `ClientInit` if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
            .build()
            .map_err(|e| UpstreamError::ClientInit(e.to_string()))?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    /// Run `query_range` and flatten all streams, newest first.
    pub async fn query_range(
        &self,
        query: &LogQuery,
        now: DateTime<Utc>,
    ) -> Result<Vec<LogEntry>, UpstreamError> {
        let since = query.since_minutes.unwrap_or(DEFAULT_WINDOW_MINUTES).max(1);
        let start = now - chrono::Duration::minutes(since);
        let limit = query.effective_limit();
        let params = [
            ("query", query.to_logql()),
            ("start", nanos(start).to_string()),
            ("end", nanos(now).to_string()),
            ("limit", limit.to_string()),
            ("direction", "backward".to_owned()),
        ];

        let response = self
            .client
            .get(format!("{}/loki/api/v1/query_range", self.base_url))
            .query(&params)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(UpstreamError::HttpStatus { code: status.as_u16(), body });
        }

        let parsed: QueryRangeResponse = parse_json(&body, "Loki query_range response")?;
        let mut entries: Vec<LogEntry> = parsed
            .data
            .result
            .into_iter()
            .flat_map(|stream| {
                let labels = stream.stream;
                stream.values.into_iter().filter_map(move |(ts, line)| {
                    let Ok(ns) = ts.parse::<i64>() else {
                        tracing::warn!(timestamp = %ts, "skipping Loki entry with bad timestamp");
                        return None;
                    };
                    Some(LogEntry {
                        timestamp: DateTime::from_timestamp_nanos(ns),
                        labels: labels.clone(),
                        line,
                    })
                })
            })
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(limit);
        Ok(entries)
    }
}

fn nanos(at: DateTime<Utc>) -> i64 {
    at.timestamp_nanos_opt().unwrap_or(i64::MAX)
}
