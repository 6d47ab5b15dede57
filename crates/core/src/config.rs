//! Runtime configuration read from the environment.

use std::path::PathBuf;

use crate::constants::PDF_TIMEOUT_SECS;
use crate::env_config::{env_string, parse_with_default};

/// Where to find Postgres: a full URL, or discrete `DB_*` parts.
#[derive(Clone, PartialEq, Eq)]
pub enum DatabaseConfig {
    Url(String),
    Parts { host: String, port: u16, name: String, user: String, password: String },
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(_) => f.debug_tuple("Url").field(&"***").finish(),
            Self::Parts { host, port, name, user, .. } => f
                .debug_struct("Parts")
                .field("host", host)
                .field("port", port)
                .field("name", name)
                .field("user", user)
                .field("password", &"***")
                .finish(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: Option<String>,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"***")
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub onyx_api_url: String,
    pub loki_url: Option<String>,
    /// Lesson-plan generation is disabled when unset.
    pub llm: Option<LlmConfig>,
    pub chromium_path: PathBuf,
    pub pdf_timeout_secs: u64,
    pub log_format: LogFormat,
    pub cors_origin: Option<String>,
}

pub const DEFAULT_ONYX_API_URL: &str = "http://api_server:8080";

impl AppConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(env_string)
    }

    /// Build from an arbitrary variable source; blank values count as unset.
    #[must_use]
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let database = match get("DATABASE_URL") {
            Some(url) => DatabaseConfig::Url(url),
            None => DatabaseConfig::Parts {
                host: get("DB_HOST").unwrap_or_else(|| "localhost".to_owned()),
                port: parse_with_default("DB_PORT", get("DB_PORT"), 5432),
                name: get("DB_NAME").unwrap_or_else(|| "onyx".to_owned()),
                user: get("DB_USER").unwrap_or_else(|| "postgres".to_owned()),
                password: get("DB_PASSWORD").unwrap_or_default(),
            },
        };

        let llm = match (get("LLM_API_URL"), get("LLM_API_KEY")) {
            (Some(api_url), Some(api_key)) => {
                Some(LlmConfig { api_url, api_key, model: get("LLM_MODEL") })
            },
            _ => None,
        };

        let log_format = match get("LOG_FORMAT").map(|v| v.to_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Self {
            database,
            onyx_api_url: get("ONYX_API_URL")
                .unwrap_or_else(|| DEFAULT_ONYX_API_URL.to_owned())
                .trim_end_matches('/')
                .to_owned(),
            loki_url: get("LOKI_URL").map(|u| u.trim_end_matches('/').to_owned()),
            llm,
            chromium_path: get("CHROMIUM_PATH").map_or_else(|| PathBuf::from("chromium"), PathBuf::from),
            pdf_timeout_secs: parse_with_default("PDF_TIMEOUT_SECS", get("PDF_TIMEOUT_SECS"), PDF_TIMEOUT_SECS),
            log_format,
            cors_origin: get("CORS_ORIGIN"),
        }
    }
}
