//! Session authentication against the Onyx API.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use onyx_ext_core::UserIdentity;

use crate::{ApiError, AppState};

/// Caller identity resolved from the forwarded session cookie.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: UserIdentity,
    /// Raw `Cookie` header, forwarded to Onyx on proxied calls.
    pub cookie: String,
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let cookie = parts
            .headers
            .get(COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("missing session cookie".to_owned()))?
            .to_owned();
        let user = state.onyx.current_user(&cookie).await?;
        tracing::Span::current().record("user", user.id.as_str());
        Ok(Self { user, cookie })
    }
}
