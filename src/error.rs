//! API error taxonomy
//!
//! Every fallible operation behind the HTTP surface reports one of four
//! error classes, converted to a JSON body at the endpoint boundary:
//! - `NotFound` → 404 (absent session or message)
//! - `Validation` → 400 (bad request payload, rejected audio upload)
//! - `Upstream` → 500 (external API non-2xx or transport failure)
//! - `Internal` → 500 (storage or I/O failure)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    pub fn upstream(reason: impl Into<String>) -> Self {
        Self::Upstream(reason.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Internal(anyhow::Error::new(e).context("storage failure"))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Upstream(e.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(e) = &self {
            error!("internal error: {:#}", e);
        }
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ApiError::not_found("session x").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::validation("bad audio").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::upstream("503 from provider").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("disk full")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn upstream_message_is_prefixed() {
        let e = ApiError::upstream("chat API returned 429");
        assert_eq!(e.to_string(), "upstream error: chat API returned 429");
    }
}
