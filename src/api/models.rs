use crate::storage::{CaseStore, StoreError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CaseStore>,
    /// Reported by the status endpoint
    pub table_name: String,
}

impl AppState {
    pub fn new(store: Arc<dyn CaseStore>, table_name: impl Into<String>) -> Self {
        Self {
            store,
            table_name: table_name.into(),
        }
    }
}

/// Status endpoint response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusSummary {
    pub table: String,
    #[serde(rename = "recordCount")]
    pub record_count: Option<i64>,
}

/// Freshness envelope of the upstream dataset.
///
/// Part of the published schema; no endpoint fills it in yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheMetadata {
    pub last_updated: String,
    pub expires: String,
    pub last_updated_timestamp: i64,
    pub expires_timestamp: i64,
}

/// Query string of the search endpoint
#[derive(Debug, Default)]
pub struct SearchQuery {
    pub country: Option<String>,
}

impl SearchQuery {
    /// Repeated keys are allowed; the first `country` is used.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let country = pairs
            .into_iter()
            .find_map(|(key, value)| (key == "country").then_some(value));
        Self { country }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    Unavailable(String),
    Internal(String),
    Decode(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => AppError::Unavailable(msg),
            StoreError::Scan(msg) => AppError::Internal(msg),
            StoreError::Decode(msg) => AppError::Decode(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Store details stay in the logs.
        let (status, message) = match self {
            AppError::Unavailable(detail) => {
                error!(%detail, "Backing store unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, "backing store unavailable")
            }
            AppError::Internal(detail) => {
                error!(%detail, "Store query failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "store query failed")
            }
            AppError::Decode(detail) => {
                error!(%detail, "Failed to decode store items");
                (StatusCode::INTERNAL_SERVER_ERROR, "decode error")
            }
        };

        (status, Json(ErrorResponse {
            error: status.to_string(),
            message: message.to_string(),
        }))
        .into_response()
    }
}
