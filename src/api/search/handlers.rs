use crate::api::models::*;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{info, warn};

/// Body of every rejected search.
pub const USAGE_MESSAGE: &str = "The format of the search is search?country=US";

/// A letter followed by at least one more letter or space, nothing else.
static COUNTRY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z ]+$").expect("country pattern is valid"));

pub fn is_valid_country(value: &str) -> bool {
    COUNTRY_PATTERN.is_match(value)
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    // The route only exists with a country parameter; the first one wins.
    let Some(country) = SearchQuery::from_pairs(params).country else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    if !is_valid_country(&country) {
        warn!(%country, "Rejected search");
        return Ok((StatusCode::BAD_REQUEST, Json(USAGE_MESSAGE)).into_response());
    }

    info!(%country, "Searching");

    let records = state.store.scan_filtered(&country).await?;

    info!(found = records.len(), "Search complete");

    Ok(Json(records).into_response())
}
