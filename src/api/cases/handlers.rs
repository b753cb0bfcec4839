use crate::api::models::*;
use crate::storage::CaseRecord;
use axum::{extract::State, Json};
use tracing::info;

pub async fn all_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<CaseRecord>>, AppError> {
    let outcome = state.store.scan().await?;

    info!(records = outcome.records.len(), "Returning all records");

    Ok(Json(outcome.records))
}

pub async fn status_handler(
    State(state): State<AppState>,
) -> Result<Json<StatusSummary>, AppError> {
    let outcome = state.store.scan().await?;

    info!(table = %state.table_name, count = ?outcome.count, "Status requested");

    Ok(Json(StatusSummary {
        table: state.table_name,
        record_count: outcome.count,
    }))
}
