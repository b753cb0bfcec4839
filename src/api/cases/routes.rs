use crate::api::cases::handlers::{all_handler, status_handler};
use crate::api::models::AppState;
use axum::{routing::get, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/jbhattar/all", get(all_handler))
        .route("/jbhattar/status", get(status_handler))
}
