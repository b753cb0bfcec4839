use crate::api::models::AppState;
use crate::api::search::handlers::search_handler;
use axum::{routing::get, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/jbhattar/search", get(search_handler))
}
