pub mod cases;
pub mod models;
pub mod search;

// Re-exports
pub use models::*;

use axum::Router;
use tower_http::trace::TraceLayer;

/// All routes, with request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(cases::routes())
        .merge(search::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
