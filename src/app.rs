use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/dashboard", get(handlers::dashboard))
        .route(
            "/api/analytics",
            get(handlers::get_analytics).put(handlers::put_analytics),
        )
        .route("/api/analytics/events", get(handlers::analytics_events))
        .route("/api/orders", post(handlers::record_order))
        .with_state(state)
}
