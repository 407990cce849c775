use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_link_handler, get_link_handler, health_handler, metrics_handler, qr_handler,
    redirect_handler,
};
use crate::state::AppState;

/// Single-segment routes that shadow `/{id}`. Codes with these names must
/// never be generated.
pub const RESERVED_PATHS: &[&str] = &["health", "metrics", "shorten"];

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/metrics", get(metrics_handler))
            .route("/shorten", post(create_link_handler))
            .route("/v1/links/{id}", get(get_link_handler))
            .route("/{id}", get(redirect_handler))
            .route("/{id}/qr", get(qr_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
