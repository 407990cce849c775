use crate::error::Result;
use crate::state::AppState;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};

pub async fn metrics_handler(State(state): State<AppState>) -> Result<Response> {
    let metrics = state.metrics();
    let body = metrics.export()?;
    Ok(([(header::CONTENT_TYPE, metrics.content_type())], body).into_response())
}
