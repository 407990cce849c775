use crate::error::{AppError, Result};
use crate::extract::CreateLinkInput;
use crate::model::LinkResponse;
use crate::qr::{self, render_qr};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use smartlink_core::{ShortCode, ShortenerError};
use tracing::debug;

pub async fn create_link_handler(
    State(state): State<AppState>,
    CreateLinkInput(request): CreateLinkInput,
) -> Result<Response> {
    // Stored targets are sent back verbatim in `Location`.
    if HeaderValue::try_from(request.url.as_str()).is_err() {
        return Err(ShortenerError::InvalidUrl(
            "URL contains characters that cannot be redirected to".to_string(),
        )
        .into());
    }

    let record = state
        .shortener()
        .shorten(request.into(), state.now())
        .await?;

    let response = LinkResponse::from_record(record, state.base_url());
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

pub async fn get_link_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>> {
    let code = ShortCode::new(id)?;
    let record = state.redirector().inspect(&code, state.now()).await?;
    Ok(Json(LinkResponse::from_record(record, state.base_url())))
}

pub async fn redirect_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let code = ShortCode::new(id)?;
    let target = state.redirector().resolve(&code, state.now()).await?;
    let location = HeaderValue::try_from(target).map_err(|_| AppError::InvalidTarget)?;

    debug!(code = %code, "redirecting");
    Ok((StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]).into_response())
}

/// Serves the short URL of a live link as an SVG QR code. Does not count a
/// click.
pub async fn qr_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let code = ShortCode::new(id)?;
    let record = state.redirector().inspect(&code, state.now()).await?;
    let image = render_qr(&record.id.to_url(state.base_url()))?;

    Ok(([(header::CONTENT_TYPE, qr::CONTENT_TYPE)], image).into_response())
}
