use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use qrcode::types::QrError;
use smartlink_core::{CoreError, RedirectError, ShortenerError};
use smartlink_metrics::MetricsError;
use thiserror::Error;
use tracing::error;

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Shortener(#[from] ShortenerError),
    #[error(transparent)]
    Redirect(#[from] RedirectError),
    /// A path segment that can never be a short code.
    #[error(transparent)]
    ShortCode(#[from] CoreError),
    /// A request body that could not be decoded.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    /// A stored destination that cannot be sent as a `Location` header.
    #[error("stored target is not a valid redirect location")]
    InvalidTarget,
    #[error(transparent)]
    Metrics(#[from] MetricsError),
    #[error("failed to render QR code: {0}")]
    Qr(#[from] QrError),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Shortener(ShortenerError::InvalidUrl(_)) => StatusCode::BAD_REQUEST,
            AppError::Shortener(ShortenerError::Exhausted { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Shortener(ShortenerError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Redirect(RedirectError::NotFound) | AppError::ShortCode(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::Redirect(RedirectError::Expired) => StatusCode::GONE,
            AppError::Rejected { status, .. } => *status,
            AppError::Redirect(RedirectError::Storage(_))
            | AppError::InvalidTarget
            | AppError::Metrics(_)
            | AppError::Qr(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            AppError::ShortCode(_) => RedirectError::NotFound.to_string(),
            _ if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE => {
                error!(error = %self, "request failed");
                "internal server error".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
