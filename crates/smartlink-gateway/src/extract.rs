use crate::error::AppError;
use crate::model::CreateLinkRequest;
use axum::extract::{FromRequest, Request};
use axum::http::header;
use axum::{Form, Json};

/// Link creation input read from either a JSON body or an HTML form post
/// (`application/x-www-form-urlencoded`), chosen by `Content-Type`.
#[derive(Debug)]
pub struct CreateLinkInput(pub CreateLinkRequest);

fn is_form(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

impl<S> FromRequest<S> for CreateLinkInput
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&request) {
            let Form(body) = Form::<CreateLinkRequest>::from_request(request, state).await?;
            Ok(Self(body))
        } else {
            let Json(body) = Json::<CreateLinkRequest>::from_request(request, state).await?;
            Ok(Self(body))
        }
    }
}
