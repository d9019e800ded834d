//! Extractors whose rejections render as the standard `{error, code}` body.
//!
//! axum's own `Json`, `Path` and `Query` reject with plain text; these
//! wrappers convert the rejection into [`AppError`].

use axum::extract::{FromRequest, FromRequestParts, Multipart, Request};

use crate::error::AppError;

/// JSON request body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path parameters.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Query string.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// `multipart/form-data` body.
pub struct AppMultipart(pub Multipart);

impl<S> FromRequest<S> for AppMultipart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Multipart::from_request(req, state)
            .await
            .map(AppMultipart)
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
    }
}
