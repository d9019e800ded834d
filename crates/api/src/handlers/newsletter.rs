//! Handlers for the `/newsletter` resource.

use axum::extract::State;
use axum::Json;
use recettes_core::account::parse_email;
use recettes_db::repositories::SubscriberRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::response::OkResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewsletterRequest {
    #[serde(default)]
    pub email: String,
}

/// POST /api/newsletter/subscribe
///
/// Subscribing an address twice is a no-op.
pub async fn subscribe(
    State(state): State<AppState>,
    AppJson(input): AppJson<NewsletterRequest>,
) -> AppResult<Json<OkResponse>> {
    let email = parse_email(&input.email)?;
    SubscriberRepo::subscribe(&state.pool, &email).await?;
    tracing::info!("Newsletter subscription recorded");
    Ok(Json(OkResponse::ok()))
}

/// POST /api/newsletter/unsubscribe
pub async fn unsubscribe(
    State(state): State<AppState>,
    AppJson(input): AppJson<NewsletterRequest>,
) -> AppResult<Json<OkResponse>> {
    let email = parse_email(&input.email)?;
    SubscriberRepo::unsubscribe(&state.pool, &email).await?;
    tracing::info!("Newsletter subscription removed");
    Ok(Json(OkResponse::ok()))
}
