//! Handler for the contact form.

use axum::extract::State;
use axum::Json;
use recettes_core::account::{optional_profile_field, parse_email};
use recettes_db::models::contact::CreateContactMessage;
use recettes_db::repositories::ContactRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::response::OkResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// POST /api/contact
pub async fn submit_contact(
    State(state): State<AppState>,
    AppJson(input): AppJson<ContactRequest>,
) -> AppResult<Json<OkResponse>> {
    let subject = input.subject.trim();
    let message = input.message.trim();
    if input.email.trim().is_empty() || subject.is_empty() || message.is_empty() {
        return Err(AppError::validation("Email, subject and message are required"));
    }
    let email = parse_email(&input.email)?;

    let saved = ContactRepo::create(
        &state.pool,
        &CreateContactMessage {
            name: optional_profile_field(input.name.as_deref()),
            email,
            subject: subject.to_string(),
            message: message.to_string(),
        },
    )
    .await?;

    tracing::info!(contact_id = saved.id, "Contact message stored");
    Ok(Json(OkResponse::ok()))
}
