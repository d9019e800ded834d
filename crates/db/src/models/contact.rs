//! Contact form submissions.

use recettes_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `contact_messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContactMessage {
    pub id: DbId,
    pub name: Option<String>,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: Timestamp,
}

/// DTO for a new contact message. Fields are already trimmed and validated.
#[derive(Debug)]
pub struct CreateContactMessage {
    pub name: Option<String>,
    pub email: String,
    pub subject: String,
    pub message: String,
}
