//! Repository for the `contact_messages` table.

use sqlx::PgPool;

use crate::models::contact::{ContactMessage, CreateContactMessage};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, subject, message, created_at";

/// Stores contact form submissions.
pub struct ContactRepo;

impl ContactRepo {
    /// Insert a message, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateContactMessage,
    ) -> Result<ContactMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO contact_messages (name, email, subject, message)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.subject)
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }
}
