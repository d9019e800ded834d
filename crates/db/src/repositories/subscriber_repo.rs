//! Repository for the `subscribers` table.

use sqlx::PgPool;

/// Newsletter list membership keyed by normalized email.
pub struct SubscriberRepo;

impl SubscriberRepo {
    /// Add an email. Re-subscribing is a no-op.
    pub async fn subscribe(pool: &PgPool, email: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO subscribers (email) VALUES ($1) \
             ON CONFLICT ON CONSTRAINT uq_subscribers_email DO NOTHING",
        )
        .bind(email)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove an email. Unknown emails are ignored.
    pub async fn unsubscribe(pool: &PgPool, email: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM subscribers WHERE email = $1")
            .bind(email)
            .execute(pool)
            .await?;
        Ok(())
    }
}
