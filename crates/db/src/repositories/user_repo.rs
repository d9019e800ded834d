//! Repository for the `users` table.

use recettes_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User, UserProfile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, password_hash, role, avatar_url, created_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// A duplicate email fails with the `uq_users_email` unique violation.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, password_hash)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by normalized email.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Account fields plus recipe/favorite counts and newsletter membership.
    pub async fn find_profile(pool: &PgPool, id: DbId) -> Result<Option<UserProfile>, sqlx::Error> {
        sqlx::query_as::<_, UserProfile>(
            "SELECT u.id, u.name, u.email, u.role, u.avatar_url, u.created_at, \
                 (SELECT COUNT(*) FROM recipes r WHERE r.user_id = u.id) AS recipes_count, \
                 (SELECT COUNT(*) FROM favorites f WHERE f.user_id = u.id) AS favorites_count, \
                 EXISTS (SELECT 1 FROM subscribers s WHERE s.email = u.email) AS newsletter \
             FROM users u WHERE u.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Overwrite the display name and avatar. Returns `true` if the user exists.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        name: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET name = $2, avatar_url = $3 WHERE id = $1")
            .bind(id)
            .bind(name)
            .bind(avatar_url)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace the stored password hash.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Change a user's role (`user` or `admin`).
    pub async fn set_role(pool: &PgPool, id: DbId, role: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET role = $2 WHERE id = $1")
            .bind(id)
            .bind(role)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a user; their recipes, comments, favorites and ratings cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
