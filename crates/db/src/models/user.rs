//! User entity model and DTOs.

use recettes_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] or [`UserProfile`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub avatar_url: Option<String>,
    pub created_at: Timestamp,
}

/// The user object returned next to a token by register/login.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub name: Option<String>,
    pub email: String,
    pub role: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
        }
    }
}

/// `GET /api/users/me` payload: account fields plus activity counters.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserProfile {
    pub id: DbId,
    pub name: Option<String>,
    pub email: String,
    pub role: String,
    pub avatar_url: Option<String>,
    pub created_at: Timestamp,
    pub recipes_count: i64,
    pub favorites_count: i64,
    /// Whether the account's email is on the newsletter list.
    pub newsletter: bool,
}

/// DTO for creating a new user. Email is already normalized.
#[derive(Debug)]
pub struct CreateUser {
    pub name: Option<String>,
    pub email: String,
    pub password_hash: String,
}
