//! Comment models.

use recettes_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub recipe_id: DbId,
    pub user_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
}

/// A comment as shown under a recipe, with its author's display name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentWithAuthor {
    pub id: DbId,
    pub content: String,
    pub created_at: Timestamp,
    pub user_id: DbId,
    pub user_name: Option<String>,
}
