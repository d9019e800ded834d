//! Repository for the `comments` table.

use recettes_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{Comment, CommentWithAuthor};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, recipe_id, user_id, content, created_at";

/// Provides create/list/delete for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a comment, returning it with the author's display name.
    pub async fn create(
        pool: &PgPool,
        recipe_id: DbId,
        user_id: DbId,
        content: &str,
    ) -> Result<CommentWithAuthor, sqlx::Error> {
        sqlx::query_as::<_, CommentWithAuthor>(
            "WITH c AS ( \
                 INSERT INTO comments (recipe_id, user_id, content) \
                 VALUES ($1, $2, $3) \
                 RETURNING id, user_id, content, created_at \
             ) \
             SELECT c.id, c.content, c.created_at, c.user_id, u.name AS user_name \
             FROM c LEFT JOIN users u ON u.id = c.user_id",
        )
        .bind(recipe_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(pool)
        .await
    }

    /// Find a comment by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A recipe's comments, newest first.
    pub async fn list_for_recipe(
        pool: &PgPool,
        recipe_id: DbId,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT c.id, c.content, c.created_at, c.user_id, u.name AS user_name \
             FROM comments c LEFT JOIN users u ON u.id = c.user_id \
             WHERE c.recipe_id = $1 \
             ORDER BY c.created_at DESC, c.id DESC",
        )
        .bind(recipe_id)
        .fetch_all(pool)
        .await
    }

    /// Delete a comment by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
