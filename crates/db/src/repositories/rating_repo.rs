//! Repository for the `ratings` table.

use recettes_core::types::DbId;
use sqlx::PgPool;

use crate::models::recipe::RatingSummary;

/// One rating per (user, recipe), upserted.
pub struct RatingRepo;

impl RatingRepo {
    /// Insert or replace the user's rating, returning the stored value.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        recipe_id: DbId,
        rating: i16,
    ) -> Result<i16, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO ratings (user_id, recipe_id, rating) VALUES ($1, $2, $3) \
             ON CONFLICT ON CONSTRAINT uq_ratings_user_recipe \
             DO UPDATE SET rating = EXCLUDED.rating, updated_at = now() \
             RETURNING rating",
        )
        .bind(user_id)
        .bind(recipe_id)
        .bind(rating)
        .fetch_one(pool)
        .await
    }

    /// Average and count over every rating of the recipe.
    pub async fn summary(pool: &PgPool, recipe_id: DbId) -> Result<RatingSummary, sqlx::Error> {
        sqlx::query_as::<_, RatingSummary>(
            "SELECT AVG(rating)::FLOAT8 AS avg_rating, COUNT(*) AS ratings_count \
             FROM ratings WHERE recipe_id = $1",
        )
        .bind(recipe_id)
        .fetch_one(pool)
        .await
    }
}
