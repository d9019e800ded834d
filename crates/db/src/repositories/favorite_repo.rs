//! Repository for the `favorites` table.

use recettes_core::listing::Pagination;
use recettes_core::types::DbId;
use sqlx::PgPool;

use crate::models::recipe::Recipe;
use crate::recipe_query::recipe_select;
use crate::schema::SchemaCapabilities;

/// Idempotent favorite add/remove and the per-user favorites page.
pub struct FavoriteRepo;

impl FavoriteRepo {
    /// Mark a recipe as favorite. A second call is a no-op.
    pub async fn add(pool: &PgPool, user_id: DbId, recipe_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO favorites (user_id, recipe_id) VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT uq_favorites_user_recipe DO NOTHING",
        )
        .bind(user_id)
        .bind(recipe_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove a favorite. Removing a non-favorite succeeds without change.
    pub async fn remove(pool: &PgPool, user_id: DbId, recipe_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND recipe_id = $2")
            .bind(user_id)
            .bind(recipe_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Whether the user has favorited the recipe.
    pub async fn is_favorite(
        pool: &PgPool,
        user_id: DbId,
        recipe_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM favorites WHERE user_id = $1 AND recipe_id = $2)",
        )
        .bind(user_id)
        .bind(recipe_id)
        .fetch_one(pool)
        .await
    }

    /// The user's favorite recipes, most recently favorited first, plus the
    /// total count.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        page: Pagination,
        caps: SchemaCapabilities,
    ) -> Result<(Vec<Recipe>, i64), sqlx::Error> {
        let query = format!(
            "{} JOIN favorites f ON f.recipe_id = r.id \
             WHERE f.user_id = $1 \
             ORDER BY f.created_at DESC, f.id DESC \
             LIMIT $2 OFFSET $3",
            recipe_select(caps)
        );
        let recipes = sqlx::query_as::<_, Recipe>(&query)
            .bind(user_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favorites WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok((recipes, total))
    }
}
