//! Repository for the `recipes` table.
//!
//! Reads and writes go through [`crate::recipe_query`] so the optional
//! `video_url`/`views` columns are handled in one place.

use recettes_core::listing::{escape_like, Pagination, RecipeFilter};
use recettes_core::recipe::RecipeDraft;
use recettes_core::types::DbId;
use sqlx::PgPool;

use crate::models::recipe::Recipe;
use crate::recipe_query::{
    build_count_query, build_insert, build_list_query, build_update, build_video_list_query,
    recipe_select,
};
use crate::schema::SchemaCapabilities;

/// Recipe reads and mutations.
pub struct RecipeRepo;

impl RecipeRepo {
    /// Insert a recipe and its ingredient lines, returning the new id.
    ///
    /// Statements run outside a transaction: if an ingredient insert fails
    /// the recipe row remains.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        draft: &RecipeDraft,
        caps: SchemaCapabilities,
    ) -> Result<DbId, sqlx::Error> {
        let id: DbId = build_insert(user_id, draft, caps)
            .build_query_scalar()
            .fetch_one(pool)
            .await?;

        if let Some(lines) = &draft.ingredients {
            super::IngredientRepo::attach(pool, id, lines).await?;
        }
        Ok(id)
    }

    /// Find a recipe with its author name and rating aggregate.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        caps: SchemaCapabilities,
    ) -> Result<Option<Recipe>, sqlx::Error> {
        let query = format!("{} WHERE r.id = $1", recipe_select(caps));
        sqlx::query_as::<_, Recipe>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a recipe with this id exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM recipes WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// One page of recipes matching `filter` plus the unpaginated total.
    pub async fn list(
        pool: &PgPool,
        filter: &RecipeFilter,
        page: Pagination,
        caps: SchemaCapabilities,
    ) -> Result<(Vec<Recipe>, i64), sqlx::Error> {
        let recipes = build_list_query(filter, caps, page)
            .build_query_as::<Recipe>()
            .fetch_all(pool)
            .await?;
        let total: i64 = build_count_query(filter, caps)
            .build_query_scalar()
            .fetch_one(pool)
            .await?;
        Ok((recipes, total))
    }

    /// Newest recipes with a video. Empty when the column is absent.
    pub async fn list_with_video(
        pool: &PgPool,
        limit: i64,
        caps: SchemaCapabilities,
    ) -> Result<Vec<Recipe>, sqlx::Error> {
        match build_video_list_query(caps, limit) {
            Some(mut qb) => qb.build_query_as::<Recipe>().fetch_all(pool).await,
            None => Ok(Vec::new()),
        }
    }

    /// Overwrite the scalars; replace ingredient lines when the draft has them.
    ///
    /// Returns `false` if no recipe with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        draft: &RecipeDraft,
        caps: SchemaCapabilities,
    ) -> Result<bool, sqlx::Error> {
        let result = build_update(id, draft, caps).build().execute(pool).await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        if let Some(lines) = &draft.ingredients {
            super::IngredientRepo::replace_for_recipe(pool, id, lines).await?;
        }
        Ok(true)
    }

    /// Increment the view counter, returning the new value.
    ///
    /// `None` when the `views` column is absent or the recipe does not exist.
    pub async fn increment_views(
        pool: &PgPool,
        id: DbId,
        caps: SchemaCapabilities,
    ) -> Result<Option<i32>, sqlx::Error> {
        if !caps.views {
            return Ok(None);
        }
        sqlx::query_scalar("UPDATE recipes SET views = views + 1 WHERE id = $1 RETURNING views")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a recipe; associations, comments, favorites and ratings cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether any recipe's image or video URL still points at the uploaded
    /// file `filename`. Matching is by substring, so a false positive keeps a
    /// file rather than removing a shared one.
    pub async fn references_upload(
        pool: &PgPool,
        filename: &str,
        caps: SchemaCapabilities,
    ) -> Result<bool, sqlx::Error> {
        let pattern = format!("%/uploads/{}%", escape_like(filename));
        let query = if caps.video_url {
            "SELECT EXISTS (SELECT 1 FROM recipes WHERE image_url LIKE $1 OR video_url LIKE $1)"
        } else {
            "SELECT EXISTS (SELECT 1 FROM recipes WHERE image_url LIKE $1)"
        };
        sqlx::query_scalar(query).bind(pattern).fetch_one(pool).await
    }

    /// Delete every recipe. Used by the seed tool.
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recipes").execute(pool).await?;
        Ok(result.rows_affected())
    }
}
