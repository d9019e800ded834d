//! Repository for the `ingredients` and `recipe_ingredients` tables.

use recettes_core::recipe::IngredientLine;
use recettes_core::types::DbId;
use sqlx::PgPool;

use crate::models::recipe::RecipeIngredient;

/// Ingredient lookup and recipe associations.
pub struct IngredientRepo;

impl IngredientRepo {
    /// Id of the ingredient named exactly `name`, inserting it if needed.
    ///
    /// Matching is case-sensitive. Two concurrent creators of the same name
    /// both end up with the single row thanks to `ON CONFLICT`.
    pub async fn find_or_create(pool: &PgPool, name: &str) -> Result<DbId, sqlx::Error> {
        let existing: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM ingredients WHERE name = $1")
                .bind(name)
                .fetch_optional(pool)
                .await?;
        if let Some(id) = existing {
            return Ok(id);
        }

        sqlx::query_scalar(
            "INSERT INTO ingredients (name) VALUES ($1) \
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
             RETURNING id",
        )
        .bind(name)
        .fetch_one(pool)
        .await
    }

    /// Associate each line with the recipe, in order.
    pub async fn attach(
        pool: &PgPool,
        recipe_id: DbId,
        lines: &[IngredientLine],
    ) -> Result<(), sqlx::Error> {
        for line in lines {
            let ingredient_id = Self::find_or_create(pool, &line.name).await?;
            sqlx::query(
                "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, quantity, unit) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(recipe_id)
            .bind(ingredient_id)
            .bind(&line.quantity)
            .bind(&line.unit)
            .execute(pool)
            .await?;
        }
        Ok(())
    }

    /// Drop every association of the recipe, then attach `lines`.
    pub async fn replace_for_recipe(
        pool: &PgPool,
        recipe_id: DbId,
        lines: &[IngredientLine],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(pool)
            .await?;
        Self::attach(pool, recipe_id, lines).await
    }

    /// A recipe's ingredient lines in insertion order.
    pub async fn list_for_recipe(
        pool: &PgPool,
        recipe_id: DbId,
    ) -> Result<Vec<RecipeIngredient>, sqlx::Error> {
        sqlx::query_as::<_, RecipeIngredient>(
            "SELECT i.id, i.name, ri.quantity, ri.unit \
             FROM recipe_ingredients ri \
             JOIN ingredients i ON i.id = ri.ingredient_id \
             WHERE ri.recipe_id = $1 \
             ORDER BY ri.id",
        )
        .bind(recipe_id)
        .fetch_all(pool)
        .await
    }
}
