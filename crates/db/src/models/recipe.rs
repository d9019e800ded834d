//! Recipe models.

use recettes_core::recipe::resolve_image_url;
use recettes_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A recipe as read back from the database.
///
/// `video_url` and `views` are selected as `NULL` when the column is absent.
/// `avg_rating` and `ratings_count` are aggregated from `ratings`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Recipe {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub cuisine_type: Option<String>,
    pub prep_time_minutes: i32,
    pub servings: i32,
    pub instructions: Option<String>,
    pub views: Option<i32>,
    pub created_at: Timestamp,
    pub user_name: Option<String>,
    pub avg_rating: Option<f64>,
    pub ratings_count: i64,
}

impl Recipe {
    /// Substitute the default image when none is stored.
    pub fn with_resolved_image(mut self, default_image_url: &str) -> Self {
        self.image_url = Some(resolve_image_url(
            self.image_url.as_deref(),
            default_image_url,
        ));
        self
    }
}

/// One ingredient line of a recipe.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecipeIngredient {
    /// The ingredient's id (shared across recipes).
    pub id: DbId,
    pub name: String,
    pub quantity: Option<String>,
    pub unit: Option<String>,
}

/// Aggregate rating of a recipe.
#[derive(Debug, Clone, Copy, FromRow, Serialize)]
pub struct RatingSummary {
    pub avg_rating: Option<f64>,
    pub ratings_count: i64,
}
