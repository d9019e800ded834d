//! Optional-column detection for the `recipes` table.
//!
//! Older deployments may lack `recipes.video_url` and/or `recipes.views`.
//! The probe runs once at startup; every query builder takes the result as
//! an explicit argument instead of re-checking per request.

use serde::Serialize;
use sqlx::PgPool;

/// Which optional `recipes` columns exist in the connected database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SchemaCapabilities {
    pub video_url: bool,
    pub views: bool,
}

impl SchemaCapabilities {
    /// Every optional column present (the schema shipped in `db/migrations`).
    pub const FULL: Self = Self {
        video_url: true,
        views: true,
    };

    /// No optional column present.
    pub const MINIMAL: Self = Self {
        video_url: false,
        views: false,
    };

    /// Inspect `information_schema` for the optional columns.
    pub async fn detect(pool: &PgPool) -> Result<Self, sqlx::Error> {
        let columns: Vec<String> = sqlx::query_scalar(
            "SELECT column_name::TEXT FROM information_schema.columns \
             WHERE table_schema = current_schema() \
               AND table_name = 'recipes' \
               AND column_name IN ('video_url', 'views')",
        )
        .fetch_all(pool)
        .await?;

        let caps = Self {
            video_url: columns.iter().any(|c| c == "video_url"),
            views: columns.iter().any(|c| c == "views"),
        };
        tracing::info!(video_url = caps.video_url, views = caps.views, "Recipe schema probed");
        Ok(caps)
    }
}
