//! Handlers for the `/favorites` resource. All routes act on the caller's
//! own favorites.

use axum::extract::State;
use axum::Json;
use recettes_core::listing::{PageQuery, DEFAULT_FAVORITES_LIMIT, MAX_FAVORITES_LIMIT};
use recettes_core::types::DbId;
use recettes_db::models::recipe::Recipe;
use recettes_db::repositories::{FavoriteRepo, RecipeRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::{AppPath, AppQuery};
use crate::handlers::recipes::resolve_images;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FavoritePage {
    pub favorites: Vec<Recipe>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct FavoriteStatus {
    pub success: bool,
    /// Whether the recipe is a favorite after the call.
    pub favorited: bool,
}

/// GET /api/favorites
pub async fn list_favorites(
    auth: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<FavoritePage>> {
    let page = query.resolve(DEFAULT_FAVORITES_LIMIT, MAX_FAVORITES_LIMIT);
    let (recipes, total) =
        FavoriteRepo::list_for_user(&state.pool, auth.user_id, page, state.schema).await?;

    Ok(Json(FavoritePage {
        favorites: resolve_images(&state, recipes),
        page: page.page,
        limit: page.limit,
        total,
    }))
}

/// POST /api/favorites/{recipe_id}
///
/// Idempotent: favoriting twice keeps a single row.
pub async fn add_favorite(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(recipe_id): AppPath<DbId>,
) -> AppResult<Json<FavoriteStatus>> {
    if !RecipeRepo::exists(&state.pool, recipe_id).await? {
        return Err(AppError::not_found("Recipe", recipe_id));
    }
    FavoriteRepo::add(&state.pool, auth.user_id, recipe_id).await?;
    tracing::info!(recipe_id, user_id = auth.user_id, "Favorite added");

    status(&state, auth.user_id, recipe_id).await
}

/// DELETE /api/favorites/{recipe_id}
///
/// Removing a recipe that is not a favorite succeeds without change.
pub async fn remove_favorite(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(recipe_id): AppPath<DbId>,
) -> AppResult<Json<FavoriteStatus>> {
    FavoriteRepo::remove(&state.pool, auth.user_id, recipe_id).await?;
    tracing::info!(recipe_id, user_id = auth.user_id, "Favorite removed");

    status(&state, auth.user_id, recipe_id).await
}

async fn status(
    state: &AppState,
    user_id: DbId,
    recipe_id: DbId,
) -> AppResult<Json<FavoriteStatus>> {
    let favorited = FavoriteRepo::is_favorite(&state.pool, user_id, recipe_id).await?;
    Ok(Json(FavoriteStatus {
        success: true,
        favorited,
    }))
}
