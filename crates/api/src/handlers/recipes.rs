//! Handlers for the `/recipes` resource.

use axum::extract::State;
use axum::Json;
use recettes_core::listing::{
    clamp_limit, parse_int_prefix, RecipeListQuery, DEFAULT_VIDEOS_LIMIT, MAX_VIDEOS_LIMIT,
};
use recettes_core::media::local_upload_name;
use recettes_core::recipe::{clamp_rating, lenient_int, RecipeInput};
use recettes_core::types::DbId;
use recettes_db::models::comment::CommentWithAuthor;
use recettes_db::models::recipe::{Recipe, RecipeIngredient};
use recettes_db::repositories::{CommentRepo, IngredientRepo, RatingRepo, RecipeRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::response::SuccessResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// One page of `GET /recipes`.
#[derive(Debug, Serialize)]
pub struct RecipePage {
    pub recipes: Vec<Recipe>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
}

/// Query string for `GET /recipes/videos`.
#[derive(Debug, Default, Deserialize)]
pub struct VideoListQuery {
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VideoList {
    pub recipes: Vec<Recipe>,
    pub limit: i64,
}

/// `GET /recipes/{id}` payload.
#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    pub ingredients: Vec<RecipeIngredient>,
    pub comments: Vec<CommentWithAuthor>,
}

/// Returned by create and update.
#[derive(Debug, Serialize)]
pub struct RecipeEnvelope {
    pub recipe: Recipe,
}

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub ok: bool,
    /// `None` when views are not tracked or the recipe does not exist.
    pub views: Option<i32>,
}

/// Body of `POST /recipes/{id}/rate`; numeric strings are accepted.
#[derive(Debug, Deserialize)]
pub struct RateRequest {
    #[serde(default, deserialize_with = "lenient_int")]
    pub rating: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RateResponse {
    pub ok: bool,
    pub my_rating: i16,
    pub avg_rating: Option<f64>,
    pub ratings_count: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/recipes
///
/// Filterable, paginated listing. Unparseable query values fall back to
/// defaults instead of failing.
pub async fn list_recipes(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<RecipeListQuery>,
) -> AppResult<Json<RecipePage>> {
    let (filter, page) = query.into_parts();
    let (recipes, total) = RecipeRepo::list(&state.pool, &filter, page, state.schema).await?;

    Ok(Json(RecipePage {
        recipes: resolve_images(&state, recipes),
        page: page.page,
        limit: page.limit,
        total,
    }))
}

/// GET /api/recipes/videos
pub async fn list_video_recipes(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<VideoListQuery>,
) -> AppResult<Json<VideoList>> {
    let limit = clamp_limit(
        query.limit.as_deref().and_then(parse_int_prefix),
        DEFAULT_VIDEOS_LIMIT,
        MAX_VIDEOS_LIMIT,
    );
    let recipes = RecipeRepo::list_with_video(&state.pool, limit, state.schema).await?;

    Ok(Json(VideoList {
        recipes: resolve_images(&state, recipes),
        limit,
    }))
}

/// GET /api/recipes/{id}
pub async fn get_recipe(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<RecipeDetail>> {
    let recipe = find_recipe(&state, id).await?;
    let ingredients = IngredientRepo::list_for_recipe(&state.pool, id).await?;
    let comments = CommentRepo::list_for_recipe(&state.pool, id).await?;

    Ok(Json(RecipeDetail {
        recipe,
        ingredients,
        comments,
    }))
}

/// POST /api/recipes
pub async fn create_recipe(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<RecipeInput>,
) -> AppResult<Json<RecipeEnvelope>> {
    let draft = input.normalize(&state.config.default_image_url)?;
    let id = RecipeRepo::create(&state.pool, auth.user_id, &draft, state.schema).await?;

    tracing::info!(recipe_id = id, user_id = auth.user_id, "Recipe created");

    let recipe = find_recipe(&state, id).await?;
    Ok(Json(RecipeEnvelope { recipe }))
}

/// PUT /api/recipes/{id}
///
/// Overwrites every scalar field. Ingredient lines are replaced only when
/// `ingredients` is present in the body.
pub async fn update_recipe(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<RecipeInput>,
) -> AppResult<Json<RecipeEnvelope>> {
    let existing = find_recipe(&state, id).await?;
    auth.ensure_can_modify(existing.user_id)?;

    let draft = input.normalize(&state.config.default_image_url)?;
    if !RecipeRepo::update(&state.pool, id, &draft, state.schema).await? {
        return Err(AppError::not_found("Recipe", id));
    }

    tracing::info!(recipe_id = id, user_id = auth.user_id, "Recipe updated");

    let recipe = find_recipe(&state, id).await?;
    Ok(Json(RecipeEnvelope { recipe }))
}

/// DELETE /api/recipes/{id}
///
/// Removes the row, then any uploaded media it referenced.
pub async fn delete_recipe(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<SuccessResponse>> {
    let existing = RecipeRepo::find_by_id(&state.pool, id, state.schema)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe", id))?;
    auth.ensure_can_modify(existing.user_id)?;

    if !RecipeRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Recipe", id));
    }

    tracing::info!(recipe_id = id, user_id = auth.user_id, "Recipe deleted");

    let image_url = unreferenced_upload(&state, existing.image_url.as_deref()).await;
    let video_url = unreferenced_upload(&state, existing.video_url.as_deref()).await;
    state.uploads.remove_recipe_media(image_url, video_url).await;

    Ok(Json(SuccessResponse::ok()))
}

/// POST /api/recipes/{id}/view
pub async fn record_view(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<ViewResponse>> {
    let views = RecipeRepo::increment_views(&state.pool, id, state.schema).await?;
    Ok(Json(ViewResponse { ok: true, views }))
}

/// POST /api/recipes/{id}/rate
///
/// Rating is clamped to 1..=5; rating again replaces the previous value.
pub async fn rate_recipe(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<RateRequest>,
) -> AppResult<Json<RateResponse>> {
    let rating = clamp_rating(input.rating)?;
    if !RecipeRepo::exists(&state.pool, id).await? {
        return Err(AppError::not_found("Recipe", id));
    }

    let my_rating = RatingRepo::upsert(&state.pool, auth.user_id, id, rating).await?;
    let summary = RatingRepo::summary(&state.pool, id).await?;

    tracing::info!(recipe_id = id, user_id = auth.user_id, rating = my_rating, "Recipe rated");

    Ok(Json(RateResponse {
        ok: true,
        my_rating,
        avg_rating: summary.avg_rating,
        ratings_count: summary.ratings_count,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a recipe with its image resolved, or 404.
async fn find_recipe(state: &AppState, id: DbId) -> AppResult<Recipe> {
    RecipeRepo::find_by_id(&state.pool, id, state.schema)
        .await?
        .map(|r| r.with_resolved_image(&state.config.default_image_url))
        .ok_or_else(|| AppError::not_found("Recipe", id))
}

pub(crate) fn resolve_images(state: &AppState, recipes: Vec<Recipe>) -> Vec<Recipe> {
    recipes
        .into_iter()
        .map(|r| r.with_resolved_image(&state.config.default_image_url))
        .collect()
}

/// `url` if it names a local upload no remaining recipe points at.
async fn unreferenced_upload<'a>(state: &AppState, url: Option<&'a str>) -> Option<&'a str> {
    let name = url.and_then(local_upload_name)?;
    match RecipeRepo::references_upload(&state.pool, name, state.schema).await {
        Ok(false) => url,
        Ok(true) => {
            tracing::debug!(file = %name, "Upload still referenced, keeping it");
            None
        }
        Err(e) => {
            tracing::warn!(file = %name, error = %e, "Failed to check upload references");
            None
        }
    }
}
