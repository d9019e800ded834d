//! Handlers for the `/comments` resource.

use axum::extract::State;
use axum::Json;
use recettes_core::types::DbId;
use recettes_db::models::comment::CommentWithAuthor;
use recettes_db::repositories::{CommentRepo, RecipeRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AuthUser;
use crate::response::SuccessResponse;
use crate::state::AppState;

/// Request body for `POST /comments/{recipe_id}`.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommentCreated {
    pub success: bool,
    pub comment: CommentWithAuthor,
}

/// POST /api/comments/{recipe_id}
pub async fn create_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(recipe_id): AppPath<DbId>,
    AppJson(input): AppJson<CreateCommentRequest>,
) -> AppResult<Json<CommentCreated>> {
    let content = input
        .content
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::validation("Comment content is required"))?;

    if !RecipeRepo::exists(&state.pool, recipe_id).await? {
        return Err(AppError::not_found("Recipe", recipe_id));
    }

    let comment = CommentRepo::create(&state.pool, recipe_id, auth.user_id, content).await?;
    tracing::info!(comment_id = comment.id, recipe_id, user_id = auth.user_id, "Comment created");

    Ok(Json(CommentCreated {
        success: true,
        comment,
    }))
}

/// DELETE /api/comments/{id}
///
/// Allowed for the comment's author and for admins.
pub async fn delete_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<SuccessResponse>> {
    let comment = CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Comment", id))?;
    auth.ensure_can_modify(comment.user_id)?;

    CommentRepo::delete(&state.pool, id).await?;
    tracing::info!(comment_id = id, user_id = auth.user_id, "Comment deleted");

    Ok(Json(SuccessResponse::ok()))
}
