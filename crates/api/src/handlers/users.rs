//! Handlers for the caller's own account at `/users/me`.

use axum::extract::State;
use axum::Json;
use recettes_core::account::optional_profile_field;
use recettes_db::models::user::UserProfile;
use recettes_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::SuccessResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileEnvelope {
    pub user: UserProfile,
}

/// Request body for `PUT /users/me`. Blank values clear the field.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// GET /api/users/me
pub async fn get_me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ProfileEnvelope>> {
    let user = load_profile(&state, &auth).await?;
    Ok(Json(ProfileEnvelope { user }))
}

/// PUT /api/users/me
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<UpdateProfileRequest>,
) -> AppResult<Json<ProfileEnvelope>> {
    let name = optional_profile_field(input.name.as_deref());
    let avatar_url = optional_profile_field(input.avatar_url.as_deref());

    if !UserRepo::update_profile(&state.pool, auth.user_id, name.as_deref(), avatar_url.as_deref())
        .await?
    {
        return Err(AppError::not_found("User", auth.user_id));
    }
    tracing::info!(user_id = auth.user_id, "Profile updated");

    let user = load_profile(&state, &auth).await?;
    Ok(Json(ProfileEnvelope { user }))
}

/// DELETE /api/users/me
///
/// Removes the account along with its recipes, comments, favorites and ratings.
pub async fn delete_me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<SuccessResponse>> {
    if !UserRepo::delete(&state.pool, auth.user_id).await? {
        return Err(AppError::not_found("User", auth.user_id));
    }
    tracing::info!(user_id = auth.user_id, "Account deleted");
    Ok(Json(SuccessResponse::ok()))
}

async fn load_profile(state: &AppState, auth: &AuthUser) -> AppResult<UserProfile> {
    UserRepo::find_profile(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", auth.user_id))
}
