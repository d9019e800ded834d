//! Handlers for the `/auth` resource (register, login, change-password).

use axum::extract::State;
use axum::Json;
use recettes_core::account::{
    normalize_email, normalize_password, optional_profile_field, parse_email, MIN_PASSWORD_LENGTH,
};
use recettes_db::models::user::{CreateUser, User, UserResponse};
use recettes_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::SuccessResponse;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for `POST /auth/change-password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password: String,
}

/// Returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
///
/// Create an account and sign it in. A taken email yields 409 through the
/// `uq_users_email` constraint.
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = parse_email(&input.email)?;
    let password = normalize_password(&input.password);
    validate_password_strength(password, MIN_PASSWORD_LENGTH).map_err(AppError::validation)?;

    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: optional_profile_field(input.name.as_deref()),
            email,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");
    Ok(Json(auth_response(&state, &user)?))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = normalize_email(&input.email);
    let password = normalize_password(&input.password);
    if email.is_empty() || password.is_empty() {
        return Err(AppError::validation("Email and password are required"));
    }

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

    let valid = verify_password(password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    }

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(auth_response(&state, &user)?))
}

/// POST /api/auth/change-password
pub async fn change_password(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<ChangePasswordRequest>,
) -> AppResult<Json<SuccessResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::unauthorized("Account no longer exists"))?;

    let valid = verify_password(normalize_password(&input.old_password), &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        return Err(AppError::unauthorized("Current password is incorrect"));
    }

    let new_password = normalize_password(&input.new_password);
    validate_password_strength(new_password, MIN_PASSWORD_LENGTH).map_err(AppError::validation)?;
    let password_hash = hash_password(new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    UserRepo::update_password(&state.pool, user.id, &password_hash).await?;

    tracing::info!(user_id = user.id, "Password changed");
    Ok(Json(SuccessResponse::ok()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn auth_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = generate_access_token(user, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    Ok(AuthResponse {
        token,
        user: UserResponse::from(user),
    })
}
