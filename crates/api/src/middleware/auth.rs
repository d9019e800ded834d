//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use recettes_core::roles::ensure_owner_or_admin;
use recettes_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's role name (`"admin"` or `"user"`).
    pub role: String,
}

impl AuthUser {
    /// Fail with 403 unless this user owns the resource or is an admin.
    pub fn ensure_can_modify(&self, owner_id: DbId) -> AppResult<()> {
        ensure_owner_or_admin(owner_id, self.user_id, &self.role)?;
        Ok(())
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        let token = bearer_token(auth_header).ok_or_else(|| {
            AppError::unauthorized("Invalid Authorization format. Expected: Bearer <token>")
        })?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| AppError::unauthorized("Invalid or expired token"))?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

/// The token of a `Bearer <token>` header; the scheme is case-insensitive.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
