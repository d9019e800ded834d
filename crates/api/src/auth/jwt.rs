//! JWT access-token generation and validation.
//!
//! Tokens are HS256-signed JWTs containing a [`Claims`] payload. There are no
//! refresh tokens: a token simply expires after `JWT_EXPIRY_HOURS`.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use recettes_core::types::DbId;
use recettes_db::models::user::User;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// The user's role name (`"admin"` or `"user"`).
    pub role: String,
    pub email: String,
    pub name: Option<String>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token lifetime in hours (default: 168, one week).
    pub expiry_hours: i64,
}

/// Default token lifetime in hours.
const DEFAULT_EXPIRY_HOURS: i64 = 168;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var            | Required | Default |
    /// |--------------------|----------|---------|
    /// | `JWT_SECRET`       | **yes**  | --      |
    /// | `JWT_EXPIRY_HOURS` | no       | `168`   |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let expiry_hours: i64 = std::env::var("JWT_EXPIRY_HOURS")
            .unwrap_or_else(|_| DEFAULT_EXPIRY_HOURS.to_string())
            .parse()
            .expect("JWT_EXPIRY_HOURS must be a valid i64");

        Self {
            secret,
            expiry_hours,
        }
    }
}

/// Generate an HS256 access token for the given user.
pub fn generate_access_token(
    user: &User,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let exp = now + config.expiry_hours * 3600;

    let claims = Claims {
        sub: user.id,
        role: user.role.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
        exp,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}
