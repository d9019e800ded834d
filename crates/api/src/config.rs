use std::path::PathBuf;

use recettes_core::media::{DEFAULT_MAX_IMAGE_BYTES, DEFAULT_MAX_VIDEO_BYTES, MIB};

use crate::auth::jwt::JwtConfig;

/// Image URL used when neither the recipe nor `DEFAULT_IMAGE_URL` names one.
pub const DEFAULT_IMAGE_URL: &str = "/image/default.webp";

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `4000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Image URL served for recipes that have none.
    pub default_image_url: String,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Upload storage and limits.
    pub media: MediaConfig,
    /// Per-client request budgets.
    pub rate_limits: RateLimitConfig,
}

/// Where uploads go and how big they may be.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Directory uploads are written to and served from at `/uploads`.
    pub upload_dir: PathBuf,
    /// Prefix of every public upload URL.
    pub public_base_url: String,
    pub max_image_bytes: usize,
    pub max_video_bytes: usize,
    /// Generate resized WebP variants for uploaded images.
    pub image_variants: bool,
}

/// Requests per minute per client IP; `0` disables the limit.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub auth_per_min: u32,
    pub upload_per_min: u32,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                    |
    /// |-----------------------------|----------------------------|
    /// | `HOST`                      | `0.0.0.0`                  |
    /// | `PORT`                      | `4000`                     |
    /// | `CORS_ORIGINS`              | `http://localhost:5174`    |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                       |
    /// | `DEFAULT_IMAGE_URL`         | `/image/default.webp`      |
    /// | `UPLOAD_DIR`                | `uploads`                  |
    /// | `PUBLIC_BASE_URL`           | `http://localhost:<PORT>`  |
    /// | `MAX_IMAGE_MB`              | `4`                        |
    /// | `MAX_VIDEO_MB`              | `20`                       |
    /// | `IMAGE_VARIANTS`            | `true`                     |
    /// | `AUTH_RATE_LIMIT_PER_MIN`   | `20`                       |
    /// | `UPLOAD_RATE_LIMIT_PER_MIN` | `30`                       |
    ///
    /// JWT settings are documented on [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on any unparseable value so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "4000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5174".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let default_image_url = default_image_url_from_env();

        let media = MediaConfig {
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "uploads".into())
                .into(),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}")),
            max_image_bytes: env_megabytes("MAX_IMAGE_MB", DEFAULT_MAX_IMAGE_BYTES / MIB),
            max_video_bytes: env_megabytes("MAX_VIDEO_MB", DEFAULT_MAX_VIDEO_BYTES / MIB),
            image_variants: env_flag("IMAGE_VARIANTS", true),
        };

        let rate_limits = RateLimitConfig {
            auth_per_min: env_u32("AUTH_RATE_LIMIT_PER_MIN", 20),
            upload_per_min: env_u32("UPLOAD_RATE_LIMIT_PER_MIN", 30),
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            default_image_url,
            jwt,
            media,
            rate_limits,
        }
    }
}

/// `DEFAULT_IMAGE_URL`, shared by the server and the seed tool.
pub fn default_image_url_from_env() -> String {
    resolve_default_image_url(std::env::var("DEFAULT_IMAGE_URL").ok())
}

fn resolve_default_image_url(raw: Option<String>) -> String {
    raw.map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string())
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .map(|v| {
            v.parse()
                .unwrap_or_else(|_| panic!("{key} must be a valid u32"))
        })
        .unwrap_or(default)
}

fn env_megabytes(key: &str, default_mb: usize) -> usize {
    let mb: usize = std::env::var(key)
        .map(|v| {
            v.parse()
                .unwrap_or_else(|_| panic!("{key} must be a whole number of megabytes"))
        })
        .unwrap_or(default_mb);
    mb * MIB
}

fn env_flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_image_url_falls_back_when_unset_or_blank() {
        assert_eq!(resolve_default_image_url(None), DEFAULT_IMAGE_URL);
        assert_eq!(resolve_default_image_url(Some("  ".into())), DEFAULT_IMAGE_URL);
        assert_eq!(
            resolve_default_image_url(Some("https://cdn.test/plat.webp".into())),
            "https://cdn.test/plat.webp"
        );
    }
}
