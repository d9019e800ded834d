use std::sync::Arc;

use recettes_db::SchemaCapabilities;

use crate::config::ServerConfig;
use crate::middleware::rate_limit::RateLimiters;
use crate::storage::UploadStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: recettes_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Optional `recipes` columns, probed once at startup.
    pub schema: SchemaCapabilities,
    /// Upload directory and public URL mapping.
    pub uploads: Arc<UploadStore>,
    /// Per-route-group request budgets.
    pub rate_limits: Arc<RateLimiters>,
}

impl AppState {
    /// Assemble state from a pool, configuration and probed schema.
    pub fn new(
        pool: recettes_db::DbPool,
        config: ServerConfig,
        schema: SchemaCapabilities,
    ) -> Self {
        let uploads = Arc::new(UploadStore::new(
            config.media.upload_dir.clone(),
            config.media.public_base_url.clone(),
        ));
        let rate_limits = Arc::new(RateLimiters::from_config(&config.rate_limits));
        Self {
            pool,
            config: Arc::new(config),
            schema,
            uploads,
            rate_limits,
        }
    }
}
