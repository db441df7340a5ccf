use std::sync::Arc;

use showreel_mail::Mailer;
use showreel_media::MediaStore;

use crate::cache::TtlCache;
use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};
use crate::middleware::rate_limit::RateLimiter;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is an `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: showreel_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Read-through cache for public endpoints.
    pub cache: Arc<TtlCache>,
    /// Remote media storage; `None` when not configured.
    pub media: Option<Arc<dyn MediaStore>>,
    /// Outbound email; `None` when SMTP is not configured.
    pub mailer: Option<Arc<dyn Mailer>>,
    /// Per-IP limiter for the public contact form.
    pub contact_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Assemble state with an empty cache and a limiter sized from `config`.
    pub fn new(
        pool: showreel_db::DbPool,
        config: ServerConfig,
        media: Option<Arc<dyn MediaStore>>,
        mailer: Option<Arc<dyn Mailer>>,
    ) -> Self {
        let contact_limiter = Arc::new(RateLimiter::new(
            config.contact_rate_limit,
            std::time::Duration::from_secs(config.contact_rate_window_secs),
        ));
        Self {
            pool,
            config: Arc::new(config),
            cache: Arc::new(TtlCache::new()),
            media,
            mailer,
            contact_limiter,
        }
    }

    /// The media store, or a dependency error if uploads are not configured.
    pub fn media_store(&self) -> AppResult<&dyn MediaStore> {
        self.media
            .as_deref()
            .ok_or_else(|| AppError::Dependency("Media storage is not configured".into()))
    }

    /// The mailer, or a dependency error if email is not configured.
    pub fn mailer(&self) -> AppResult<&dyn Mailer> {
        self.mailer
            .as_deref()
            .ok_or_else(|| AppError::Dependency("Email delivery is not configured".into()))
    }
}
