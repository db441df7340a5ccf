use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use showreel_api::bootstrap::ensure_admin;
use showreel_api::config::{BootstrapAdmin, ServerConfig};
use showreel_api::router::build_app_router;
use showreel_api::state::AppState;
use showreel_mail::{EmailConfig, Mailer, SmtpMailer};
use showreel_media::{HostedMediaStore, MediaConfig, MediaStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = showreel_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    showreel_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    showreel_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database ready, migrations applied");

    if let Some(admin) = BootstrapAdmin::from_env() {
        ensure_admin(&pool, &admin)
            .await
            .map_err(|e| anyhow::anyhow!("Admin bootstrap failed: {e}"))?;
    }

    // --- External services ---
    let media: Option<Arc<dyn MediaStore>> = match MediaConfig::from_env() {
        Some(media_config) => {
            tracing::info!(cloud = %media_config.cloud_name, "Media store configured");
            Some(Arc::new(HostedMediaStore::new(media_config)) as Arc<dyn MediaStore>)
        }
        None => {
            tracing::warn!("MEDIA_* not set, uploads are disabled");
            None
        }
    };

    let mailer: Option<Arc<dyn Mailer>> = match EmailConfig::from_env() {
        Some(email_config) => {
            let smtp = SmtpMailer::new(email_config).context("Invalid SMTP configuration")?;
            tracing::info!("SMTP delivery configured");
            Some(Arc::new(smtp) as Arc<dyn Mailer>)
        }
        None => {
            tracing::warn!("SMTP_HOST not set, contact messages will not be delivered");
            None
        }
    };

    // --- Router ---
    let state = AppState::new(pool, config.clone(), media, mailer);
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().context("Invalid HOST address")?,
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// `LOG_FORMAT=json` switches to JSON lines; filtering follows `RUST_LOG`.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "showreel_api=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Resolve on SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
