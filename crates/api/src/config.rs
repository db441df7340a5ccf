use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// Timeout for ordinary requests in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Timeout for a single media store upload in seconds (default: `300`).
    /// Upload routes get this plus [`UPLOAD_ROUTE_SLACK_SECS`] as their
    /// request timeout.
    pub upload_timeout_secs: u64,
    /// Contact-form submissions allowed per client IP per window (default: `5`).
    pub contact_rate_limit: u32,
    /// Length of the contact rate-limit window in seconds (default: `3600`).
    pub contact_rate_window_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
}

/// Extra time an upload route gets on top of the media store timeout, so the
/// store timeout fires first and produces a typed error.
pub const UPLOAD_ROUTE_SLACK_SECS: u64 = 30;

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `HOST`                     | `0.0.0.0`               |
    /// | `PORT`                     | `3000`                  |
    /// | `CORS_ORIGINS`             | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                    |
    /// | `UPLOAD_TIMEOUT_SECS`      | `300`                   |
    /// | `CONTACT_RATE_LIMIT`       | `5`                     |
    /// | `CONTACT_RATE_WINDOW_SECS` | `3600`                  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            upload_timeout_secs: env_or("UPLOAD_TIMEOUT_SECS", 300),
            contact_rate_limit: env_or("CONTACT_RATE_LIMIT", 5),
            contact_rate_window_secs: env_or("CONTACT_RATE_WINDOW_SECS", 3600),
            jwt: JwtConfig::from_env(),
        }
    }
}

/// Parse a numeric env var, falling back to `default` when unset.
///
/// # Panics
///
/// Panics if the variable is set but does not parse.
fn env_or<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{name} must be a valid number: {e}")),
        Err(_) => default,
    }
}

/// Credentials for the admin account created at startup if missing.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl BootstrapAdmin {
    /// | Env Var          | Required |
    /// |------------------|----------|
    /// | `ADMIN_USERNAME` | yes      |
    /// | `ADMIN_EMAIL`    | yes      |
    /// | `ADMIN_PASSWORD` | yes      |
    ///
    /// Returns `None` unless all three are set.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            username: std::env::var("ADMIN_USERNAME").ok()?,
            email: std::env::var("ADMIN_EMAIL").ok()?,
            password: std::env::var("ADMIN_PASSWORD").ok()?,
        })
    }
}
