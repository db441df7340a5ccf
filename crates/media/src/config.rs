//! Media store configuration loaded from the environment.

/// Default upload API origin.
pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

/// Default delivery (CDN) origin.
pub const DEFAULT_DELIVERY_BASE: &str = "https://res.cloudinary.com";

/// Default folder that uploads are placed in.
pub const DEFAULT_FOLDER: &str = "showreel";

/// Credentials and endpoints for the hosted media store.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub api_base: String,
    pub delivery_base: String,
    pub folder: String,
}

impl MediaConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` unless the cloud name, key and secret are all set, in
    /// which case uploads are unavailable.
    ///
    /// | Variable              | Required | Default                       |
    /// |-----------------------|----------|-------------------------------|
    /// | `MEDIA_CLOUD_NAME`    | yes      |                               |
    /// | `MEDIA_API_KEY`       | yes      |                               |
    /// | `MEDIA_API_SECRET`    | yes      |                               |
    /// | `MEDIA_API_BASE`      | no       | `https://api.cloudinary.com`  |
    /// | `MEDIA_DELIVERY_BASE` | no       | `https://res.cloudinary.com`  |
    /// | `MEDIA_FOLDER`        | no       | `showreel`                    |
    pub fn from_env() -> Option<Self> {
        Some(Self {
            cloud_name: std::env::var("MEDIA_CLOUD_NAME").ok()?,
            api_key: std::env::var("MEDIA_API_KEY").ok()?,
            api_secret: std::env::var("MEDIA_API_SECRET").ok()?,
            api_base: std::env::var("MEDIA_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            delivery_base: std::env::var("MEDIA_DELIVERY_BASE")
                .unwrap_or_else(|_| DEFAULT_DELIVERY_BASE.to_string()),
            folder: std::env::var("MEDIA_FOLDER").unwrap_or_else(|_| DEFAULT_FOLDER.to_string()),
        })
    }
}
