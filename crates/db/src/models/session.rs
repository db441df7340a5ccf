//! Refresh-token sessions.

use showreel_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A refresh session as returned when it is consumed.
///
/// The token hash never leaves the database layer.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshSession {
    pub id: DbId,
    pub user_id: DbId,
    pub expires_at: Timestamp,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}
