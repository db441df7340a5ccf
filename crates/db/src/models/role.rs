//! Role lookup model.

use showreel_core::types::DbId;
use sqlx::FromRow;

/// One of the seeded roles (`admin`, `editor`).
#[derive(Debug, Clone, FromRow)]
pub struct Role {
    pub id: DbId,
    pub name: String,
}
