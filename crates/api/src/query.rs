//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?limit=&offset=`; clamped in the repository layer.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?category=slug` on the public project list.
#[derive(Debug, Deserialize)]
pub struct CategoryFilter {
    pub category: Option<String>,
}
