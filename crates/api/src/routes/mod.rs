pub mod admin;
pub mod auth;
pub mod health;
pub mod public;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree, minus the upload routes.
///
/// ```text
/// /auth/login, /auth/refresh, /auth/logout
/// /projects, /projects/featured, /projects/{id}, /stats
/// /categories, /biography, /contact-settings, /contact
/// /admin/...                                   see routes::admin
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(public::router())
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
}

/// Upload routes under `/api`, kept apart so they can carry a longer
/// timeout and a larger body limit.
pub fn upload_routes() -> Router<AppState> {
    Router::new().nest("/admin", admin::upload_router())
}
