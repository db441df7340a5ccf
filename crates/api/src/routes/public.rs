//! Unauthenticated read routes and the contact form.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{categories, contact, projects, site};
use crate::state::AppState;

/// ```text
/// GET  /projects            -> published list (?category=)
/// GET  /projects/featured   -> published and featured
/// GET  /projects/{id}       -> one published project
/// GET  /stats               -> portfolio statistics
/// GET  /categories          -> categories
/// GET  /biography           -> biography
/// GET  /contact-settings    -> contact settings
/// POST /contact             -> contact form (rate-limited)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(projects::list_published))
        .route("/projects/featured", get(projects::list_featured))
        .route("/projects/{id}", get(projects::get_published))
        .route("/stats", get(projects::stats))
        .route("/categories", get(categories::list))
        .route("/biography", get(site::get_biography))
        .route("/contact-settings", get(site::get_contact_settings))
        .route("/contact", post(contact::submit))
}
