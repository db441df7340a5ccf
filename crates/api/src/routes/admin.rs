//! Admin routes mounted at `/api/admin`. Every handler requires the
//! `admin` role.

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::handlers::{admin_projects, categories, contact, site};
use crate::state::AppState;

/// Everything except the two upload routes, which live in
/// [`upload_router`] with their own timeout and body limit.
///
/// ```text
/// GET                /projects                 -> list_all
/// GET, PATCH, DELETE /projects/{id}            -> get_by_id, update, delete
/// POST               /projects/reorder         -> reorder
/// GET                /projects/{id}/uploads    -> list_uploads
/// POST               /categories               -> create
/// PATCH, DELETE      /categories/{id}          -> update, delete
/// PUT                /biography                -> upsert_biography
/// PUT                /contact-settings         -> upsert_contact_settings
/// GET                /contact-submissions      -> list_submissions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(admin_projects::list_all))
        .route(
            "/projects/{id}",
            get(admin_projects::get_by_id)
                .patch(admin_projects::update)
                .delete(admin_projects::delete),
        )
        .route("/projects/reorder", post(admin_projects::reorder))
        .route("/projects/{id}/uploads", get(admin_projects::list_uploads))
        .route("/categories", post(categories::create))
        .route(
            "/categories/{id}",
            patch(categories::update).delete(categories::delete),
        )
        .route("/biography", put(site::upsert_biography))
        .route("/contact-settings", put(site::upsert_contact_settings))
        .route("/contact-submissions", get(contact::list_submissions))
}

/// ```text
/// POST /projects             -> create (JSON or multipart)
/// POST /projects/{id}/video  -> attach_video (multipart)
/// ```
pub fn upload_router() -> Router<AppState> {
    Router::new()
        .route("/projects", post(admin_projects::create))
        .route("/projects/{id}/video", post(admin_projects::attach_video))
}
