//! Public contact form and the admin submission log.
//!
//! A submission is recorded as `pending` before delivery is attempted and
//! then marked `sent` or `failed`, so the log is complete even when email
//! is down.

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;
use showreel_core::contact::ContactForm;
use showreel_core::status::SUBMISSION_SENT;
use showreel_core::types::DbId;
use showreel_db::models::contact::{ContactSubmission, CreateContactSubmission};
use showreel_db::repositories::{BiographyRepo, ContactSettingsRepo, ContactSubmissionRepo};
use showreel_mail::message::{auto_reply, contact_notification};

use crate::error::{AppError, AppResult};
use crate::middleware::rate_limit::ClientIp;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Signature used in auto-replies when no biography exists.
const DEFAULT_OWNER_NAME: &str = "The site owner";

#[derive(Debug, Serialize)]
pub struct SubmissionReceipt {
    pub id: DbId,
    pub status: &'static str,
}

/// POST /api/contact
pub async fn submit(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(form): Json<ContactForm>,
) -> AppResult<Json<DataResponse<SubmissionReceipt>>> {
    state.contact_limiter.check(&ip).await?;
    let form = form.normalized()?;

    let submission = ContactSubmissionRepo::create(
        &state.pool,
        &CreateContactSubmission {
            name: form.name.clone(),
            email: form.email.clone(),
            subject: form.subject.clone(),
            message: form.message.clone(),
            ip_address: Some(ip),
        },
    )
    .await?;

    if let Err(reason) = deliver(&state, &form).await {
        tracing::error!(submission_id = submission.id, error = %reason, "Contact delivery failed");
        ContactSubmissionRepo::mark_failed(&state.pool, submission.id, &reason).await?;
        return Err(AppError::Dependency(
            "Your message was saved but could not be delivered".into(),
        ));
    }

    ContactSubmissionRepo::mark_sent(&state.pool, submission.id).await?;
    tracing::info!(submission_id = submission.id, "Contact message delivered");
    Ok(Json(DataResponse {
        data: SubmissionReceipt {
            id: submission.id,
            status: SUBMISSION_SENT,
        },
    }))
}

/// GET /api/admin/contact-submissions -- newest first.
pub async fn list_submissions(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<ContactSubmission>>>> {
    let submissions = ContactSubmissionRepo::list(&state.pool, page.limit, page.offset).await?;
    Ok(Json(DataResponse { data: submissions }))
}

/// Notify the site owner and, if enabled, acknowledge the sender.
///
/// Only the owner notification decides the outcome; a failed auto-reply is
/// logged.
async fn deliver(state: &AppState, form: &ContactForm) -> Result<(), String> {
    let mailer = state.mailer().map_err(|e| e.to_string())?;
    let settings = ContactSettingsRepo::get(&state.pool)
        .await
        .map_err(|e| format!("loading contact settings: {e}"))?
        .ok_or_else(|| "no contact recipient is configured".to_string())?;

    mailer
        .send(&contact_notification(&settings.email, form))
        .await
        .map_err(|e| e.to_string())?;

    if settings.auto_reply_enabled {
        let owner = match BiographyRepo::get(&state.pool).await {
            Ok(bio) => bio.map_or_else(|| DEFAULT_OWNER_NAME.to_string(), |b| b.name),
            Err(e) => {
                tracing::warn!(error = %e, "Could not load biography for auto-reply");
                DEFAULT_OWNER_NAME.to_string()
            }
        };
        if let Err(e) = mailer.send(&auto_reply(&owner, form)).await {
            tracing::warn!(error = %e, "Auto-reply not sent");
        }
    }
    Ok(())
}
