//! Project lifecycle states and the rules for moving between them.
//!
//! A project is publicly visible only while `published`, and it may only be
//! published while it has a video URL. Every write path runs its target
//! state through [`ensure_publishable`] before touching the database; the
//! `ck_projects_published_has_video` constraint backs the same rule up.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// ProjectStatus
// ---------------------------------------------------------------------------

/// Lifecycle stage controlling public visibility of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Draft,
    Processing,
    Published,
}

impl ProjectStatus {
    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Processing => "processing",
            Self::Published => "published",
        }
    }

    /// Parse the database representation.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "draft" => Ok(Self::Draft),
            "processing" => Ok(Self::Processing),
            "published" => Ok(Self::Published),
            other => Err(CoreError::Validation(format!(
                "status: unknown project status '{other}'. Must be one of: draft, processing, published"
            ))),
        }
    }

    /// Whether projects in this state appear on the public site.
    pub fn is_public(self) -> bool {
        self == Self::Published
    }
}

impl TryFrom<String> for ProjectStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Transition rules
// ---------------------------------------------------------------------------

/// Reject any resulting state that would be published without a video.
pub fn ensure_publishable(status: ProjectStatus, video_url: Option<&str>) -> Result<(), CoreError> {
    let has_video = video_url.is_some_and(|url| !url.trim().is_empty());
    if status == ProjectStatus::Published && !has_video {
        return Err(CoreError::Validation(
            "status: a project cannot be published without a video".into(),
        ));
    }
    Ok(())
}

/// Validate a status change requested through an admin edit.
///
/// `video_url` is the URL the project will have after the edit is applied.
/// Admins may always unpublish to `draft`; `processing` is reserved for the
/// upload pipeline and cannot be requested directly.
pub fn check_admin_transition(
    from: ProjectStatus,
    to: ProjectStatus,
    video_url: Option<&str>,
) -> Result<(), CoreError> {
    if from == to {
        return ensure_publishable(to, video_url);
    }
    match to {
        ProjectStatus::Draft => Ok(()),
        ProjectStatus::Processing => Err(CoreError::Validation(
            "status: 'processing' is set by the upload pipeline and cannot be requested".into(),
        )),
        ProjectStatus::Published => ensure_publishable(to, video_url),
    }
}

/// Status a project is created with, given whether a video accompanies the
/// creation call. The published state is only reached once the upload has
/// actually succeeded, see [`status_after_upload`].
pub fn initial_status() -> ProjectStatus {
    ProjectStatus::Draft
}

/// Interim status while a video is being attached to an existing project.
///
/// Drafts are marked `processing`; a published project keeps serving its
/// current video until the replacement is stored.
pub fn status_while_uploading(current: ProjectStatus) -> ProjectStatus {
    match current {
        ProjectStatus::Draft => ProjectStatus::Processing,
        other => other,
    }
}

/// Status once a video upload bound to the project has completed.
pub fn status_after_upload() -> ProjectStatus {
    ProjectStatus::Published
}

/// Status to restore when an attach upload fails.
pub fn status_after_failed_upload(before_upload: ProjectStatus) -> ProjectStatus {
    match before_upload {
        ProjectStatus::Processing => ProjectStatus::Draft,
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Upload / submission status
// ---------------------------------------------------------------------------

/// Upload row lifecycle.
pub const UPLOAD_UPLOADING: &str = "uploading";
pub const UPLOAD_PROCESSING: &str = "processing";
pub const UPLOAD_COMPLETED: &str = "completed";
pub const UPLOAD_FAILED: &str = "failed";

/// Contact submission delivery lifecycle.
pub const SUBMISSION_PENDING: &str = "pending";
pub const SUBMISSION_SENT: &str = "sent";
pub const SUBMISSION_FAILED: &str = "failed";
