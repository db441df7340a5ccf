//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that take
//! `&PgPool` (or a connection, for operations that must share a caller's
//! transaction) as the first argument.

pub mod biography_repo;
pub mod category_repo;
pub mod contact_repo;
pub mod project_repo;
pub mod role_repo;
pub mod session_repo;
pub mod user_repo;
pub mod video_upload_repo;

pub use biography_repo::BiographyRepo;
pub use category_repo::CategoryRepo;
pub use contact_repo::{ContactSettingsRepo, ContactSubmissionRepo};
pub use project_repo::ProjectRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
pub use video_upload_repo::VideoUploadRepo;
