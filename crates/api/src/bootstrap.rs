//! Startup tasks that seed the database.

use showreel_core::error::CoreError;
use showreel_core::roles::ROLE_ADMIN;
use showreel_db::models::user::CreateUser;
use showreel_db::repositories::{RoleRepo, UserRepo};
use showreel_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Create the configured admin account unless the username is taken.
///
/// Returns `true` when a user was created.
pub async fn ensure_admin(pool: &DbPool, admin: &BootstrapAdmin) -> AppResult<bool> {
    if UserRepo::find_by_username(pool, &admin.username)
        .await?
        .is_some()
    {
        tracing::debug!(username = %admin.username, "Admin account already exists");
        return Ok(false);
    }

    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| CoreError::Validation(format!("ADMIN_PASSWORD: {msg}")))?;

    let role = RoleRepo::find_by_name(pool, ROLE_ADMIN)
        .await?
        .ok_or_else(|| CoreError::Internal("admin role is not seeded".into()))?;

    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: admin.username.clone(),
            email: admin.email.clone(),
            password_hash,
            role_id: role.id,
        },
    )
    .await?;
    tracing::info!(user_id = user.id, username = %user.username, "Admin account created");
    Ok(true)
}
