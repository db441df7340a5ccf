//! Request handlers, one module per resource.
//!
//! Handlers validate input, delegate project writes to
//! [`crate::engine::portfolio`] and everything else to the repositories in
//! `showreel_db`, and map failures through [`crate::error::AppError`].

pub mod admin_projects;
pub mod auth;
pub mod categories;
pub mod contact;
pub mod projects;
pub mod site;
