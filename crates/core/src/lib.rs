//! Domain rules for the showreel portfolio backend.
//!
//! Everything in this crate is pure: no database, network or filesystem
//! access. The db and api crates call into these modules to decide what a
//! write is allowed to do before they perform it.

pub mod cache;
pub mod contact;
pub mod error;
pub mod media;
pub mod ordering;
pub mod pagination;
pub mod project;
pub mod roles;
pub mod slug;
pub mod status;
pub mod types;
