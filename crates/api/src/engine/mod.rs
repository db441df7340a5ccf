//! Orchestration of project writes.
//!
//! [`portfolio`] combines the pure ordering and status rules from
//! `showreel_core` with persistence, the media store and cache invalidation.
//! Handlers call into it and never touch the cache directly for projects.

pub mod portfolio;
