//! Request extractors for authentication, authorization and throttling.
//!
//! - [`auth::AuthUser`] -- the caller identified by a Bearer token.
//! - [`rbac::RequireAdmin`] -- an [`auth::AuthUser`] with the `admin` role.
//! - [`rate_limit::ClientIp`] and [`rate_limit::RateLimiter`] -- per-client
//!   fixed-window throttling.

pub mod auth;
pub mod rbac;
pub mod rate_limit;
