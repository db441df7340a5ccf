//! Credentials and tokens for the admin API.
//!
//! - [`password`] -- Argon2id hashing for stored user passwords.
//! - [`jwt`] -- signed access tokens and hashed refresh tokens.

pub mod jwt;
pub mod password;
