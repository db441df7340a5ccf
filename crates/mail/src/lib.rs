//! Outbound email for contact-form notifications.
//!
//! [`Mailer`] is the delivery seam; [`smtp::SmtpMailer`] sends through an
//! SMTP relay with `lettre`. Message bodies are assembled by
//! [`message`] so they can be checked without a transport.

pub mod message;
pub mod smtp;

use async_trait::async_trait;

pub use message::OutgoingEmail;
pub use smtp::{EmailConfig, SmtpMailer};

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

/// Sends a fully assembled email.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError>;
}
