//! Error types for referral tracking.
//!
//! [`RegisterError`] is raised by bot registration (setup-time, caller-fatal). [`AckError`] covers
//! every way an acknowledgement can fail; it never escapes `ack` and is folded into
//! [`crate::AckResponse::Failure`] instead.

use thiserror::Error;

use crate::validation::ValidationError;

/// Setup-time failures of `register`. Expected to abort bot startup.
#[derive(Error, Debug)]
pub enum RegisterError {
    #[error("Invalid bot: bot object is required")]
    InvalidArgument,

    /// Carries the name of the environment variable that was not set.
    #[error("{0} environment variable is required")]
    MissingCredential(String),

    /// Carries the name of the environment variable holding the rejected key.
    #[error("Invalid {0} - failed to authenticate with referrals API")]
    InvalidCredential(String),

    #[error("Failed to validate API key with referrals service: {0}")]
    ServiceUnreachable(String),

    #[error("Invalid bot: must expose start, command or on_text registration")]
    UnsupportedBotShape,

    #[error("Config error: {0}")]
    Config(String),
}

/// Acknowledgement failures (validation, credential, HTTP status, transport, decode).
#[derive(Error, Debug)]
pub enum AckError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0} environment variable is required")]
    MissingCredential(String),

    #[error("HTTP {status}: {status_text}")]
    Http { status: u16, status_text: String },

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, RegisterError>;
