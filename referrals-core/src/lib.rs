//! # referrals-core
//!
//! Core types and traits for referral tracking: [`AckAction`] and its validation, the normalized
//! [`AckResponse`], [`RegisterError`] / [`AckError`], the [`ReferralBot`] capability trait with
//! its [`AdapterVariant`]s, and tracing initialization. Transport agnostic; used by
//! referrals-client and referrals-telegram.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;
pub mod validation;

pub use bot::{
    start_handler, text_handler, AdapterVariant, BotCapabilities, ReferralBot, StartHandler,
    TextHandler, START_COMMAND, START_PATTERN,
};
pub use error::{AckError, RegisterError, Result};
pub use logger::init_tracing;
pub use types::{
    AckAction, AckPayload, AckResponse, Sender, StartContext, TextMatch, ACK_SUCCESS_MESSAGE,
};
pub use validation::{FieldIssue, ValidationError};
