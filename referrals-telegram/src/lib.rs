//! # referrals-telegram
//!
//! Referral tracking for Telegram bots: [`register`] installs a `/start` handler on any
//! [`referrals_core::ReferralBot`] and acknowledges referral codes through the referrals API.
//! Also provides a teloxide-backed bot ([`TelegramReferralBot`]), message adapters, minimal
//! config and a REPL runner.

mod adapters;
mod bot;
mod config;
mod register;
mod router;
mod runner;

pub use adapters::{parse_command, TelegramMessageWrapper, TelegramUserWrapper};
pub use bot::TelegramReferralBot;
pub use config::TelegramConfig;
pub use register::{
    install_handlers, referral_start_handler, referral_text_handler, register, register_with,
};
pub use router::{CommandRouter, InboundMessage};
pub use runner::run_repl;
