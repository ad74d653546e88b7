//! # referrals-cli
//!
//! Argument parsing and the `/buy` purchase command used by the `referrals` binary.

pub mod cli;
pub mod purchase;

pub use cli::{AckCommand, Cli, Commands};
pub use purchase::{buy_handler, parse_amount, purchase_reply};
