//! # Referrals API client
//!
//! Thin reqwest wrapper for the referrals service: [`ReferralsClient::verify_credential`] probes
//! the API key, [`ReferralsClient::ack`] reports a start or purchase action. Provides credential
//! masking for safe logging.

mod client;
mod config;

pub use client::{Acknowledger, ReferralsClient};
pub use config::{ReferralsConfig, API_KEY_ENV, API_KEY_HEADER, API_URL_ENV, DEFAULT_API_URL};

/// Masks an API key for logging: `***` plus the last 4 characters. Keys of 8 characters or fewer
/// are fully masked.
pub fn mask_credential(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "***".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("***{}", tail)
}
