//! Client configuration: API base URL, credential variable name, request timeout.
//! Loaded from `OPENSERV_REFERRALS_API_URL`; the credential itself is read on every call.

use std::env;
use std::time::Duration;

use referrals_core::RegisterError;

/// Production base URL of the referrals API.
pub const DEFAULT_API_URL: &str = "https://referrals.openserv.ai/api";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENSERV_REFERRALS_API_KEY";

/// Optional override of [`DEFAULT_API_URL`].
pub const API_URL_ENV: &str = "OPENSERV_REFERRALS_API_URL";

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "x-openserv-referrals-api-key";

#[derive(Debug, Clone, PartialEq)]
pub struct ReferralsConfig {
    /// Base URL; endpoint paths are appended to it.
    pub api_url: String,
    /// Name of the environment variable the credential is read from.
    pub api_key_env: String,
    /// Per-request timeout; `None` leaves it to the transport.
    pub timeout: Option<Duration>,
}

impl Default for ReferralsConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key_env: API_KEY_ENV.to_string(),
            timeout: None,
        }
    }
}

impl ReferralsConfig {
    /// Defaults, with `OPENSERV_REFERRALS_API_URL` overriding the base URL when set.
    pub fn from_env() -> Result<Self, RegisterError> {
        let mut config = Self::default();
        if let Ok(url) = env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_url = url;
            }
        }
        config.validate()?;
        Ok(config)
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_api_key_env(mut self, api_key_env: impl Into<String>) -> Self {
        self.api_key_env = api_key_env.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The base URL must parse.
    pub fn validate(&self) -> Result<(), RegisterError> {
        if reqwest::Url::parse(&self.api_url).is_err() {
            return Err(RegisterError::Config(format!(
                "{} is not a valid URL: {}",
                API_URL_ENV, self.api_url
            )));
        }
        Ok(())
    }

    /// Current credential, read fresh from the environment. Empty counts as unset.
    pub fn credential(&self) -> Option<String> {
        env::var(&self.api_key_env).ok().filter(|k| !k.is_empty())
    }

    /// `HEAD` endpoint used to check the credential.
    pub fn probe_url(&self) -> String {
        format!("{}/apps/me", self.api_url.trim_end_matches('/'))
    }

    /// `POST` endpoint receiving acknowledgements.
    pub fn ack_url(&self) -> String {
        format!("{}/referrals/ack", self.api_url.trim_end_matches('/'))
    }
}
