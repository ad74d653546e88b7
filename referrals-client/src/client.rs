//! [`ReferralsClient`]: credential probe (raises [`RegisterError`]) and `ack` (never raises,
//! always returns an [`AckResponse`]).

use std::sync::Arc;

use async_trait::async_trait;
use referrals_core::{AckError, AckPayload, AckResponse, RegisterError};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::config::{ReferralsConfig, API_KEY_HEADER};
use crate::mask_credential;

/// Reports actions to the referrals service. Handlers installed by registration call through
/// this trait so tests can substitute a recorder.
#[async_trait]
pub trait Acknowledger: Send + Sync {
    async fn ack(&self, payload: AckPayload) -> AckResponse;
}

/// HTTP client for the referrals API. Clones share one connection pool.
#[derive(Clone)]
pub struct ReferralsClient {
    http: reqwest::Client,
    config: Arc<ReferralsConfig>,
}

impl ReferralsClient {
    pub fn new(config: ReferralsConfig) -> Result<Self, RegisterError> {
        config.validate()?;
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| RegisterError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    /// Client configured by [`ReferralsConfig::from_env`].
    pub fn from_env() -> Result<Self, RegisterError> {
        Self::new(ReferralsConfig::from_env()?)
    }

    pub fn config(&self) -> &ReferralsConfig {
        &self.config
    }

    fn credential(&self) -> Option<String> {
        self.config.credential()
    }

    /// Checks that the credential is set and accepted by the service (`HEAD /apps/me`).
    #[instrument(skip(self))]
    pub async fn verify_credential(&self) -> Result<(), RegisterError> {
        let var = &self.config.api_key_env;
        let key = self
            .credential()
            .ok_or_else(|| RegisterError::MissingCredential(var.clone()))?;

        let url = self.config.probe_url();
        info!(url = %url, api_key = %mask_credential(&key), "Validating referrals API key");

        let response = self
            .http
            .head(&url)
            .header(API_KEY_HEADER, key)
            .send()
            .await
            .map_err(|e| RegisterError::ServiceUnreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Referrals API rejected the API key");
            return Err(RegisterError::InvalidCredential(var.clone()));
        }
        Ok(())
    }

    /// Validates `action` and posts it to `/referrals/ack`. Every failure is returned as
    /// [`AckResponse::Failure`].
    pub async fn ack(&self, action: impl Into<AckPayload>) -> AckResponse {
        self.send_ack(action.into()).await
    }

    #[instrument(skip(self, payload), fields(action = ?payload.action, user_id = ?payload.user_id))]
    async fn send_ack(&self, payload: AckPayload) -> AckResponse {
        let result = self.try_ack(&payload).await;
        match &result {
            Ok(_) => info!("Referral action acknowledged"),
            Err(e) => warn!(error = %e, "Referral action not acknowledged"),
        }
        result.into()
    }

    async fn try_ack(&self, payload: &AckPayload) -> Result<Option<Value>, AckError> {
        let action = payload.validate()?;
        let key = self
            .credential()
            .ok_or_else(|| AckError::MissingCredential(self.config.api_key_env.clone()))?;

        let response = self
            .http
            .post(self.config.ack_url())
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, key)
            .json(&action)
            .send()
            .await
            .map_err(|e| AckError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AckError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AckError::Transport(e.to_string()))?;
        // An empty body is not valid JSON and fails like any other undecodable body.
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| AckError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Acknowledger for ReferralsClient {
    async fn ack(&self, payload: AckPayload) -> AckResponse {
        self.send_ack(payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_url() {
        let config = ReferralsConfig::default().with_api_url("::nope::");
        assert!(matches!(
            ReferralsClient::new(config),
            Err(RegisterError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_payload_needs_no_credential() {
        let config = ReferralsConfig::default().with_api_key_env("REFERRALS_CLIENT_UNSET_KEY");
        let client = ReferralsClient::new(config).unwrap();
        let response = client
            .ack(AckPayload {
                action: Some("purchase".to_string()),
                user_id: Some(1),
                ..Default::default()
            })
            .await;
        let error = response.error().unwrap();
        assert!(error.contains("amount"));
        assert!(!error.contains("REFERRALS_CLIENT_UNSET_KEY"));
    }
}
