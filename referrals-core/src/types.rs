//! Core types: sender identity, start/text contexts seen by handlers, acknowledgement actions
//! and the normalized acknowledgement result.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AckError;

/// Message returned with every successful acknowledgement.
pub const ACK_SUCCESS_MESSAGE: &str = "Action acknowledged successfully";

/// Sender identity as reported by the bot framework (`from.id`, `from.username`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sender {
    pub id: i64,
    pub username: Option<String>,
}

/// What a start (or any command) handler receives: the framework's start payload (if it parses
/// one), the raw message text, the sender and the chat to answer in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartContext {
    pub start_payload: Option<String>,
    pub text: Option<String>,
    pub from: Option<Sender>,
    pub chat_id: Option<i64>,
}

impl StartContext {
    /// Referral code: the start payload when non-empty, else the first whitespace-delimited
    /// token after the command in the raw text.
    pub fn referral_code(&self) -> Option<String> {
        if let Some(payload) = self.start_payload.as_deref().map(str::trim) {
            if !payload.is_empty() {
                return Some(payload.to_string());
            }
        }
        self.text
            .as_deref()
            .and_then(|text| text.split_whitespace().nth(1))
            .map(str::to_string)
    }

    /// Sender with a usable id; an id of 0 means the framework had no sender.
    pub fn sender(&self) -> Option<&Sender> {
        self.from.as_ref().filter(|s| s.id != 0)
    }
}

/// What a regex text-listener handler receives: the message plus the pattern's capture groups
/// (index 0 is the whole match).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextMatch {
    pub text: Option<String>,
    pub from: Option<Sender>,
    pub chat_id: Option<i64>,
    pub captures: Vec<Option<String>>,
}

impl TextMatch {
    /// Capture group 1, trimmed; `None` when missing or blank.
    pub fn referral_code(&self) -> Option<String> {
        self.captures
            .get(1)
            .and_then(|c| c.as_deref())
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    }

    pub fn sender(&self) -> Option<&Sender> {
        self.from.as_ref().filter(|s| s.id != 0)
    }
}

/// A validated acknowledgement action. Serializes to the wire shape
/// `{"action": "start"|"purchase", "userId": .., "username"?: .., "code"|"amount": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum AckAction {
    Start {
        #[serde(rename = "userId")]
        user_id: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        code: String,
    },
    Purchase {
        #[serde(rename = "userId")]
        user_id: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        amount: f64,
    },
}

impl AckAction {
    pub fn start(user_id: i64, username: Option<String>, code: impl Into<String>) -> Self {
        Self::Start {
            user_id,
            username,
            code: code.into(),
        }
    }

    pub fn purchase(user_id: i64, username: Option<String>, amount: f64) -> Self {
        Self::Purchase {
            user_id,
            username,
            amount,
        }
    }

    /// Wire name of the action tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::Purchase { .. } => "purchase",
        }
    }

    pub fn user_id(&self) -> i64 {
        match self {
            Self::Start { user_id, .. } | Self::Purchase { user_id, .. } => *user_id,
        }
    }
}

/// Unvalidated input to `ack`. Every field is optional and `action` is free text, so payloads
/// from untrusted JSON can be checked with [`AckPayload::validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AckPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl From<AckAction> for AckPayload {
    fn from(action: AckAction) -> Self {
        match action {
            AckAction::Start {
                user_id,
                username,
                code,
            } => Self {
                user_id: Some(user_id),
                username,
                action: Some("start".to_string()),
                code: Some(code),
                amount: None,
            },
            AckAction::Purchase {
                user_id,
                username,
                amount,
            } => Self {
                user_id: Some(user_id),
                username,
                action: Some("purchase".to_string()),
                code: None,
                amount: Some(amount),
            },
        }
    }
}

/// Normalized acknowledgement result. Exactly one variant is populated.
#[derive(Debug, Clone, PartialEq)]
pub enum AckResponse {
    Success {
        data: Option<Value>,
        message: Option<String>,
    },
    Failure {
        error: String,
    },
}

impl AckResponse {
    /// Success carrying the response body (if any) and the fixed confirmation message.
    pub fn acknowledged(data: Option<Value>) -> Self {
        Self::Success {
            data,
            message: Some(ACK_SUCCESS_MESSAGE.to_string()),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Error text of a failure; `None` on success.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failure { error } => Some(error.as_str()),
            Self::Success { .. } => None,
        }
    }

    /// Response body of a success; `None` on failure or when the service sent nothing.
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Success { data, .. } => data.as_ref(),
            Self::Failure { .. } => None,
        }
    }
}

impl From<std::result::Result<Option<Value>, AckError>> for AckResponse {
    fn from(result: std::result::Result<Option<Value>, AckError>) -> Self {
        match result {
            Ok(data) => Self::acknowledged(data),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx(payload: Option<&str>, text: Option<&str>) -> StartContext {
        StartContext {
            start_payload: payload.map(str::to_string),
            text: text.map(str::to_string),
            from: Some(Sender {
                id: 12345,
                username: Some("testuser".to_string()),
            }),
            chat_id: None,
        }
    }

    #[test]
    fn test_referral_code_prefers_start_payload() {
        let c = ctx(Some("REF123ABC"), Some("/start OTHER"));
        assert_eq!(c.referral_code().as_deref(), Some("REF123ABC"));
    }

    #[test]
    fn test_referral_code_falls_back_to_text() {
        assert_eq!(
            ctx(None, Some("/start REF123ABC")).referral_code().as_deref(),
            Some("REF123ABC")
        );
        assert_eq!(
            ctx(Some(""), Some("/start   REF9  tail")).referral_code().as_deref(),
            Some("REF9")
        );
    }

    #[test]
    fn test_referral_code_absent() {
        assert_eq!(ctx(None, Some("/start")).referral_code(), None);
        assert_eq!(ctx(None, None).referral_code(), None);
    }

    #[test]
    fn test_zero_sender_id_is_absent() {
        let mut c = ctx(Some("X"), None);
        c.from = Some(Sender::default());
        assert!(c.sender().is_none());
    }

    #[test]
    fn test_text_match_referral_code_trims_group() {
        let m = TextMatch {
            text: Some("/start  REF123ABC ".to_string()),
            from: None,
            chat_id: None,
            captures: vec![Some("/start  REF123ABC ".to_string()), Some(" REF123ABC ".to_string())],
        };
        assert_eq!(m.referral_code().as_deref(), Some("REF123ABC"));

        let blank = TextMatch {
            captures: vec![Some("/start  ".to_string()), Some("  ".to_string())],
            ..Default::default()
        };
        assert_eq!(blank.referral_code(), None);
    }

    #[test]
    fn test_action_wire_shape_omits_missing_username() {
        let body = serde_json::to_value(AckAction::start(12345, None, "REF123ABC")).unwrap();
        assert_eq!(
            body,
            json!({"userId": 12345, "action": "start", "code": "REF123ABC"})
        );

        let body =
            serde_json::to_value(AckAction::purchase(67890, Some("buyer".to_string()), 29.99))
                .unwrap();
        assert_eq!(
            body,
            json!({"userId": 67890, "username": "buyer", "action": "purchase", "amount": 29.99})
        );
    }

    #[test]
    fn test_payload_deserializes_camel_case() {
        let payload: AckPayload =
            serde_json::from_value(json!({"userId": 1, "action": "purchase", "amount": 5.0}))
                .unwrap();
        assert_eq!(payload.user_id, Some(1));
        assert_eq!(payload.action.as_deref(), Some("purchase"));
        assert_eq!(payload.amount, Some(5.0));
        assert!(payload.code.is_none());
    }

    #[test]
    fn test_response_from_result() {
        let ok: AckResponse = Ok(Some(json!({"success": true}))).into();
        assert!(ok.is_success());
        assert_eq!(ok.data(), Some(&json!({"success": true})));

        let err: AckResponse = Err(AckError::Transport("Network error".to_string())).into();
        assert_eq!(err, AckResponse::failure("Network error"));
        assert_eq!(err.error(), Some("Network error"));
    }
}
