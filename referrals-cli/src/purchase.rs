//! `/buy <amount>`: acknowledges a purchase for the sender and replies with the outcome.

use std::sync::Arc;

use referrals_client::Acknowledger;
use referrals_core::{start_handler, AckAction, AckResponse, StartContext, StartHandler};
use teloxide::{prelude::*, types::ChatId};
use tracing::{info, warn};

pub const BUY_USAGE: &str = "Usage: /buy <amount>";

/// Amount argument of `/buy <amount>`; `None` when missing or not a number.
pub fn parse_amount(text: Option<&str>) -> Option<f64> {
    text?.split_whitespace().nth(1)?.parse().ok()
}

/// Reply text for an acknowledgement outcome.
pub fn purchase_reply(amount: f64, response: &AckResponse) -> String {
    match response.error() {
        None => format!("Purchase of {} recorded.", amount),
        Some(error) => format!("Purchase not recorded: {}", error),
    }
}

/// Handler for the `buy` command. Replies are sent through `bot` to the originating chat.
pub fn buy_handler(bot: teloxide::Bot, acknowledger: Arc<dyn Acknowledger>) -> StartHandler {
    start_handler(move |ctx: StartContext| {
        let bot = bot.clone();
        let acknowledger = acknowledger.clone();
        async move {
            let Some(sender) = ctx.sender().cloned() else {
                return;
            };
            let reply = match parse_amount(ctx.text.as_deref()) {
                Some(amount) => {
                    let response = acknowledger
                        .ack(AckAction::purchase(sender.id, sender.username, amount).into())
                        .await;
                    info!(
                        user_id = sender.id,
                        amount,
                        success = response.is_success(),
                        "Purchase handled"
                    );
                    purchase_reply(amount, &response)
                }
                None => BUY_USAGE.to_string(),
            };

            if let Some(chat_id) = ctx.chat_id {
                if let Err(e) = bot.send_message(ChatId(chat_id), reply).await {
                    warn!(error = %e, chat_id, "Failed to send purchase reply");
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use referrals_core::{AckPayload, Sender};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingAcknowledger {
        payloads: Mutex<Vec<AckPayload>>,
    }

    #[async_trait]
    impl Acknowledger for RecordingAcknowledger {
        async fn ack(&self, payload: AckPayload) -> AckResponse {
            let response = match payload.validate() {
                Ok(_) => AckResponse::acknowledged(None),
                Err(e) => AckResponse::failure(e.to_string()),
            };
            self.payloads.lock().unwrap().push(payload);
            response
        }
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(Some("/buy 9.99")), Some(9.99));
        assert_eq!(parse_amount(Some("/buy   20")), Some(20.0));
        assert_eq!(parse_amount(Some("/buy")), None);
        assert_eq!(parse_amount(Some("/buy ten")), None);
        assert_eq!(parse_amount(None), None);
    }

    #[test]
    fn test_purchase_reply() {
        assert_eq!(
            purchase_reply(9.99, &AckResponse::acknowledged(None)),
            "Purchase of 9.99 recorded."
        );
        assert_eq!(
            purchase_reply(1.0, &AckResponse::failure("HTTP 400: Bad Request")),
            "Purchase not recorded: HTTP 400: Bad Request"
        );
    }

    #[tokio::test]
    async fn test_buy_handler_acks_purchase() {
        let recorder = Arc::new(RecordingAcknowledger::default());
        let handler = buy_handler(teloxide::Bot::new("dummy_token"), recorder.clone());

        handler(StartContext {
            text: Some("/buy 9.99".to_string()),
            from: Some(Sender {
                id: 12345,
                username: Some("testuser".to_string()),
            }),
            ..Default::default()
        })
        .await;

        let payloads = recorder.payloads.lock().unwrap();
        assert_eq!(payloads.len(), 1);
        assert_eq!(
            payloads[0].validate().unwrap(),
            AckAction::purchase(12345, Some("testuser".to_string()), 9.99)
        );
    }

    #[tokio::test]
    async fn test_buy_handler_ignores_bad_amount_and_missing_sender() {
        let recorder = Arc::new(RecordingAcknowledger::default());
        let handler = buy_handler(teloxide::Bot::new("dummy_token"), recorder.clone());

        handler(StartContext {
            text: Some("/buy lots".to_string()),
            from: Some(Sender {
                id: 1,
                username: None,
            }),
            ..Default::default()
        })
        .await;
        handler(StartContext {
            text: Some("/buy 5".to_string()),
            ..Default::default()
        })
        .await;

        assert!(recorder.payloads.lock().unwrap().is_empty());
    }
}
