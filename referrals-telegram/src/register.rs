//! Referral registration: checks the credential, picks the bot's [`AdapterVariant`] and installs
//! the start handler that acknowledges referral codes.

use std::sync::Arc;

use referrals_client::{Acknowledger, ReferralsClient};
use referrals_core::{
    start_handler, text_handler, AckAction, AdapterVariant, ReferralBot, RegisterError, Sender,
    StartContext, StartHandler, TextHandler, TextMatch, START_COMMAND, START_PATTERN,
};
use regex::Regex;
use tracing::{debug, info, instrument, warn};

/// Registers `bot` for referral tracking using a client configured from the environment.
///
/// Fails with [`RegisterError::InvalidArgument`] when no bot is given, and otherwise as
/// [`register_with`] does.
pub async fn register<B>(bot: Option<&mut B>) -> Result<AdapterVariant, RegisterError>
where
    B: ReferralBot + ?Sized,
{
    let bot = bot.ok_or(RegisterError::InvalidArgument)?;
    let client = ReferralsClient::from_env()?;
    register_with(Some(bot), client).await
}

/// Registers `bot` using `client`: credential must be set and accepted by the service, then the
/// start handler is installed through the highest-priority hook the bot exposes.
///
/// Each call installs another handler; repeated registration is not deduplicated.
#[instrument(skip(bot, client))]
pub async fn register_with<B>(
    bot: Option<&mut B>,
    client: ReferralsClient,
) -> Result<AdapterVariant, RegisterError>
where
    B: ReferralBot + ?Sized,
{
    let bot = bot.ok_or(RegisterError::InvalidArgument)?;
    client.verify_credential().await?;
    let variant = install_handlers(bot, Arc::new(client))?;
    info!(variant = variant.name(), "Referral tracking registered");
    Ok(variant)
}

/// Detects the adapter variant and installs the referral handler, acknowledging through
/// `acknowledger`. Performs no network call itself.
pub fn install_handlers<B>(
    bot: &mut B,
    acknowledger: Arc<dyn Acknowledger>,
) -> Result<AdapterVariant, RegisterError>
where
    B: ReferralBot + ?Sized,
{
    let variant =
        AdapterVariant::detect(bot.capabilities()).ok_or(RegisterError::UnsupportedBotShape)?;
    match variant {
        AdapterVariant::StartMethod => bot.start(referral_start_handler(acknowledger))?,
        AdapterVariant::CommandMethod => {
            bot.command(START_COMMAND, referral_start_handler(acknowledger))?
        }
        AdapterVariant::TextListenerMethod => {
            let pattern = Regex::new(START_PATTERN)
                .map_err(|e| RegisterError::Config(format!("Invalid start pattern: {}", e)))?;
            bot.on_text(pattern, referral_text_handler(acknowledger))?
        }
    }
    Ok(variant)
}

/// Handler for start-method and command-method bots.
pub fn referral_start_handler(acknowledger: Arc<dyn Acknowledger>) -> StartHandler {
    start_handler(move |ctx: StartContext| {
        let acknowledger = acknowledger.clone();
        async move {
            let code = ctx.referral_code();
            let sender = ctx.sender().cloned();
            acknowledge_start(acknowledger.as_ref(), code, sender).await;
        }
    })
}

/// Handler for text-listener bots; the code is capture group 1 of [`START_PATTERN`].
pub fn referral_text_handler(acknowledger: Arc<dyn Acknowledger>) -> TextHandler {
    text_handler(move |m: TextMatch| {
        let acknowledger = acknowledger.clone();
        async move {
            let code = m.referral_code();
            let sender = m.sender().cloned();
            acknowledge_start(acknowledger.as_ref(), code, sender).await;
        }
    })
}

/// Acknowledges a start when both code and sender are known. Failures are logged, not raised.
async fn acknowledge_start(
    acknowledger: &dyn Acknowledger,
    code: Option<String>,
    sender: Option<Sender>,
) {
    let (Some(code), Some(sender)) = (code.filter(|c| !c.is_empty()), sender) else {
        debug!("Start without referral code or sender, nothing to acknowledge");
        return;
    };

    let user_id = sender.id;
    let response = acknowledger
        .ack(AckAction::start(user_id, sender.username, code).into())
        .await;
    match response.error() {
        None => info!(user_id, "Referral start acknowledged"),
        Some(error) => warn!(user_id, error = %error, "Referral start not acknowledged"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use referrals_core::{AckPayload, AckResponse, BotCapabilities};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingAcknowledger {
        payloads: Mutex<Vec<AckPayload>>,
        fail: bool,
    }

    #[async_trait]
    impl Acknowledger for RecordingAcknowledger {
        async fn ack(&self, payload: AckPayload) -> AckResponse {
            self.payloads.lock().unwrap().push(payload);
            if self.fail {
                AckResponse::failure("HTTP 500: Internal Server Error")
            } else {
                AckResponse::acknowledged(None)
            }
        }
    }

    #[derive(Default)]
    struct FakeBot {
        caps: BotCapabilities,
        starts: Vec<StartHandler>,
        commands: Vec<(String, StartHandler)>,
        texts: Vec<(Regex, TextHandler)>,
    }

    impl ReferralBot for FakeBot {
        fn capabilities(&self) -> BotCapabilities {
            self.caps
        }

        fn start(&mut self, handler: StartHandler) -> referrals_core::Result<()> {
            self.starts.push(handler);
            Ok(())
        }

        fn command(&mut self, name: &str, handler: StartHandler) -> referrals_core::Result<()> {
            self.commands.push((name.to_string(), handler));
            Ok(())
        }

        fn on_text(&mut self, pattern: Regex, handler: TextHandler) -> referrals_core::Result<()> {
            self.texts.push((pattern, handler));
            Ok(())
        }
    }

    fn bot(start: bool, command: bool, on_text: bool) -> FakeBot {
        FakeBot {
            caps: BotCapabilities {
                start,
                command,
                on_text,
            },
            ..Default::default()
        }
    }

    fn sender() -> Option<Sender> {
        Some(Sender {
            id: 12345,
            username: Some("testuser".to_string()),
        })
    }

    #[test]
    fn test_command_bot_registers_under_start() {
        let recorder = Arc::new(RecordingAcknowledger::default());
        let mut fake = bot(false, true, true);
        let variant = install_handlers(&mut fake, recorder).unwrap();
        assert_eq!(variant, AdapterVariant::CommandMethod);
        assert_eq!(fake.commands.len(), 1);
        assert_eq!(fake.commands[0].0, "start");
        assert!(fake.texts.is_empty());
    }

    #[test]
    fn test_unsupported_bot() {
        let recorder = Arc::new(RecordingAcknowledger::default());
        let mut fake = bot(false, false, false);
        assert!(matches!(
            install_handlers(&mut fake, recorder),
            Err(RegisterError::UnsupportedBotShape)
        ));
    }

    #[test]
    fn test_repeated_install_adds_handlers() {
        let recorder: Arc<dyn Acknowledger> = Arc::new(RecordingAcknowledger::default());
        let mut fake = bot(true, false, false);
        install_handlers(&mut fake, recorder.clone()).unwrap();
        install_handlers(&mut fake, recorder).unwrap();
        assert_eq!(fake.starts.len(), 2);
    }

    #[tokio::test]
    async fn test_start_handler_uses_text_when_no_payload() {
        let recorder = Arc::new(RecordingAcknowledger::default());
        let handler = referral_start_handler(recorder.clone());

        handler(StartContext {
            start_payload: None,
            text: Some("/start REF123ABC".to_string()),
            from: sender(),
            chat_id: None,
        })
        .await;

        let payloads = recorder.payloads.lock().unwrap();
        assert_eq!(payloads.len(), 1);
        assert_eq!(
            payloads[0].validate().unwrap(),
            AckAction::start(12345, Some("testuser".to_string()), "REF123ABC")
        );
    }

    #[tokio::test]
    async fn test_start_handler_skips_without_code_or_sender() {
        let recorder = Arc::new(RecordingAcknowledger::default());
        let handler = referral_start_handler(recorder.clone());

        handler(StartContext {
            text: Some("/start".to_string()),
            from: sender(),
            ..Default::default()
        })
        .await;
        handler(StartContext {
            start_payload: Some("REF1".to_string()),
            from: None,
            ..Default::default()
        })
        .await;
        handler(StartContext {
            start_payload: Some("REF1".to_string()),
            from: Some(Sender::default()),
            ..Default::default()
        })
        .await;

        assert!(recorder.payloads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_text_handler_swallows_ack_failure() {
        let recorder = Arc::new(RecordingAcknowledger {
            fail: true,
            ..Default::default()
        });
        let handler = referral_text_handler(recorder.clone());

        handler(TextMatch {
            text: Some("/start REF123ABC".to_string()),
            from: Some(Sender {
                id: 12345,
                username: None,
            }),
            chat_id: None,
            captures: vec![Some(String::new()), Some("REF123ABC".to_string())],
        })
        .await;

        let payloads = recorder.payloads.lock().unwrap();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].username, None);
        assert_eq!(payloads[0].code.as_deref(), Some("REF123ABC"));
    }
}
