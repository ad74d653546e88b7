//! Handler registry behind [`crate::TelegramReferralBot`].
//!
//! Start handlers run for `/start`, command handlers for `/<name>`, text listeners for every
//! message their regex matches. All matching handlers run, awaited one after another in
//! registration order (start, command, text).

use referrals_core::{Sender, StartContext, StartHandler, TextHandler, START_COMMAND};
use regex::Regex;
use tracing::debug;

use crate::adapters::{parse_command, text_match};

/// Framework-neutral inbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundMessage {
    pub text: Option<String>,
    pub from: Option<Sender>,
    pub chat_id: Option<i64>,
}

#[derive(Default, Clone)]
pub struct CommandRouter {
    bot_username: Option<String>,
    start_handlers: Vec<StartHandler>,
    command_handlers: Vec<(String, StartHandler)>,
    text_listeners: Vec<(Regex, TextHandler)>,
}

impl CommandRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands with a `@bot` suffix run only when the suffix matches this username; while it is
    /// unset, only unaddressed commands run.
    pub fn set_bot_username(&mut self, username: Option<String>) {
        self.bot_username = username;
    }

    pub fn add_start(&mut self, handler: StartHandler) {
        self.start_handlers.push(handler);
    }

    pub fn add_command(&mut self, name: &str, handler: StartHandler) {
        self.command_handlers
            .push((name.trim_start_matches('/').to_string(), handler));
    }

    pub fn add_text_listener(&mut self, pattern: Regex, handler: TextHandler) {
        self.text_listeners.push((pattern, handler));
    }

    /// Number of registered handlers of all kinds.
    pub fn len(&self) -> usize {
        self.start_handlers.len() + self.command_handlers.len() + self.text_listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs every handler matching `message`; returns how many ran.
    pub async fn dispatch(&self, message: &InboundMessage) -> usize {
        let Some(text) = message.text.as_deref() else {
            return 0;
        };
        let mut ran = 0;

        match parse_command(text, self.bot_username.as_deref()) {
            Some((name, args)) => {
                let ctx = StartContext {
                    start_payload: (name == START_COMMAND).then_some(args),
                    text: Some(text.to_string()),
                    from: message.from.clone(),
                    chat_id: message.chat_id,
                };
                if name == START_COMMAND {
                    for handler in &self.start_handlers {
                        handler(ctx.clone()).await;
                        ran += 1;
                    }
                }
                for (command, handler) in &self.command_handlers {
                    if command == name {
                        handler(ctx.clone()).await;
                        ran += 1;
                    }
                }
            }
            None if text.starts_with('/') => {
                debug!("Command not addressed to this bot, skipped");
            }
            None => {}
        }

        for (pattern, handler) in &self.text_listeners {
            if let Some(captures) = pattern.captures(text) {
                handler(text_match(text, message.from.clone(), message.chat_id, &captures)).await;
                ran += 1;
            }
        }

        ran
    }
}
