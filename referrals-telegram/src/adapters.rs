//! Adapters from Telegram (teloxide) types to referral handler contexts.
//! Depends only on teloxide and referrals_core type definitions.

use referrals_core::{Sender, TextMatch};

use crate::router::InboundMessage;

/// Wraps a teloxide User for conversion to a [`Sender`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> TelegramUserWrapper<'a> {
    pub fn to_sender(&self) -> Sender {
        Sender {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
        }
    }
}

/// Wraps a teloxide Message for conversion to handler contexts.
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> TelegramMessageWrapper<'a> {
    pub fn text(&self) -> Option<&str> {
        self.0.text()
    }

    pub fn sender(&self) -> Option<Sender> {
        self.0
            .from
            .as_ref()
            .map(|u| TelegramUserWrapper(u).to_sender())
    }

    pub fn chat_id(&self) -> i64 {
        self.0.chat.id.0
    }

    /// Framework-neutral view routed to registered handlers.
    pub fn to_inbound(&self) -> InboundMessage {
        InboundMessage {
            text: self.text().map(str::to_string),
            from: self.sender(),
            chat_id: Some(self.chat_id()),
        }
    }
}

/// Parses `/name[@bot] args` with teloxide's command parser, returning the command name and its
/// arguments joined by single spaces. Returns `None` for text that is not a command, for an empty
/// command name and for commands addressed to a bot other than `bot_username`.
pub fn parse_command<'t>(
    text: &'t str,
    bot_username: Option<&str>,
) -> Option<(&'t str, String)> {
    let (name, args) =
        teloxide::utils::command::parse_command(text, bot_username.unwrap_or_default())?;
    if name.is_empty() {
        return None;
    }
    Some((name, args.join(" ")))
}

/// Builds a [`TextMatch`] from a message view and a regex match.
pub fn text_match(
    text: &str,
    from: Option<Sender>,
    chat_id: Option<i64>,
    captures: &regex::Captures<'_>,
) -> TextMatch {
    TextMatch {
        text: Some(text.to_string()),
        from,
        chat_id,
        captures: captures
            .iter()
            .map(|c| c.map(|m| m.as_str().to_string()))
            .collect(),
    }
}
