//! teloxide-backed [`ReferralBot`]. Exposes command-style start registration, generic command
//! registration and regex text listeners; handlers are kept in a [`CommandRouter`] until
//! [`TelegramReferralBot::run`] starts the REPL.

use referrals_core::{BotCapabilities, ReferralBot, Result, StartHandler, TextHandler};
use regex::Regex;

use crate::router::CommandRouter;
use crate::runner::run_repl;

pub struct TelegramReferralBot {
    bot: teloxide::Bot,
    router: CommandRouter,
}

impl TelegramReferralBot {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self {
            bot,
            router: CommandRouter::new(),
        }
    }

    /// Underlying teloxide Bot, for sending replies from handlers.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }

    pub fn router(&self) -> &CommandRouter {
        &self.router
    }

    /// Registers an application command (e.g. `buy`) next to the referral handlers.
    pub fn add_command(&mut self, name: &str, handler: StartHandler) {
        self.router.add_command(name, handler);
    }

    /// Starts polling; returns when the REPL stops.
    pub async fn run(self) -> anyhow::Result<()> {
        run_repl(self.bot, self.router).await
    }
}

impl ReferralBot for TelegramReferralBot {
    fn capabilities(&self) -> BotCapabilities {
        BotCapabilities {
            start: true,
            command: true,
            on_text: true,
        }
    }

    fn start(&mut self, handler: StartHandler) -> Result<()> {
        self.router.add_start(handler);
        Ok(())
    }

    fn command(&mut self, name: &str, handler: StartHandler) -> Result<()> {
        self.router.add_command(name, handler);
        Ok(())
    }

    fn on_text(&mut self, pattern: Regex, handler: TextHandler) -> Result<()> {
        self.router.add_text_listener(pattern, handler);
        Ok(())
    }
}
