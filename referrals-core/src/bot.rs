//! Bot capability abstraction for referral registration.
//!
//! A bot framework is described by [`ReferralBot`]: which registration hooks it exposes
//! ([`BotCapabilities`]) and the hooks themselves. Registration picks one [`AdapterVariant`]
//! from the capabilities, once, in a fixed priority order.

use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use regex::Regex;

use crate::error::{RegisterError, Result};
use crate::types::{StartContext, TextMatch};

/// Command name the start handler is registered under on command-style bots.
pub const START_COMMAND: &str = "start";

/// Pattern used on text-listener bots; group 1 is the referral code.
pub const START_PATTERN: &str = r"/start (.+)";

/// Async callback for a start interaction.
pub type StartHandler = Arc<dyn Fn(StartContext) -> BoxFuture<'static, ()> + Send + Sync>;

/// Async callback for a regex-matched text message.
pub type TextHandler = Arc<dyn Fn(TextMatch) -> BoxFuture<'static, ()> + Send + Sync>;

/// Wraps an async closure as a [`StartHandler`].
pub fn start_handler<F, Fut>(f: F) -> StartHandler
where
    F: Fn(StartContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |ctx| f(ctx).boxed())
}

/// Wraps an async closure as a [`TextHandler`].
pub fn text_handler<F, Fut>(f: F) -> TextHandler
where
    F: Fn(TextMatch) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |m| f(m).boxed())
}

/// Registration hooks a bot exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BotCapabilities {
    /// Command-style start registration (`bot.start(handler)`).
    pub start: bool,
    /// Generic command registration (`bot.command(name, handler)`).
    pub command: bool,
    /// Regex-triggered text listener (`bot.on_text(pattern, handler)`).
    pub on_text: bool,
}

/// A bot that referral tracking can attach to. Implement the hooks the framework supports and
/// report them in [`ReferralBot::capabilities`]; unsupported hooks keep the default, which fails
/// with [`RegisterError::UnsupportedBotShape`].
pub trait ReferralBot {
    fn capabilities(&self) -> BotCapabilities;

    fn start(&mut self, _handler: StartHandler) -> Result<()> {
        Err(RegisterError::UnsupportedBotShape)
    }

    fn command(&mut self, _name: &str, _handler: StartHandler) -> Result<()> {
        Err(RegisterError::UnsupportedBotShape)
    }

    fn on_text(&mut self, _pattern: Regex, _handler: TextHandler) -> Result<()> {
        Err(RegisterError::UnsupportedBotShape)
    }
}

/// Calling convention chosen for a bot at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterVariant {
    StartMethod,
    CommandMethod,
    TextListenerMethod,
}

impl AdapterVariant {
    /// Priority: start, then command, then text listener.
    pub fn detect(capabilities: BotCapabilities) -> Option<Self> {
        if capabilities.start {
            Some(Self::StartMethod)
        } else if capabilities.command {
            Some(Self::CommandMethod)
        } else if capabilities.on_text {
            Some(Self::TextListenerMethod)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::StartMethod => "start",
            Self::CommandMethod => "command",
            Self::TextListenerMethod => "on_text",
        }
    }
}
