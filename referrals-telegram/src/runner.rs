//! REPL runner: converts teloxide messages into [`InboundMessage`]s and dispatches them through a
//! [`CommandRouter`]. Calls get_me first so commands addressed to other bots are ignored.

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use tracing::{debug, info, instrument};

use crate::adapters::TelegramMessageWrapper;
use crate::router::CommandRouter;

/// Starts the REPL with the given teloxide Bot and router. Each message is routed in its own
/// spawned task, so the per-message closure returns without waiting for handlers. Tasks still
/// running when the REPL stops are not awaited.
#[instrument(skip(bot, router))]
pub async fn run_repl(bot: teloxide::Bot, mut router: CommandRouter) -> Result<()> {
    if let Ok(me) = bot.get_me().await {
        if let Some(username) = &me.user.username {
            info!(username = %username, "Bot username set before repl");
            router.set_bot_username(Some(username.clone()));
        }
    }
    info!(handlers = router.len(), "Starting referral bot REPL");

    let router = Arc::new(router);
    teloxide::repl(bot, move |_bot: Bot, msg: teloxide::types::Message| {
        let router = router.clone();

        async move {
            let inbound = TelegramMessageWrapper(&msg).to_inbound();
            info!(
                user_id = ?inbound.from.as_ref().map(|f| f.id),
                chat_id = ?inbound.chat_id,
                has_text = inbound.text.is_some(),
                "Received message"
            );

            tokio::spawn(async move {
                let ran = router.dispatch(&inbound).await;
                debug!(handlers_run = ran, chat_id = ?inbound.chat_id, "Message routed");
            });

            Ok(())
        }
    })
    .await;

    Ok(())
}
