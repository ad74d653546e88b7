//! referrals CLI: run a Telegram bot with referral tracking, check the API key, send one
//! acknowledgement. Config from env (.env is loaded) and CLI args.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use referrals_cli::{buy_handler, Cli, Commands};
use referrals_client::{mask_credential, ReferralsClient};
use referrals_core::{init_tracing, AckAction};
use referrals_telegram::{register, TelegramConfig, TelegramReferralBot};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => handle_run(token).await,
        Commands::Check => handle_check().await,
        Commands::Ack(command) => handle_ack(command.into()).await,
    }
}

/// Builds the bot, registers referral tracking, adds `/buy` and polls until stopped.
async fn handle_run(token: Option<String>) -> Result<()> {
    let config = TelegramConfig::from_env(token)?;
    init_tracing(config.log_file.as_deref())?;

    let mut bot = TelegramReferralBot::new(config.build_bot()?);
    let variant = register(Some(&mut bot))
        .await
        .context("Register referral tracking")?;
    info!(variant = variant.name(), "Referral tracking enabled");

    let client = ReferralsClient::from_env()?;
    let buy = buy_handler(bot.inner().clone(), Arc::new(client));
    bot.add_command("buy", buy);

    bot.run().await
}

async fn handle_check() -> Result<()> {
    init_tracing(None)?;
    let client = ReferralsClient::from_env()?;
    client.verify_credential().await?;

    let masked = client
        .config()
        .credential()
        .map(|key| mask_credential(&key))
        .unwrap_or_default();
    println!("API key {} accepted by {}", masked, client.config().api_url);
    Ok(())
}

async fn handle_ack(action: AckAction) -> Result<()> {
    init_tracing(None)?;
    let client = ReferralsClient::from_env()?;
    let kind = action.kind();
    let response = client.ack(action).await;

    if let Some(error) = response.error() {
        anyhow::bail!("{} acknowledgement failed: {}", kind, error);
    }
    match response.data() {
        Some(data) => println!("{}", serde_json::to_string_pretty(data)?),
        None => println!("{} acknowledged", kind),
    }
    Ok(())
}
