//! CLI parser.

use clap::{Parser, Subcommand};
use referrals_core::AckAction;

#[derive(Parser, Debug)]
#[command(name = "referrals")]
#[command(about = "Referral tracking CLI: run, check, ack", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the Telegram bot with referral tracking and a /buy command (token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Check that OPENSERV_REFERRALS_API_KEY is accepted by the referrals service.
    Check,
    /// Send a single acknowledgement and print the result.
    #[command(subcommand)]
    Ack(AckCommand),
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum AckCommand {
    /// A user started the bot with a referral code.
    Start {
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        code: String,
        #[arg(long)]
        username: Option<String>,
    },
    /// A referred user made a purchase.
    Purchase {
        #[arg(long)]
        user_id: i64,
        #[arg(long, allow_negative_numbers = true)]
        amount: f64,
        #[arg(long)]
        username: Option<String>,
    },
}

impl From<AckCommand> for AckAction {
    fn from(command: AckCommand) -> Self {
        match command {
            AckCommand::Start {
                user_id,
                code,
                username,
            } => AckAction::start(user_id, username, code),
            AckCommand::Purchase {
                user_id,
                amount,
                username,
            } => AckAction::purchase(user_id, username, amount),
        }
    }
}
