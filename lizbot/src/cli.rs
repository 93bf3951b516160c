//! CLI parser.

use clap::{Parser, Subcommand};
use std::net::SocketAddr;

#[derive(Parser)]
#[command(name = "lizbot")]
#[command(about = "Telegram conversation bot: weather, facts, fortunes, trivia", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot with long polling (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Run the webhook listener; Telegram must POST updates to /TG<HOOK_TOKEN>.
    Serve {
        #[arg(short, long)]
        token: Option<String>,
        /// Overrides LISTEN_ADDR.
        #[arg(short, long)]
        listen: Option<SocketAddr>,
    },
}
