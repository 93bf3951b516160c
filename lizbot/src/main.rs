//! Lizbot binary: `lizbot run` polls Telegram, `lizbot serve` listens for webhook updates.

use anyhow::Result;
use clap::Parser;
use lizbot::{run_bot, serve_webhook, BotConfig, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = BotConfig::load(token)?;
            run_bot(config).await
        }
        Commands::Serve { token, listen } => {
            let mut config = BotConfig::load(token)?;
            if let Some(listen) = listen {
                config.listen_addr = listen;
            }
            serve_webhook(config).await
        }
    }
}
