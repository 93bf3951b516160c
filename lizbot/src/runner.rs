//! Entry points: init logging, validate config, build components, then poll or listen.

use anyhow::Result;
use lizbot_core::init_tracing;
use lizbot_telegram::{create_router, run_polling, serve, WebhookState};
use tracing::{info, instrument};

use super::components::build_components;
use super::config::BotConfig;

/// Long polling. Telegram refuses getUpdates while a webhook is registered; remove it with
/// `/del_webhook` on the listener first.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate(false)?;
    init_tracing(&config.log_file)?;

    info!(cities = ?config.cities, "Initializing bot (long polling)");
    let components = build_components(&config)?;

    info!("Bot started successfully");
    run_polling(
        components.teloxide_bot,
        components.dispatcher,
        components.transport,
    )
    .await
}

/// Webhook listener on `config.listen_addr`. The webhook itself is registered through the
/// listener's `/set_webhook` route.
#[instrument(skip(config))]
pub async fn serve_webhook(config: BotConfig) -> Result<()> {
    config.validate(true)?;
    init_tracing(&config.log_file)?;

    info!(
        cities = ?config.cities,
        listen_addr = %config.listen_addr,
        "Initializing bot (webhook)"
    );
    let components = build_components(&config)?;

    let hook_token = config
        .telegram
        .hook_token
        .clone()
        .ok_or_else(|| anyhow::anyhow!("HOOK_TOKEN is required in webhook mode"))?;
    let state = WebhookState {
        dispatcher: components.dispatcher,
        transport: components.transport,
        bot: components.teloxide_bot,
        webhook_url: config.telegram.webhook_url(),
    };
    let router = create_router(state, &hook_token);

    info!("Bot started successfully");
    serve(config.listen_addr, router).await
}
