//! Component factory: builds BotComponents from config. Isolates assembly logic from the runners.

use anyhow::Result;
use content::{OpenWeatherMap, StaticContent};
use conversation::{ConversationDispatcher, InMemoryConversationStore};
use lizbot_core::Transport;
use lizbot_telegram::TelegramTransport;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument};

use super::config::BotConfig;

/// Everything both runners need.
#[derive(Clone)]
pub struct BotComponents {
    pub teloxide_bot: teloxide::Bot,
    pub dispatcher: Arc<ConversationDispatcher>,
    pub transport: Arc<dyn Transport>,
}

/// Loads the content files, wires the weather client and the conversation store into a
/// dispatcher, and builds the Telegram transport.
#[instrument(skip(config))]
pub fn build_components(config: &BotConfig) -> Result<BotComponents> {
    let weather = OpenWeatherMap::new(
        config.owm_key.clone(),
        Duration::from_secs(config.weather_timeout_secs),
    )?
    .with_base_url(config.owm_base_url.clone());

    let content = StaticContent::load(&config.content, Arc::new(weather)).map_err(|e| {
        error!(error = %e, "Failed to load content files");
        anyhow::anyhow!("Failed to load content files: {}", e)
    })?;
    info!(
        facts = %config.content.facts.display(),
        trivia = %config.content.trivia.display(),
        "step: content loaded"
    );

    let dispatcher = Arc::new(ConversationDispatcher::new(
        Arc::new(InMemoryConversationStore::new()),
        Arc::new(content),
        config.cities.clone(),
    ));

    let teloxide_bot = config.telegram.build_bot();
    let transport: Arc<dyn Transport> = Arc::new(TelegramTransport::new(teloxide_bot.clone()));

    Ok(BotComponents {
        teloxide_bot,
        dispatcher,
        transport,
    })
}
