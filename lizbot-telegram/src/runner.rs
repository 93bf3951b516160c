//! Long-polling runner: converts teloxide messages to InboundEvent, dispatches them and delivers the replies.

use anyhow::Result;
use conversation::ConversationDispatcher;
use lizbot_core::{InboundEvent, ToInboundEvent, Transport};
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{error, info, instrument, warn};

use super::adapters::TelegramMessageWrapper;

/// Dispatches one event and sends its replies in order. Returns how many were sent.
#[instrument(skip_all, fields(chat_id = %event.chat_id))]
pub async fn process_event(
    dispatcher: &ConversationDispatcher,
    transport: &dyn Transport,
    event: &InboundEvent,
) -> lizbot_core::Result<usize> {
    let replies = dispatcher.handle(event).await?;
    transport.send_all(&replies).await?;
    Ok(replies.len())
}

/// Starts the REPL. teloxide already serializes updates per chat and runs chats concurrently,
/// so each update is processed inline.
#[instrument(skip(bot, dispatcher, transport))]
pub async fn run_polling(
    bot: teloxide::Bot,
    dispatcher: Arc<ConversationDispatcher>,
    transport: Arc<dyn Transport>,
) -> Result<()> {
    if let Ok(me) = bot.get_me().await {
        if let Some(username) = &me.user.username {
            info!(username = %username, "Bot identity resolved before repl");
        }
    }

    teloxide::repl(bot, move |_bot: Bot, msg: teloxide::types::Message| {
        let dispatcher = dispatcher.clone();
        let transport = transport.clone();

        async move {
            let event = match TelegramMessageWrapper(&msg).to_inbound() {
                Ok(event) => event,
                Err(e) => {
                    warn!(chat_id = msg.chat.id.0, error = %e, "Discarding update");
                    return respond(());
                }
            };
            info!(chat_id = %event.chat_id, payload = ?event.payload, "Received message");

            if let Err(e) = process_event(&dispatcher, transport.as_ref(), &event).await {
                error!(error = %e, chat_id = %event.chat_id, "Event handling failed");
            }
            respond(())
        }
    })
    .await;

    Ok(())
}
