//! Wraps teloxide::Bot and implements [`lizbot_core::Transport`]. Production code sends messages via Telegram; tests can substitute another Transport impl.

use async_trait::async_trait;
use lizbot_core::{LizbotError, OutboundMessage, Result, Transport};
use teloxide::{prelude::*, types::ChatId, types::ParseMode};
use tracing::{error, info};

use crate::adapters::to_keyboard_markup;

/// Thin wrapper around teloxide::Bot that delivers [`OutboundMessage`]s.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: teloxide::Bot,
}

impl TelegramTransport {
    /// Creates a transport from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<()> {
        // Replies are written in legacy Markdown.
        #[allow(deprecated)]
        let parse_mode = ParseMode::Markdown;

        let mut request = self
            .bot
            .send_message(ChatId(message.chat_id.0), message.text.clone())
            .parse_mode(parse_mode);
        if let Some(keyboard) = &message.keyboard {
            request = request.reply_markup(to_keyboard_markup(keyboard));
        }

        request.await.map_err(|e| {
            error!(chat_id = %message.chat_id, error = %e, "sendMessage failed");
            LizbotError::Transport(e.to_string())
        })?;
        info!(
            chat_id = %message.chat_id,
            has_keyboard = message.keyboard.is_some(),
            "step: message sent"
        );
        Ok(())
    }
}
