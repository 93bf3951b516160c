//! Transport abstraction for delivering replies.
//!
//! [`Transport`] is transport-agnostic; `lizbot-telegram` implements it via teloxide.

use crate::error::Result;
use crate::types::OutboundMessage;
use async_trait::async_trait;

/// Delivers outbound messages. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one message (text plus optional keyboard) to its target chat.
    async fn send(&self, message: &OutboundMessage) -> Result<()>;

    /// Sends messages in order, stopping at the first failure.
    async fn send_all(&self, messages: &[OutboundMessage]) -> Result<()> {
        for message in messages {
            self.send(message).await?;
        }
        Ok(())
    }
}
