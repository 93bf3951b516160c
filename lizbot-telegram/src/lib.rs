//! # lizbot-telegram
//!
//! Telegram layer: adapters from Telegram updates to [`lizbot_core::InboundEvent`], the teloxide
//! [`lizbot_core::Transport`], minimal config, a long-polling runner and the webhook listener.
//! Handles only Telegram connectivity; conversation logic lives in the `conversation` crate.

mod adapters;
mod bot_adapter;
mod config;
mod runner;
mod update;
mod webhook;

pub use adapters::{to_keyboard_markup, TelegramMessageWrapper};
pub use bot_adapter::TelegramTransport;
pub use config::TelegramConfig;
pub use runner::{process_event, run_polling};
pub use update::{UpdateMessage, WebhookUpdate};
pub use webhook::{create_router, serve, WebhookState};
