//! # lizbot-core
//!
//! Core types for the bot: chat ids, inbound events, outbound messages and keyboards, the
//! [`Transport`] trait, the error taxonomy, and tracing initialization. Transport-agnostic;
//! used by `conversation`, `content` and `lizbot-telegram`.

pub mod error;
pub mod logger;
pub mod transport;
pub mod types;

pub use error::{LizbotError, Result};
pub use logger::init_tracing;
pub use transport::Transport;
pub use types::{
    ChatId, Coordinates, EventPayload, InboundEvent, Keyboard, KeyboardButton, OutboundMessage,
    ToInboundEvent,
};
