//! Core types: chat id, inbound event, outbound message and keyboard.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LizbotError, Result};

/// Opaque conversation identifier; key into every per-chat map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Latitude / longitude pair as sent by a "share location" button.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// What the user sent: free text or a location. Exactly one is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventPayload {
    Text(String),
    Location(Coordinates),
}

/// One inbound chat event, already validated at the transport boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub chat_id: ChatId,
    /// Sender display name (Telegram first name); used in greetings.
    pub sender: String,
    pub payload: EventPayload,
}

impl InboundEvent {
    pub fn text(chat_id: impl Into<ChatId>, sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            sender: sender.into(),
            payload: EventPayload::Text(text.into()),
        }
    }

    pub fn location(chat_id: impl Into<ChatId>, sender: impl Into<String>, at: Coordinates) -> Self {
        Self {
            chat_id: chat_id.into(),
            sender: sender.into(),
            payload: EventPayload::Location(at),
        }
    }

    /// Builds an event from the optional fields a transport extracted. Text wins when both are
    /// present; neither is [`LizbotError::MalformedEvent`].
    pub fn from_parts(
        chat_id: ChatId,
        sender: String,
        text: Option<String>,
        location: Option<Coordinates>,
    ) -> Result<Self> {
        let payload = match (text, location) {
            (Some(text), _) => EventPayload::Text(text),
            (None, Some(at)) => EventPayload::Location(at),
            (None, None) => {
                return Err(LizbotError::MalformedEvent(format!(
                    "update for chat {} has neither text nor location",
                    chat_id
                )))
            }
        };
        Ok(Self {
            chat_id,
            sender,
            payload,
        })
    }

    /// Text content, if this is a text message.
    pub fn as_text(&self) -> Option<&str> {
        match &self.payload {
            EventPayload::Text(text) => Some(text),
            EventPayload::Location(_) => None,
        }
    }
}

/// One keyboard entry. `request_location` turns the button into a "share my location" prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardButton {
    pub label: String,
    pub request_location: bool,
}

impl KeyboardButton {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            request_location: false,
        }
    }

    pub fn location(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            request_location: true,
        }
    }
}

/// Single-use reply keyboard; one button per row, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyboard {
    pub buttons: Vec<KeyboardButton>,
}

impl Keyboard {
    /// Keyboard of plain labels.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            buttons: labels.into_iter().map(KeyboardButton::new).collect(),
        }
    }

    /// Appends a location-request button.
    pub fn with_location_request(mut self, label: impl Into<String>) -> Self {
        self.buttons.push(KeyboardButton::location(label));
        self
    }

    pub fn labels(&self) -> Vec<&str> {
        self.buttons.iter().map(|b| b.label.as_str()).collect()
    }
}

/// A reply to deliver: target chat, text body, optional keyboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl OutboundMessage {
    pub fn new(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// Converts a transport-specific update into a validated [`InboundEvent`].
pub trait ToInboundEvent {
    fn to_inbound(&self) -> Result<InboundEvent>;
}
