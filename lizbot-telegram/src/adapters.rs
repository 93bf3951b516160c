//! Adapters between Telegram (teloxide) types and lizbot_core types.
//! Depends only on teloxide and lizbot_core type definitions.

use lizbot_core::{ChatId, Coordinates, InboundEvent, Keyboard, LizbotError, Result, ToInboundEvent};
use teloxide::types::{ButtonRequest, KeyboardButton, KeyboardMarkup};

/// Wraps a teloxide Message for conversion to a core [`InboundEvent`].
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToInboundEvent for TelegramMessageWrapper<'a> {
    fn to_inbound(&self) -> Result<InboundEvent> {
        let chat_id = ChatId(self.0.chat.id.0);
        let sender = self
            .0
            .from
            .as_ref()
            .map(|u| u.first_name.clone())
            .ok_or_else(|| {
                LizbotError::MalformedEvent(format!("message in chat {} has no sender", chat_id))
            })?;
        let text = self.0.text().map(str::to_string);
        let location = self
            .0
            .location()
            .map(|l| Coordinates::new(l.latitude, l.longitude));
        InboundEvent::from_parts(chat_id, sender, text, location)
    }
}

/// Renders a core keyboard as a single-use Telegram reply keyboard, one button per row.
pub fn to_keyboard_markup(keyboard: &Keyboard) -> KeyboardMarkup {
    let rows: Vec<Vec<KeyboardButton>> = keyboard
        .buttons
        .iter()
        .map(|b| {
            let button = KeyboardButton::new(b.label.clone());
            if b.request_location {
                vec![button.request(ButtonRequest::Location)]
            } else {
                vec![button]
            }
        })
        .collect();
    KeyboardMarkup::new(rows).one_time_keyboard()
}
