//! Webhook update body: only the fields the bot reads, validated into an [`InboundEvent`].

use lizbot_core::{ChatId, Coordinates, InboundEvent, LizbotError, Result, ToInboundEvent};
use serde::Deserialize;

/// A Telegram `Update` as POSTed to the webhook. Updates without `message` (edits, callbacks,
/// channel posts) are acknowledged and ignored by the listener.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookUpdate {
    #[serde(default)]
    pub update_id: i64,
    pub message: Option<UpdateMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMessage {
    pub chat: UpdateChat,
    pub from: Option<UpdateUser>,
    pub text: Option<String>,
    pub location: Option<Coordinates>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateChat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUser {
    pub first_name: String,
}

impl ToInboundEvent for UpdateMessage {
    fn to_inbound(&self) -> Result<InboundEvent> {
        let chat_id = ChatId(self.chat.id);
        let sender = self
            .from
            .as_ref()
            .map(|u| u.first_name.clone())
            .ok_or_else(|| {
                LizbotError::MalformedEvent(format!("message in chat {} has no sender", chat_id))
            })?;
        InboundEvent::from_parts(chat_id, sender, self.text.clone(), self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lizbot_core::EventPayload;

    fn parse(json: &str) -> WebhookUpdate {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_text_update() {
        let update = parse(
            r#"{"update_id": 1, "message": {"message_id": 5, "date": 0,
                "chat": {"id": 42, "type": "private"},
                "from": {"id": 7, "is_bot": false, "first_name": "Ann"},
                "text": "/weather"}}"#,
        );
        let event = update.message.unwrap().to_inbound().unwrap();
        assert_eq!(event, InboundEvent::text(42, "Ann", "/weather"));
    }

    #[test]
    fn test_location_update_ignores_extra_fields() {
        let update = parse(
            r#"{"update_id": 2, "message": {
                "chat": {"id": 42}, "from": {"first_name": "Ann"},
                "location": {"latitude": 45.65, "longitude": 25.6, "horizontal_accuracy": 12.0}}}"#,
        );
        let event = update.message.unwrap().to_inbound().unwrap();
        assert_eq!(
            event.payload,
            EventPayload::Location(Coordinates::new(45.65, 25.6))
        );
    }

    #[test]
    fn test_sticker_only_is_malformed() {
        let update = parse(
            r#"{"update_id": 3, "message": {"chat": {"id": 42}, "from": {"first_name": "Ann"},
                "sticker": {"file_id": "x"}}}"#,
        );
        let err = update.message.unwrap().to_inbound().unwrap_err();
        assert!(matches!(err, LizbotError::MalformedEvent(_)));
    }

    #[test]
    fn test_missing_sender_is_malformed() {
        let update = parse(r#"{"update_id": 4, "message": {"chat": {"id": 42}, "text": "hi"}}"#);
        let err = update.message.unwrap().to_inbound().unwrap_err();
        assert!(matches!(err, LizbotError::MalformedEvent(_)));
    }

    #[test]
    fn test_update_without_message() {
        let update = parse(r#"{"update_id": 5, "edited_message": {"chat": {"id": 42}}}"#);
        assert!(update.message.is_none());
    }
}
