//! Conversation dispatcher: classifies one inbound event against the chat's state, calls the
//! content providers, and returns the replies to send.
//!
//! Rules are evaluated in order and the first match wins; see [`route`].

use content::{ContentProviders, Place};
use lizbot_core::{
    Coordinates, EventPayload, InboundEvent, Keyboard, LizbotError, OutboundMessage, Result,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::store::{ChatSession, ConversationState, ConversationStore};

pub const CMD_START: &str = "/start";
pub const CMD_WEATHER: &str = "/weather";
pub const CMD_FACT: &str = "/fact";
pub const CMD_MIRROR: &str = "/mirror";
pub const CMD_FORTUNE: &str = "/fortune";
pub const CMD_TRIVIA: &str = "/trivia";

/// Commands offered on the greeting and fallback keyboards, in display order.
pub const COMMANDS: [&str; 5] = [CMD_WEATHER, CMD_FACT, CMD_MIRROR, CMD_FORTUNE, CMD_TRIVIA];

pub const CITY_PROMPT: &str = "Select a city";
pub const SHARE_LOCATION: &str = "Share location";
pub const TRIVIA_INTRO: &str = "New chat! Please verify by answering a simple question!";
pub const CORRECT_ANSWER: &str = "Wow! That is correct!";
pub const WRONG_ANSWER: &str = "Wrong answer :(";
pub const UNKNOWN_COMMAND: &str = "Cahn's Axiom: When all else fails, read the instructions";
pub const FALLBACK: &str =
    "I learn new things every day but for now you can ask me about the following:";

pub fn greeting(sender: &str) -> String {
    format!("Hello {}! Why not try the commands below:", sender)
}

/// Which behavior an event maps to.
#[derive(Debug, Clone, PartialEq)]
pub enum Route<'a> {
    LocationWeather(Coordinates),
    /// Location with no weather request pending.
    IgnoreLocation,
    Greet,
    AskCity,
    CityWeather(&'a str),
    Fact,
    Compliment,
    Fortune,
    StartTrivia,
    /// `/trivia` while a question is already open.
    TriviaPending,
    CheckAnswer(&'a str),
    UnknownCommand,
    Fallback,
}

/// First-match-wins classification of `event` given the chat's current `state`.
pub fn route<'a>(event: &'a InboundEvent, state: ConversationState, cities: &[String]) -> Route<'a> {
    let text = match &event.payload {
        EventPayload::Location(at) => {
            return if state == ConversationState::AwaitingCity {
                Route::LocationWeather(*at)
            } else {
                Route::IgnoreLocation
            };
        }
        EventPayload::Text(text) => text.as_str(),
    };

    match text {
        CMD_START => Route::Greet,
        CMD_WEATHER => Route::AskCity,
        _ if state == ConversationState::AwaitingCity && cities.iter().any(|c| c == text) => {
            Route::CityWeather(text)
        }
        CMD_FACT => Route::Fact,
        CMD_MIRROR => Route::Compliment,
        CMD_FORTUNE => Route::Fortune,
        CMD_TRIVIA if state == ConversationState::AwaitingTriviaAnswer => Route::TriviaPending,
        CMD_TRIVIA => Route::StartTrivia,
        _ if state == ConversationState::AwaitingTriviaAnswer => Route::CheckAnswer(text),
        _ if text.starts_with('/') => Route::UnknownCommand,
        _ => Route::Fallback,
    }
}

/// Routes inbound events to replies and owns every state transition.
pub struct ConversationDispatcher {
    store: Arc<dyn ConversationStore>,
    content: Arc<dyn ContentProviders>,
    cities: Vec<String>,
}

impl ConversationDispatcher {
    /// `cities` is both the set of names accepted after `/weather` and the keyboard order.
    pub fn new(
        store: Arc<dyn ConversationStore>,
        content: Arc<dyn ContentProviders>,
        cities: Vec<String>,
    ) -> Self {
        Self {
            store,
            content,
            cities,
        }
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    /// Handles one event. On error nothing should be sent and the chat keeps its pre-event
    /// state; the session is only committed after every provider call succeeded.
    #[instrument(skip(self, event), fields(chat_id = %event.chat_id))]
    pub async fn handle(&self, event: &InboundEvent) -> Result<Vec<OutboundMessage>> {
        let mut session = self.store.open(event.chat_id).await?;
        let matched = route(event, session.state(), &self.cities);
        info!(chat_id = %event.chat_id, route = ?matched, "step: event routed");

        let replies = self.apply(session.as_mut(), &event.sender, matched).await?;
        session.commit().await?;

        info!(
            chat_id = %event.chat_id,
            replies = replies.len(),
            "step: dispatch done"
        );
        Ok(replies)
    }

    async fn apply(
        &self,
        session: &mut dyn ChatSession,
        sender: &str,
        route: Route<'_>,
    ) -> Result<Vec<OutboundMessage>> {
        let chat_id = session.chat_id();
        let replies = match route {
            Route::LocationWeather(at) => {
                let summary = self.content.weather_for(&Place::Coordinates(at)).await?;
                session.clear_state();
                vec![OutboundMessage::new(chat_id, summary)]
            }
            Route::IgnoreLocation => {
                info!(chat_id = %chat_id, "Location without pending weather request, ignored");
                Vec::new()
            }
            Route::Greet => vec![
                OutboundMessage::new(chat_id, greeting(sender)).with_keyboard(commands_keyboard())
            ],
            Route::AskCity => {
                session.set_state(ConversationState::AwaitingCity);
                vec![OutboundMessage::new(chat_id, CITY_PROMPT).with_keyboard(self.cities_keyboard())]
            }
            Route::CityWeather(city) => {
                let summary = self
                    .content
                    .weather_for(&Place::Named(city.to_string()))
                    .await?;
                session.clear_state();
                vec![OutboundMessage::new(chat_id, summary)]
            }
            Route::Fact => vec![OutboundMessage::new(chat_id, self.content.random_fact().await?)],
            Route::Compliment => vec![OutboundMessage::new(
                chat_id,
                self.content.random_compliment().await?,
            )],
            Route::Fortune => vec![OutboundMessage::new(
                chat_id,
                self.content.random_fortune().await?,
            )],
            Route::StartTrivia => self.start_trivia(session).await?,
            Route::TriviaPending => {
                info!(chat_id = %chat_id, "Trivia already pending, ignored");
                Vec::new()
            }
            Route::CheckAnswer(answer) => vec![check_answer(session, answer)],
            Route::UnknownCommand => vec![OutboundMessage::new(chat_id, UNKNOWN_COMMAND)],
            Route::Fallback => {
                vec![OutboundMessage::new(chat_id, FALLBACK).with_keyboard(commands_keyboard())]
            }
        };
        Ok(replies)
    }

    async fn start_trivia(&self, session: &mut dyn ChatSession) -> Result<Vec<OutboundMessage>> {
        let chat_id = session.chat_id();
        let challenge = self.content.random_trivia_challenge().await?;
        let expected = challenge
            .correct_answer()
            .ok_or_else(|| {
                LizbotError::content(format!(
                    "trivia challenge {:?} has no answer at index {}",
                    challenge.question, challenge.correct
                ))
            })?
            .to_string();
        info!(chat_id = %chat_id, question = %challenge.question, "step: sending trivia question");

        session.set_state(ConversationState::AwaitingTriviaAnswer);
        session.set_pending_answer(expected);

        Ok(vec![
            OutboundMessage::new(chat_id, TRIVIA_INTRO),
            OutboundMessage::new(chat_id, challenge.question)
                .with_keyboard(Keyboard::from_labels(challenge.answers)),
        ])
    }

    fn cities_keyboard(&self) -> Keyboard {
        Keyboard::from_labels(self.cities.iter().cloned()).with_location_request(SHARE_LOCATION)
    }
}

/// Compares `answer` with the pending one (exact match), then clears the question either way.
fn check_answer(session: &mut dyn ChatSession, answer: &str) -> OutboundMessage {
    let chat_id = session.chat_id();
    let correct = match session.pending_answer() {
        Some(expected) => expected == answer,
        None => {
            warn!(chat_id = %chat_id, "Awaiting trivia answer but none recorded");
            false
        }
    };
    session.clear_pending_answer();
    session.clear_state();

    info!(chat_id = %chat_id, correct, "step: trivia answer checked");
    OutboundMessage::new(chat_id, if correct { CORRECT_ANSWER } else { WRONG_ANSWER })
}

fn commands_keyboard() -> Keyboard {
    Keyboard::from_labels(COMMANDS)
}
