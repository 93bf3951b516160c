//! # conversation
//!
//! The bot's core: [`ConversationStore`] keeps each chat's state (idle, awaiting a city,
//! awaiting a trivia answer) and [`ConversationDispatcher`] turns one inbound event into the
//! replies to send, mutating that state. Transport and content are reached through traits.

pub mod dispatcher;
pub mod store;

pub use dispatcher::{route, ConversationDispatcher, Route, COMMANDS};
pub use store::{ChatSession, ConversationState, ConversationStore, InMemoryConversationStore};
