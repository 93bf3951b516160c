//! The query interface the dispatcher consumes, and the values it returns.

use async_trait::async_trait;
use lizbot_core::{Coordinates, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where to look up the weather: a city name or a shared location.
#[derive(Debug, Clone, PartialEq)]
pub enum Place {
    Named(String),
    Coordinates(Coordinates),
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Place::Named(name) => write!(f, "{}", name),
            Place::Coordinates(at) => write!(f, "({:.6}, {:.6})", at.latitude, at.longitude),
        }
    }
}

/// A multiple-choice question. Field names follow the `trivia.json` bank format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriviaChallenge {
    #[serde(rename = "Question")]
    pub question: String,
    #[serde(rename = "Answers")]
    pub answers: Vec<String>,
    /// Index into `answers`.
    #[serde(rename = "Correct")]
    pub correct: usize,
}

impl TriviaChallenge {
    pub fn new(question: impl Into<String>, answers: Vec<String>, correct: usize) -> Self {
        Self {
            question: question.into(),
            answers,
            correct,
        }
    }

    /// Label of the correct option; `None` if `correct` is out of range.
    pub fn correct_answer(&self) -> Option<&str> {
        self.answers.get(self.correct).map(String::as_str)
    }
}

/// Stateless content queries. Every call may fail with `ContentUnavailable`.
#[async_trait]
pub trait ContentProviders: Send + Sync {
    async fn random_fact(&self) -> Result<String>;

    async fn random_compliment(&self) -> Result<String>;

    async fn random_fortune(&self) -> Result<String>;

    async fn random_trivia_challenge(&self) -> Result<TriviaChallenge>;

    /// Current conditions formatted as `"<temp> °C, <description> in <city>"`.
    async fn weather_for(&self, place: &Place) -> Result<String>;
}
