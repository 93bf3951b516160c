//! Trivia bank: a JSON array of challenges, drawn uniformly.

use lizbot_core::{LizbotError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::provider::TriviaChallenge;

#[derive(Debug, Clone, Default)]
pub struct TriviaBank {
    challenges: Vec<TriviaChallenge>,
}

impl TriviaBank {
    /// Validates every challenge: at least one answer and `Correct` within range.
    pub fn new(challenges: Vec<TriviaChallenge>) -> Result<Self> {
        for (i, challenge) in challenges.iter().enumerate() {
            if challenge.correct_answer().is_none() {
                return Err(LizbotError::content(format!(
                    "trivia challenge #{} ({:?}) has correct index {} but {} answers",
                    i,
                    challenge.question,
                    challenge.correct,
                    challenge.answers.len()
                )));
            }
        }
        Ok(Self { challenges })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let challenges: Vec<TriviaChallenge> = serde_json::from_str(json)
            .map_err(|e| LizbotError::content(format!("invalid trivia bank: {}", e)))?;
        Self::new(challenges)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            LizbotError::content(format!("cannot read {}: {}", path.display(), e))
        })?;
        let bank = Self::from_json(&json)?;
        info!(path = %path.display(), challenges = bank.len(), "Loaded trivia bank");
        Ok(bank)
    }

    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    pub fn random_challenge(&self) -> Result<TriviaChallenge> {
        self.random_challenge_with(&mut rand::thread_rng())
    }

    pub fn random_challenge_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<TriviaChallenge> {
        self.challenges
            .choose(rng)
            .cloned()
            .ok_or_else(|| LizbotError::content("trivia bank is empty"))
    }
}
