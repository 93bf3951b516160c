//! Production [`ContentProviders`]: file-backed sources plus a weather service.

use async_trait::async_trait;
use lizbot_core::Result;
use std::path::PathBuf;
use std::sync::Arc;

use crate::line_source::LineSource;
use crate::provider::{ContentProviders, Place, TriviaChallenge};
use crate::trivia::TriviaBank;
use crate::weather::WeatherService;

/// Locations of the content files.
#[derive(Debug, Clone)]
pub struct ContentPaths {
    pub facts: PathBuf,
    pub compliments: PathBuf,
    pub fortunes: PathBuf,
    pub trivia: PathBuf,
}

impl Default for ContentPaths {
    fn default() -> Self {
        Self {
            facts: PathBuf::from("facts.txt"),
            compliments: PathBuf::from("compliments.txt"),
            fortunes: PathBuf::from("fortunes.dat"),
            trivia: PathBuf::from("trivia.json"),
        }
    }
}

pub struct StaticContent {
    facts: LineSource,
    compliments: LineSource,
    fortunes: LineSource,
    trivia: TriviaBank,
    weather: Arc<dyn WeatherService>,
}

impl StaticContent {
    pub fn new(
        facts: LineSource,
        compliments: LineSource,
        fortunes: LineSource,
        trivia: TriviaBank,
        weather: Arc<dyn WeatherService>,
    ) -> Self {
        Self {
            facts,
            compliments,
            fortunes,
            trivia,
            weather,
        }
    }

    /// Loads every file in `paths`; fails on the first unreadable one.
    pub fn load(paths: &ContentPaths, weather: Arc<dyn WeatherService>) -> Result<Self> {
        Ok(Self::new(
            LineSource::load(&paths.facts)?,
            LineSource::load(&paths.compliments)?,
            LineSource::load(&paths.fortunes)?,
            TriviaBank::load(&paths.trivia)?,
            weather,
        ))
    }
}

#[async_trait]
impl ContentProviders for StaticContent {
    async fn random_fact(&self) -> Result<String> {
        self.facts.random_line()
    }

    async fn random_compliment(&self) -> Result<String> {
        self.compliments.random_line()
    }

    async fn random_fortune(&self) -> Result<String> {
        self.fortunes.random_line()
    }

    async fn random_trivia_challenge(&self) -> Result<TriviaChallenge> {
        self.trivia.random_challenge()
    }

    async fn weather_for(&self, place: &Place) -> Result<String> {
        self.weather.current(place).await
    }
}
