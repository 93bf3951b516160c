//! # content
//!
//! Everything the dispatcher says that it does not compose itself: random facts, compliments and
//! fortunes from line-oriented text files, trivia challenges from a JSON bank, and current
//! weather from OpenWeatherMap. [`ContentProviders`] is the seam the dispatcher calls through;
//! [`StaticContent`] is the production implementation.

mod line_source;
mod provider;
mod static_content;
mod trivia;
mod weather;

pub use line_source::LineSource;
pub use provider::{ContentProviders, Place, TriviaChallenge};
pub use static_content::{ContentPaths, StaticContent};
pub use trivia::TriviaBank;
pub use weather::{OpenWeatherMap, WeatherService, OWM_API_BASE};
