//! # OpenWeatherMap client
//!
//! Implements [`WeatherService`] against the OpenWeatherMap current-weather API
//! (`/data/2.5/weather`, metric units). A place can be given by name (`q=`) or by coordinates
//! (`lat=` / `lon=`); both produce the same one-line summary.
//!
//! ## Example
//!
//! ```rust,no_run
//! use content::{OpenWeatherMap, Place, WeatherService};
//! use std::time::Duration;
//!
//! async fn example() -> lizbot_core::Result<()> {
//!     let owm = OpenWeatherMap::new("your-api-key".to_string(), Duration::from_secs(60))?;
//!     let summary = owm.current(&Place::Named("London".to_string())).await?;
//!     println!("{}", summary); // e.g. "12.5 °C, light rain in London"
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use lizbot_core::{LizbotError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::provider::Place;

pub const OWM_API_BASE: &str = "http://api.openweathermap.org";

/// Current-conditions lookup.
#[async_trait]
pub trait WeatherService: Send + Sync {
    /// Returns `"<temperature> °C, <description> in <city>"`.
    async fn current(&self, place: &Place) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct OpenWeatherMap {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherMap {
    /// Creates a client with the given request timeout.
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LizbotError::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: OWM_API_BASE.to_string(),
            api_key,
        })
    }

    /// Points the client at another server (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn place_query(place: &Place) -> Vec<(&'static str, String)> {
        match place {
            Place::Named(name) => vec![("q", name.clone())],
            Place::Coordinates(at) => vec![
                ("lat", format!("{:.6}", at.latitude)),
                ("lon", format!("{:.6}", at.longitude)),
            ],
        }
    }
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    main: MainReading,
    weather: Vec<Condition>,
    name: String,
}

#[derive(Debug, Deserialize)]
struct MainReading {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

impl WeatherResponse {
    fn summary(&self) -> Result<String> {
        let description = self
            .weather
            .first()
            .map(|c| c.description.as_str())
            .ok_or_else(|| LizbotError::content("weather response has no conditions"))?;
        // Debug keeps the decimal point on whole temperatures ("20.0", not "20").
        Ok(format!(
            "{:?} \u{00B0}C, {} in {}",
            self.main.temp, description, self.name
        ))
    }
}

#[async_trait]
impl WeatherService for OpenWeatherMap {
    async fn current(&self, place: &Place) -> Result<String> {
        info!(place = %place, "step: requesting weather");

        let url = format!("{}/data/2.5/weather", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("appid", self.api_key.as_str()), ("units", "metric")])
            .query(&Self::place_query(place))
            .send()
            .await
            .map_err(|e| LizbotError::content(format!("weather request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LizbotError::content(format!(
                "OpenWeatherMap API error ({}): {}",
                status, error_text
            )));
        }

        let body: WeatherResponse = response
            .json()
            .await
            .map_err(|e| LizbotError::content(format!("invalid weather response: {}", e)))?;
        debug!(response = ?body, "Weather response");

        let summary = body.summary()?;
        info!(place = %place, summary = %summary, "step: weather resolved");
        Ok(summary)
    }
}
