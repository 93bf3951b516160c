//! BotConfig: Telegram connectivity plus weather, content files, listener and log settings.
//! Everything comes from env (after dotenvy); see `load`.

use anyhow::{Context, Result};
use content::{ContentPaths, OWM_API_BASE};
use lizbot_telegram::TelegramConfig;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_CITIES: &str = "London,Brasov";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_LOG_FILE: &str = "logs/lizbot.log";
const DEFAULT_WEATHER_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram: TelegramConfig,
    /// OWM_KEY
    pub owm_key: String,
    /// OWM_BASE_URL
    pub owm_base_url: String,
    /// WEATHER_TIMEOUT_SECS
    pub weather_timeout_secs: u64,
    /// CITIES, comma separated; also the keyboard order
    pub cities: Vec<String>,
    pub content: ContentPaths,
    /// LISTEN_ADDR, webhook mode only
    pub listen_addr: SocketAddr,
    /// LOG_FILE
    pub log_file: String,
}

impl BotConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    /// Call validate() after load to check config before init.
    pub fn load(token: Option<String>) -> Result<Self> {
        let telegram = TelegramConfig::from_env(token)?;
        let owm_key = env::var("OWM_KEY").context("OWM_KEY not set")?;
        let owm_base_url = env::var("OWM_BASE_URL").unwrap_or_else(|_| OWM_API_BASE.to_string());
        let weather_timeout_secs = env::var("WEATHER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_WEATHER_TIMEOUT_SECS);
        let cities = parse_cities(
            &env::var("CITIES").unwrap_or_else(|_| DEFAULT_CITIES.to_string()),
        );

        let defaults = ContentPaths::default();
        let content = ContentPaths {
            facts: path_from_env("FACTS_FILE", defaults.facts),
            compliments: path_from_env("COMPLIMENTS_FILE", defaults.compliments),
            fortunes: path_from_env("FORTUNES_FILE", defaults.fortunes),
            trivia: path_from_env("TRIVIA_FILE", defaults.trivia),
        };

        let listen_addr = env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = listen_addr
            .parse()
            .with_context(|| format!("LISTEN_ADDR is not a socket address: {}", listen_addr))?;
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());

        Ok(Self {
            telegram,
            owm_key,
            owm_base_url,
            weather_timeout_secs,
            cities,
            content,
            listen_addr,
            log_file,
        })
    }

    /// Validate config. `webhook` additionally requires HOOK_TOKEN.
    pub fn validate(&self, webhook: bool) -> Result<()> {
        self.telegram.validate()?;
        if reqwest::Url::parse(&self.owm_base_url).is_err() {
            anyhow::bail!("OWM_BASE_URL is set but not a valid URL: {}", self.owm_base_url);
        }
        if self.owm_key.trim().is_empty() {
            anyhow::bail!("OWM_KEY is empty");
        }
        if self.cities.is_empty() {
            anyhow::bail!("CITIES must name at least one city");
        }
        if webhook && self.telegram.hook_token.is_none() {
            anyhow::bail!("HOOK_TOKEN is required in webhook mode");
        }
        Ok(())
    }
}

/// Splits on commas, trims, drops empty entries and keeps the first of any duplicates.
fn parse_cities(raw: &str) -> Vec<String> {
    let mut cities: Vec<String> = Vec::new();
    for city in raw.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        if !cities.iter().any(|c| c == city) {
            cities.push(city.to_string());
        }
    }
    cities
}

fn path_from_env(key: &str, default: PathBuf) -> PathBuf {
    env::var(key).map(PathBuf::from).unwrap_or(default)
}
