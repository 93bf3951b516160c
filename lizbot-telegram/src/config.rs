//! Minimal Telegram config: token, optional API URL, webhook secret and public URL.
//! Loaded from env: BOT_TOKEN, TELEGRAM_API_URL (or TELOXIDE_API_URL), HOOK_TOKEN, PUBLIC_BASE_URL.

use anyhow::Result;
use std::env;
use tracing::error;

/// Telegram connectivity config.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub telegram_api_url: Option<String>,
    /// Shared secret; the webhook only accepts updates on `/TG<hook_token>`.
    pub hook_token: Option<String>,
    /// Externally reachable base URL of the listener, used by `/set_webhook`.
    pub public_base_url: Option<String>,
}

impl TelegramConfig {
    /// Loads from env. `token` overrides BOT_TOKEN; one of them is required.
    pub fn from_env(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?,
        };
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let hook_token = env::var("HOOK_TOKEN").ok().filter(|s| !s.is_empty());
        let public_base_url = env::var("PUBLIC_BASE_URL").ok().filter(|s| !s.is_empty());
        Ok(Self {
            bot_token,
            telegram_api_url,
            hook_token,
            public_base_url,
        })
    }

    /// Builds config with the given token; other fields None.
    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            telegram_api_url: None,
            hook_token: None,
            public_base_url: None,
        }
    }

    /// Checks URLs parse and the hook token is usable as a path segment.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        if let Some(ref url_str) = self.public_base_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!("PUBLIC_BASE_URL is set but not a valid URL: {}", url_str);
            }
        }
        if let Some(ref hook_token) = self.hook_token {
            if !hook_token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                anyhow::bail!("HOOK_TOKEN may only contain ASCII letters, digits, '-' and '_'");
            }
        }
        Ok(())
    }

    /// Webhook URL to register with Telegram, if both parts are configured.
    pub fn webhook_url(&self) -> Option<String> {
        let base = self.public_base_url.as_deref()?;
        let hook_token = self.hook_token.as_deref()?;
        Some(format!("{}/TG{}", base.trim_end_matches('/'), hook_token))
    }

    /// teloxide Bot with the API URL override applied.
    pub fn build_bot(&self) -> teloxide::Bot {
        let bot = teloxide::Bot::new(self.bot_token.clone());
        match self.telegram_api_url {
            Some(ref url_str) => match reqwest::Url::parse(url_str) {
                Ok(url) => bot.set_api_url(url),
                Err(e) => {
                    error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                    bot
                }
            },
            None => bot,
        }
    }
}
