//! # lizbot
//!
//! Application crate: CLI parsing, env config, component assembly and the two entry points
//! (long polling and the webhook listener).

pub mod cli;
pub mod components;
pub mod config;
pub mod runner;

pub use cli::{Cli, Commands};
pub use components::{build_components, BotComponents};
pub use config::BotConfig;
pub use runner::{run_bot, serve_webhook};
