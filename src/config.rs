//! # Bot Configuration Module
//!
//! Settings read from the environment (optionally through a `.env` file).

use anyhow::{Context, Result};
use std::env;

use crate::session::UserKey;

pub const DEFAULT_LANGUAGE: &str = "ru";

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram bot token
    pub bot_token: String,
    /// The only user allowed to edit prices
    pub admin_user_id: UserKey,
    /// PostgreSQL URL; the in-memory price table is used when unset
    pub database_url: Option<String>,
    /// Locale used when the user's language is not supported
    pub default_language: String,
}

impl BotConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let bot_token = env::var("TELEGRAM_BOT_TOKEN")
            .context("TELEGRAM_BOT_TOKEN environment variable not set")?;

        let admin_user_id = env::var("ADMIN_USER_ID")
            .context("ADMIN_USER_ID environment variable not set")?;
        let admin_user_id = parse_admin_id(&admin_user_id)?;

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let default_language = env::var("DEFAULT_LANGUAGE")
            .ok()
            .filter(|lang| !lang.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        Ok(Self {
            bot_token,
            admin_user_id,
            database_url,
            default_language,
        })
    }
}

fn parse_admin_id(raw: &str) -> Result<UserKey> {
    raw.trim()
        .parse::<UserKey>()
        .with_context(|| format!("ADMIN_USER_ID must be a numeric Telegram user id, got {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_id() {
        assert_eq!(parse_admin_id("123456789").unwrap(), 123456789);
        assert_eq!(parse_admin_id(" 42 ").unwrap(), 42);
        assert!(parse_admin_id("admin").is_err());
        assert!(parse_admin_id("").is_err());
    }
}
