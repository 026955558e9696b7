use std::env;
use std::time::Duration;

pub const DEFAULT_BOT_NAME: &str = "burgerbot";
pub const DEFAULT_SPECIAL_URL: &str = "http://www.honestburgers.co.uk/";
pub const DEFAULT_APOLOGY_MESSAGE: &str = "Sorry, I couldn't find the current special burger :-(";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub slack_bot_token: String,
    pub slack_signing_secret: String,
    pub bot_name: String,
    pub special_url: String,
    pub apology_message: String,
    pub fetch_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let fetch_timeout_secs = match env::var("FETCH_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| format!("FETCH_TIMEOUT_SECS: {}", e))?,
            Err(_) => DEFAULT_FETCH_TIMEOUT_SECS,
        };

        Ok(Self {
            slack_bot_token: env::var("SLACK_BOT_TOKEN")
                .map_err(|e| format!("SLACK_BOT_TOKEN: {}", e))?,
            slack_signing_secret: env::var("SLACK_SIGNING_SECRET")
                .map_err(|e| format!("SLACK_SIGNING_SECRET: {}", e))?,
            bot_name: bot_name_or_default(env::var("BOT_NAME").ok()),
            special_url: env::var("SPECIAL_URL")
                .unwrap_or_else(|_| DEFAULT_SPECIAL_URL.to_string()),
            apology_message: env::var("APOLOGY_MESSAGE")
                .unwrap_or_else(|_| DEFAULT_APOLOGY_MESSAGE.to_string()),
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
        })
    }
}

/// Blank or missing names fall back to [`DEFAULT_BOT_NAME`].
#[must_use]
pub fn bot_name_or_default(name: Option<String>) -> String {
    name.map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_BOT_NAME.to_string())
}
