use slack_morphism::errors::SlackClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Failed to parse Slack event: {0}")]
    ParseError(String),

    #[error("Failed to access Slack API: {0}")]
    ApiError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("{0}")]
    GeneralError(String),
}

impl From<SlackClientError> for BotError {
    fn from(error: SlackClientError) -> Self {
        BotError::ApiError(error.to_string())
    }
}

impl From<reqwest::Error> for BotError {
    fn from(error: reqwest::Error) -> Self {
        BotError::HttpError(error.to_string())
    }
}

impl From<anyhow::Error> for BotError {
    fn from(error: anyhow::Error) -> Self {
        BotError::ApiError(error.to_string())
    }
}

/// Transport-level failure while retrieving the special's page.
///
/// The message is for logs only; chat users see the configured apology.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Failed to fetch {url}: {reason}")]
pub struct FetchError {
    pub url: String,
    pub reason: String,
}

impl FetchError {
    #[must_use]
    pub fn new(url: &str, reason: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}
