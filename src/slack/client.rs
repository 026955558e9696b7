//! Slack API client module
//!
//! Encapsulates the Slack Web API calls the bot needs with retry logic and
//! error handling.

use reqwest::Client;
use serde::Deserialize;
use slack_morphism::hyper_tokio::{SlackClientHyperConnector, SlackHyperClient};
use slack_morphism::prelude::SlackApiChatPostMessageRequest;
use slack_morphism::{SlackApiToken, SlackApiTokenValue, SlackChannelId, SlackMessageContent};
use std::time::Duration;
use tokio_retry::strategy::jitter;
use tokio_retry::{Retry, strategy::ExponentialBackoff};
use tracing::{debug, warn};

use crate::core::models::{ChannelRef, Visibility};
use crate::errors::BotError;

const CONVERSATIONS_LIST_URL: &str = "https://slack.com/api/conversations.list";
const CONVERSATIONS_PAGE_LIMIT: &str = "200";
const MAX_RETRY_DELAY: Duration = Duration::from_secs(2);

// Build the Slack client connector safely without panicking.
// If connector construction fails, store None and surface a BotError at call sites.
static SLACK_CLIENT: std::sync::LazyLock<Option<SlackHyperClient>> =
    std::sync::LazyLock::new(|| match SlackClientHyperConnector::new() {
        Ok(connector) => Some(SlackHyperClient::new(connector)),
        Err(e) => {
            warn!("Failed to create Slack HTTP connector: {}", e);
            None
        }
    });

static HTTP_CLIENT: std::sync::LazyLock<Client> = std::sync::LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
});

#[derive(Debug, Deserialize)]
struct ConversationsListResponse {
    ok: bool,
    #[serde(default)]
    channels: Vec<ConversationInfo>,
    error: Option<String>,
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct ConversationInfo {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    is_private: bool,
    #[serde(default)]
    is_group: bool,
}

#[derive(Debug, Deserialize)]
struct ResponseMetadata {
    next_cursor: Option<String>,
}

impl From<ConversationInfo> for ChannelRef {
    fn from(info: ConversationInfo) -> Self {
        let visibility = if info.is_private || info.is_group {
            Visibility::Private
        } else {
            Visibility::Public
        };
        Self {
            name: info.name.unwrap_or_else(|| info.id.clone()),
            id: info.id,
            visibility,
        }
    }
}

/// Whether a Web API call may be repeated after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Read-only calls, retried with exponential backoff and jitter.
    Idempotent,
    /// Calls with side effects; a failure after the request left could still
    /// have been applied, so they run exactly once.
    SingleAttempt,
}

impl RetryPolicy {
    /// Delays slept between attempts.
    #[must_use]
    pub fn delays(self) -> Vec<Duration> {
        match self {
            // 100ms, 200ms, 400ms, 800ms, 1.6s before jitter
            Self::Idempotent => ExponentialBackoff::from_millis(2)
                .factor(50)
                .max_delay(MAX_RETRY_DELAY)
                .map(jitter)
                .take(5)
                .collect(),
            Self::SingleAttempt => Vec::new(),
        }
    }
}

/// Slack API client with retry logic and error handling
pub struct SlackClient {
    token: SlackApiToken,
}

impl SlackClient {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self {
            token: SlackApiToken::new(SlackApiTokenValue::new(token)),
        }
    }

    async fn with_retry<F, Fut, T>(&self, policy: RetryPolicy, operation: F) -> Result<T, BotError>
    where
        F: FnMut() -> Fut + Send,
        Fut: std::future::Future<Output = Result<T, BotError>> + Send,
        T: Send,
    {
        Retry::spawn(policy.delays(), operation).await
    }

    /// # Errors
    ///
    /// Returns an error if `auth.test` fails, e.g. because the token is invalid.
    pub async fn get_bot_user_id(&self) -> Result<String, BotError> {
        self.with_retry(RetryPolicy::Idempotent, || async {
            let session = SLACK_CLIENT
                .as_ref()
                .ok_or_else(|| {
                    BotError::GeneralError("Slack HTTP connector not initialized".to_string())
                })?
                .open_session(&self.token);

            let test_resp = session.auth_test().await?;

            // user_id is directly a SlackUserId, not an Option
            Ok(test_resp.user_id.0)
        })
        .await
    }

    /// Lists every non-archived public channel and private group the bot can see.
    ///
    /// # Errors
    ///
    /// Returns an error if a page request fails or Slack answers `ok: false`.
    pub async fn list_conversations(&self) -> Result<Vec<ChannelRef>, BotError> {
        let mut channels = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self
                .with_retry(RetryPolicy::Idempotent, || {
                    self.fetch_conversations_page(cursor.as_deref())
                })
                .await?;

            channels.extend(page.channels.into_iter().map(ChannelRef::from));

            cursor = page
                .response_metadata
                .and_then(|m| m.next_cursor)
                .filter(|c| !c.is_empty());
            if cursor.is_none() {
                break;
            }
        }

        debug!(count = channels.len(), "Loaded channel roster");
        Ok(channels)
    }

    async fn fetch_conversations_page(
        &self,
        cursor: Option<&str>,
    ) -> Result<ConversationsListResponse, BotError> {
        let mut query = vec![
            ("types", "public_channel,private_channel"),
            ("exclude_archived", "true"),
            ("limit", CONVERSATIONS_PAGE_LIMIT),
        ];
        if let Some(c) = cursor {
            query.push(("cursor", c));
        }

        let resp = HTTP_CLIENT
            .get(CONVERSATIONS_LIST_URL)
            .bearer_auth(&self.token.token_value.0)
            .query(&query)
            .send()
            .await
            .map_err(|e| BotError::HttpError(format!("Failed to list conversations: {e}")))?;

        let page: ConversationsListResponse = resp
            .json()
            .await
            .map_err(|e| BotError::ParseError(format!("Failed to parse conversations: {e}")))?;

        if !page.ok {
            return Err(BotError::ApiError(format!(
                "conversations.list failed: {}",
                page.error.as_deref().unwrap_or("unknown error")
            )));
        }

        Ok(page)
    }

    /// Posts `message` to a channel or group by id, optionally as the bot user.
    ///
    /// # Errors
    ///
    /// Returns an error if the Slack API call fails. `chat.postMessage` is not
    /// idempotent, so a failed post is not repeated.
    pub async fn post_message(
        &self,
        channel_id: &str,
        message: &str,
        as_user: bool,
    ) -> Result<(), BotError> {
        self.with_retry(RetryPolicy::SingleAttempt, || async {
            let session = SLACK_CLIENT
                .as_ref()
                .ok_or_else(|| {
                    BotError::GeneralError("Slack HTTP connector not initialized".to_string())
                })?
                .open_session(&self.token);

            let post_req = SlackApiChatPostMessageRequest::new(
                SlackChannelId(channel_id.to_string()),
                SlackMessageContent::new().with_text(message.to_string()),
            )
            .with_as_user(as_user);

            session.chat_post_message(&post_req).await?;

            Ok(())
        })
        .await
    }
}
