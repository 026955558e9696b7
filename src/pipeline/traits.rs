//! Seams between the reply pipeline and the outside world.
//!
//! The Slack implementations live in `crate::slack` and `crate::clients`; tests
//! substitute in-memory fakes.

use async_trait::async_trait;

use crate::core::models::ChannelRef;
use crate::errors::{BotError, FetchError};

/// Outbound half of the chat session. Both calls post as the bot user.
#[async_trait]
pub trait ChatSession: Send + Sync {
    async fn post_to_channel(&self, channel: &ChannelRef, text: &str) -> Result<(), BotError>;

    async fn post_to_group(&self, channel: &ChannelRef, text: &str) -> Result<(), BotError>;
}

/// Lookup over the union of known public channels and private groups.
#[async_trait]
pub trait ChannelRoster: Send + Sync {
    async fn resolve(&self, channel_id: &str) -> Option<ChannelRef>;
}

/// Retrieves raw markup for a URL. No retry policy lives behind this call.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
