//! The bot's Slack session: identity, channel roster and outbound posting.

use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::client::SlackClient;
use crate::core::config::AppConfig;
use crate::core::models::{BotIdentity, ChannelRef};
use crate::errors::BotError;
use crate::pipeline::{ChannelRoster, ChatSession};

/// Channels and groups keyed by id.
///
/// The map is replaced wholesale when the roster is reloaded, so channels
/// created after the session came up can still be resolved.
#[derive(Debug)]
pub struct ChannelDirectory {
    channels: RwLock<HashMap<String, ChannelRef>>,
}

impl ChannelDirectory {
    #[must_use]
    pub fn new(channels: impl IntoIterator<Item = ChannelRef>) -> Self {
        Self {
            channels: RwLock::new(index(channels)),
        }
    }

    pub async fn len(&self) -> usize {
        self.channels.read().await.len()
    }

    pub async fn lookup(&self, channel_id: &str) -> Option<ChannelRef> {
        self.channels.read().await.get(channel_id).cloned()
    }

    /// Swaps in a freshly listed roster.
    pub async fn replace(&self, channels: impl IntoIterator<Item = ChannelRef>) {
        *self.channels.write().await = index(channels);
    }

    /// Looks `channel_id` up, reloading the roster once through `reload` on a
    /// miss. A failed reload keeps the current roster and resolves to `None`.
    pub async fn resolve_or_reload<F, Fut>(&self, channel_id: &str, reload: F) -> Option<ChannelRef>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<ChannelRef>, BotError>>,
    {
        if let Some(channel) = self.lookup(channel_id).await {
            return Some(channel);
        }

        debug!(channel_id = %channel_id, "Channel not in roster, reloading");
        match reload().await {
            Ok(channels) => {
                self.replace(channels).await;
                self.lookup(channel_id).await
            }
            Err(e) => {
                warn!(channel_id = %channel_id, "Failed to reload channel roster: {}", e);
                None
            }
        }
    }
}

fn index(channels: impl IntoIterator<Item = ChannelRef>) -> HashMap<String, ChannelRef> {
    channels.into_iter().map(|c| (c.id.clone(), c)).collect()
}

#[async_trait]
impl ChannelRoster for ChannelDirectory {
    async fn resolve(&self, channel_id: &str) -> Option<ChannelRef> {
        self.lookup(channel_id).await
    }
}

/// A ready Slack session. Construction is the readiness point: once
/// [`SlackSession::connect`] returns, the identity is fixed and the roster is
/// loaded. The roster is reloaded when an unknown channel id comes in.
pub struct SlackSession {
    client: SlackClient,
    identity: BotIdentity,
    roster: ChannelDirectory,
}

impl SlackSession {
    /// Resolves the bot identity and loads the channel roster.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the roster cannot be listed.
    pub async fn connect(config: &AppConfig) -> Result<Self, BotError> {
        let client = SlackClient::new(config.slack_bot_token.clone());

        let identity = BotIdentity {
            id: client.get_bot_user_id().await?,
            display_name: config.bot_name.clone(),
        };
        let channels = client.list_conversations().await?;
        let count = channels.len();
        let roster = ChannelDirectory::new(channels);

        info!(
            bot_user_id = %identity.id,
            bot_name = %identity.display_name,
            channels = count,
            "Slack session ready"
        );

        Ok(Self {
            client,
            identity,
            roster,
        })
    }

    #[must_use]
    pub fn identity(&self) -> &BotIdentity {
        &self.identity
    }
}

#[async_trait]
impl ChatSession for SlackSession {
    async fn post_to_channel(&self, channel: &ChannelRef, text: &str) -> Result<(), BotError> {
        self.client.post_message(&channel.id, text, true).await?;
        info!(channel = %channel.name, "Posted reply to channel");
        Ok(())
    }

    async fn post_to_group(&self, channel: &ChannelRef, text: &str) -> Result<(), BotError> {
        self.client.post_message(&channel.id, text, true).await?;
        info!(group = %channel.name, "Posted reply to group");
        Ok(())
    }
}

#[async_trait]
impl ChannelRoster for SlackSession {
    async fn resolve(&self, channel_id: &str) -> Option<ChannelRef> {
        self.roster
            .resolve_or_reload(channel_id, || self.client.list_conversations())
            .await
    }
}
