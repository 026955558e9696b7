//! Runs one inbound event through classify, fetch, extract, compose and send.

use tracing::{error, info, warn};

use super::classifier::should_respond;
use super::composer::compose;
use super::extractor::extract;
use super::traits::{ChannelRoster, ChatSession, ContentFetcher};
use crate::core::config::AppConfig;
use crate::core::models::{BotIdentity, InboundEvent, SpecialOffer, Visibility};
use crate::errors::FetchError;

/// What happened to a single inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The classifier rejected the event.
    Ignored,
    /// Accepted, but the channel id is not in the roster.
    ChannelNotFound,
    Replied { visibility: Visibility },
    SendFailed,
}

/// Fetches the special's page once and extracts the offer from it.
///
/// # Errors
///
/// Returns the fetcher's [`FetchError`] when the page could not be retrieved.
/// An unreachable block inside a retrieved page is not an error.
pub async fn get_burger_details(
    fetcher: &dyn ContentFetcher,
    url: &str,
) -> Result<SpecialOffer, FetchError> {
    let markup = fetcher.fetch(url).await?;
    Ok(extract(&markup))
}

/// Wires the reply pipeline to its collaborators for the lifetime of a session.
pub struct EventDispatcher<'a> {
    session: &'a dyn ChatSession,
    roster: &'a dyn ChannelRoster,
    fetcher: &'a dyn ContentFetcher,
    identity: Option<&'a BotIdentity>,
    special_url: &'a str,
    apology: &'a str,
}

impl<'a> EventDispatcher<'a> {
    #[must_use]
    pub fn new(
        config: &'a AppConfig,
        session: &'a dyn ChatSession,
        roster: &'a dyn ChannelRoster,
        fetcher: &'a dyn ContentFetcher,
    ) -> Self {
        Self {
            session,
            roster,
            fetcher,
            identity: None,
            special_url: &config.special_url,
            apology: &config.apology_message,
        }
    }

    /// Marks the session ready. Until then every event is ignored.
    #[must_use]
    pub fn with_identity(mut self, identity: &'a BotIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Handles one event to completion. Never returns an error: failures are
    /// logged and reported through the outcome.
    pub async fn handle(&self, event: &InboundEvent) -> DispatchOutcome {
        if !should_respond(event, self.identity) {
            return DispatchOutcome::Ignored;
        }

        let channel_id = event.channel_id().unwrap_or_default();
        let Some(channel) = self.roster.resolve(channel_id).await else {
            warn!(channel_id = %channel_id, "Channel not found in roster, dropping event");
            return DispatchOutcome::ChannelNotFound;
        };

        info!(channel_id = %channel.id, channel_name = %channel.name, "Replying with latest special");

        let details = get_burger_details(self.fetcher, self.special_url).await;
        if let Err(e) = &details {
            error!("Failed to fetch special: {}", e);
        }
        let reply = compose(&details, self.apology);

        let sent = match channel.visibility {
            Visibility::Private => self.session.post_to_group(&channel, &reply).await,
            Visibility::Public => self.session.post_to_channel(&channel, &reply).await,
        };

        match sent {
            Ok(()) => DispatchOutcome::Replied {
                visibility: channel.visibility,
            },
            Err(e) => {
                error!(channel_id = %channel.id, "Failed to post reply: {}", e);
                DispatchOutcome::SendFailed
            }
        }
    }
}
