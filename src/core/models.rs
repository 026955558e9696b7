
/// One real-time notification from the chat platform.
///
/// Only `Message` can ever produce a reply; every other event type is kept
/// as `Other` so it can be logged and rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Message {
        text: Option<String>,
        channel_id: String,
        sender_id: Option<String>,
    },
    Other {
        kind: String,
    },
}

impl InboundEvent {
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            InboundEvent::Message { .. } => "message",
            InboundEvent::Other { kind } => kind,
        }
    }

    #[must_use]
    pub fn channel_id(&self) -> Option<&str> {
        match self {
            InboundEvent::Message { channel_id, .. } => Some(channel_id),
            InboundEvent::Other { .. } => None,
        }
    }
}

/// The bot's own account, resolved once the session is ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// A reply destination resolved from a channel id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRef {
    pub id: String,
    pub name: String,
    pub visibility: Visibility,
}

/// The featured item scraped from the announcements page.
///
/// Every field may be empty; a partially filled offer is still a valid result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialOffer {
    pub title: String,
    pub description: String,
    pub image_ref: Option<String>,
}

impl SpecialOffer {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.description.is_empty()
            && self.image_ref.as_deref().is_none_or(str::is_empty)
    }
}
