//! Decides whether an inbound event deserves a reply.
//!
//! Every predicate is pure. An event is accepted only when all four hold;
//! evaluation order is cheapest-first but carries no meaning.

use crate::core::models::{BotIdentity, InboundEvent};

/// Literal phrase that always triggers a reply.
pub const TRIGGER_PHRASE: &str = "honest special";

/// Channel id prefixes for public channels and private groups.
const CHANNEL_PREFIXES: [char; 2] = ['C', 'G'];

/// Returns `true` when the event should be answered with the current special.
///
/// An unresolved identity rejects every event.
#[must_use]
pub fn should_respond(event: &InboundEvent, identity: Option<&BotIdentity>) -> bool {
    let Some(identity) = identity else {
        return false;
    };

    is_chat_message(event)
        && is_channel_conversation(event)
        && is_not_self(event, identity)
        && is_mentioning(event, identity)
}

#[must_use]
pub fn is_chat_message(event: &InboundEvent) -> bool {
    matches!(event, InboundEvent::Message { text: Some(text), .. } if !text.is_empty())
}

/// Direct messages (`D...`) and anything unrecognized are rejected.
#[must_use]
pub fn is_channel_conversation(event: &InboundEvent) -> bool {
    event
        .channel_id()
        .and_then(|id| id.chars().next())
        .is_some_and(|first| CHANNEL_PREFIXES.contains(&first))
}

#[must_use]
pub fn is_not_self(event: &InboundEvent, identity: &BotIdentity) -> bool {
    match event {
        InboundEvent::Message { sender_id, .. } => sender_id.as_deref() != Some(identity.id.as_str()),
        InboundEvent::Other { .. } => false,
    }
}

#[must_use]
pub fn is_mentioning(event: &InboundEvent, identity: &BotIdentity) -> bool {
    let InboundEvent::Message {
        text: Some(text), ..
    } = event
    else {
        return false;
    };

    let text_lc = text.to_lowercase();
    let name_lc = identity.display_name.to_lowercase();
    let mention_lc = format!("<@{}>", identity.id).to_lowercase();

    text_lc.contains(TRIGGER_PHRASE)
        || (!name_lc.is_empty() && text_lc.contains(&name_lc))
        || (!identity.id.is_empty() && text_lc.contains(&mention_lc))
}
