//! Parsing of Slack Events API payloads into [`InboundEvent`]s.

use serde_json::Value;

use crate::core::models::InboundEvent;
use crate::errors::BotError;

/// Top-level Events API request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackPayload {
    /// Endpoint handshake; the challenge must be echoed back.
    UrlVerification { challenge: String },
    EventCallback(InboundEvent),
    /// Anything else Slack may send (e.g. `app_rate_limited`).
    Unsupported { kind: String },
}

/// Parses a raw Events API body.
///
/// # Errors
///
/// Returns [`BotError::ParseError`] if the body is not JSON or lacks a `type`.
///
/// # Examples
///
/// ```
/// use burgerbot::slack::events::{CallbackPayload, parse_callback_body};
///
/// let body = r#"{"type":"url_verification","challenge":"abc"}"#;
/// assert_eq!(
///     parse_callback_body(body).unwrap(),
///     CallbackPayload::UrlVerification { challenge: "abc".into() }
/// );
/// ```
pub fn parse_callback_body(body: &str) -> Result<CallbackPayload, BotError> {
    let json_body: Value = serde_json::from_str(body)
        .map_err(|e| BotError::ParseError(format!("Invalid JSON body: {e}")))?;

    let Some(body_type) = json_body.get("type").and_then(|t| t.as_str()) else {
        return Err(BotError::ParseError("Missing payload type".to_string()));
    };

    match body_type {
        "url_verification" => Ok(CallbackPayload::UrlVerification {
            challenge: json_body
                .get("challenge")
                .and_then(|c| c.as_str())
                .unwrap_or("")
                .to_string(),
        }),
        "event_callback" => {
            let event = json_body
                .get("event")
                .ok_or_else(|| BotError::ParseError("Missing event".to_string()))?;
            Ok(CallbackPayload::EventCallback(parse_event(event)))
        }
        other => Ok(CallbackPayload::Unsupported {
            kind: other.to_string(),
        }),
    }
}

/// Maps a Slack `event` object onto the closed [`InboundEvent`] union.
#[must_use]
pub fn parse_event(event: &Value) -> InboundEvent {
    let kind = event.get("type").and_then(|t| t.as_str()).unwrap_or("");
    if kind != "message" {
        return InboundEvent::Other {
            kind: kind.to_string(),
        };
    }

    let str_field = |name: &str| {
        event
            .get(name)
            .and_then(|v| v.as_str())
            .map(ToString::to_string)
    };

    InboundEvent::Message {
        text: str_field("text"),
        channel_id: str_field("channel").unwrap_or_default(),
        sender_id: str_field("user"),
    }
}
