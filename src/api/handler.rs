//! Lambda handler for Slack Events API callbacks.
//!
//! This module handles:
//! - Request validation (headers, body, signature)
//! - `url_verification` handshakes
//! - Dropping Slack redeliveries so each event is handled at most once
//! - Dispatching message events through the reply pipeline

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use std::sync::OnceLock;
use tokio::sync::OnceCell;
use tracing::{error, info};

use super::{helpers, parsing, signature};
use crate::clients::HttpFetcher;
use crate::core::config::AppConfig;
use crate::core::models::InboundEvent;
use crate::errors::BotError;
use crate::pipeline::EventDispatcher;
use crate::slack::{CallbackPayload, SlackSession, parse_callback_body};

pub use self::function_handler as handler;

// Resolved on the first dispatched event and kept for the container's lifetime.
static SESSION: OnceCell<SlackSession> = OnceCell::const_new();
static FETCHER: OnceLock<HttpFetcher> = OnceLock::new();

/// What to do with a validated request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestAction {
    /// Answer immediately with this response.
    Respond(Value),
    /// Acknowledge after running the event through the pipeline.
    Dispatch(InboundEvent),
}

/// Lambda handler for the Events API entrypoint.
///
/// # Errors
///
/// Returns an error only when configuration is missing. Every other failure
/// is turned into an HTTP response so Slack does not redeliver the event.
#[tracing::instrument(level = "info", skip(event))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(BotError::ConfigError(e))
    })?;

    let inbound = match route_request(&event.payload, &config.slack_signing_secret) {
        RequestAction::Respond(response) => return Ok(response),
        RequestAction::Dispatch(inbound) => inbound,
    };

    let session = match SESSION
        .get_or_try_init(|| SlackSession::connect(&config))
        .await
    {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to initialize Slack session: {}", e);
            return Ok(helpers::err_response(500, "Session unavailable"));
        }
    };
    let fetcher = FETCHER.get_or_init(|| HttpFetcher::new(config.fetch_timeout));

    let dispatcher = EventDispatcher::new(&config, session, session, fetcher)
        .with_identity(session.identity());
    let outcome = dispatcher.handle(&inbound).await;
    info!(event_type = %inbound.kind(), outcome = ?outcome, "Event handled");

    Ok(helpers::ok_empty())
}

/// Validates a function URL payload and decides how to answer it.
#[must_use]
pub fn route_request(payload: &Value, signing_secret: &str) -> RequestAction {
    let Some(headers) = payload.get("headers") else {
        error!("Request missing headers");
        return RequestAction::Respond(helpers::err_response(400, "Missing headers"));
    };

    let body = match extract_body(payload) {
        Ok(b) => b,
        Err(response) => return RequestAction::Respond(response),
    };

    if let Err(response) = verify_signature(body, headers, signing_secret) {
        return RequestAction::Respond(response);
    }

    if parsing::is_slack_retry(headers) {
        info!("Ignoring Slack redelivery");
        return RequestAction::Respond(helpers::ok_empty());
    }

    match parse_callback_body(body) {
        Ok(CallbackPayload::UrlVerification { challenge }) => {
            RequestAction::Respond(helpers::ok_challenge(&challenge))
        }
        Ok(CallbackPayload::EventCallback(inbound)) => RequestAction::Dispatch(inbound),
        Ok(CallbackPayload::Unsupported { kind }) => {
            info!(payload_type = %kind, "Ignoring unsupported payload");
            RequestAction::Respond(helpers::ok_empty())
        }
        Err(e) => {
            error!("Failed to parse Slack event: {}", e);
            RequestAction::Respond(helpers::err_response(400, &format!("Parse Error: {e}")))
        }
    }
}

// ============================================================================
// Request Validation Helpers
// ============================================================================

fn extract_body(payload: &Value) -> Result<&str, Value> {
    let Some(body) = payload.get("body") else {
        error!("Request missing body");
        return Err(helpers::err_response(400, "Missing body"));
    };

    let Some(body_str) = body.as_str() else {
        error!("Request body is not a string");
        return Err(helpers::err_response(400, "Invalid body format"));
    };

    Ok(body_str)
}

fn verify_signature(body: &str, headers: &Value, signing_secret: &str) -> Result<(), Value> {
    let Some(sig) = parsing::get_header_value(headers, "X-Slack-Signature") else {
        error!("Missing X-Slack-Signature header");
        return Err(helpers::err_response(
            401,
            "Missing X-Slack-Signature header",
        ));
    };

    let Some(timestamp) = parsing::get_header_value(headers, "X-Slack-Request-Timestamp") else {
        error!("Missing X-Slack-Request-Timestamp header");
        return Err(helpers::err_response(
            401,
            "Missing X-Slack-Request-Timestamp header",
        ));
    };

    if !signature::verify_slack_signature(body, timestamp, sig, signing_secret) {
        error!("Slack signature verification failed");
        return Err(helpers::err_response(401, "Invalid Slack signature"));
    }

    Ok(())
}
