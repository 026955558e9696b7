//! Burgerbot - a Slack bot that answers questions about the current Honest Burgers special.
//!
//! The bot listens to Slack Events API callbacks delivered to an AWS Lambda
//! function URL. Messages in public channels or private groups that mention
//! "honest special", the bot's name, or `<@bot>` get a reply with the featured
//! item scraped from the restaurant's announcements page.
//!
//! # Architecture
//!
//! The system uses:
//! - AWS Lambda for serverless execution
//! - slack-morphism for Slack API interactions
//! - reqwest and scraper for fetching and reading the special's page
//! - Tokio for async runtime
//!
//! # Example
//!
//! ```
//! use burgerbot::core::models::{BotIdentity, InboundEvent};
//! use burgerbot::pipeline::classifier::should_respond;
//!
//! let identity = BotIdentity {
//!     id: "U000".to_string(),
//!     display_name: "burgerbot".to_string(),
//! };
//! let event = InboundEvent::Message {
//!     text: Some("what's the Honest Special today?".to_string()),
//!     channel_id: "C123".to_string(),
//!     sender_id: Some("U999".to_string()),
//! };
//!
//! assert!(should_respond(&event, Some(&identity)));
//! assert!(!should_respond(&event, None));
//! ```

pub mod api;
pub mod clients;
pub mod core;
pub mod errors;
pub mod pipeline;
pub mod slack;

pub use errors::{BotError, FetchError};
pub use pipeline::{DispatchOutcome, EventDispatcher};
pub use slack::SlackSession;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration. The level defaults to `info` and can be
/// overridden with `RUST_LOG`. Calling it more than once is harmless.
///
/// # Example
///
/// ```
/// // Initialize structured logging at the start of your Lambda handler
/// burgerbot::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
