//! All Slack-specific functionality

pub mod client;
pub mod events;
pub mod session;

// Re-export main types for convenience
pub use client::SlackClient;
pub use events::{CallbackPayload, parse_callback_body, parse_event};
pub use session::{ChannelDirectory, SlackSession};
