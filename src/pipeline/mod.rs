//! The reply pipeline: classification, extraction, composition and dispatch.

pub mod classifier;
pub mod composer;
pub mod dispatcher;
pub mod extractor;
pub mod traits;

pub use dispatcher::{DispatchOutcome, EventDispatcher, get_burger_details};
pub use traits::{ChannelRoster, ChatSession, ContentFetcher};
