use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use burgerbot::core::config::AppConfig;
use burgerbot::core::models::{BotIdentity, ChannelRef, InboundEvent, Visibility};
use burgerbot::errors::{BotError, FetchError};
use burgerbot::pipeline::{
    ChatSession, ContentFetcher, DispatchOutcome, EventDispatcher, get_burger_details,
};
use burgerbot::slack::ChannelDirectory;

const SMOKEY_PAGE: &str = r#"<html><body><div id="main"><div class="latest-news">
    <a href="/news"><span class="news_span">The Smokey</span>
    <p>Bacon, BBQ sauce, cheese</p><img src="/img/smokey.png"></a>
</div></div></body></html>"#;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Sent {
    Channel { name: String, text: String },
    Group { name: String, text: String },
}

#[derive(Default)]
struct RecordingSession {
    sent: Mutex<Vec<Sent>>,
    fail: bool,
}

impl RecordingSession {
    fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatSession for RecordingSession {
    async fn post_to_channel(&self, channel: &ChannelRef, text: &str) -> Result<(), BotError> {
        if self.fail {
            return Err(BotError::ApiError("channel_not_found".to_string()));
        }
        self.sent.lock().unwrap().push(Sent::Channel {
            name: channel.name.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn post_to_group(&self, channel: &ChannelRef, text: &str) -> Result<(), BotError> {
        if self.fail {
            return Err(BotError::ApiError("channel_not_found".to_string()));
        }
        self.sent.lock().unwrap().push(Sent::Group {
            name: channel.name.clone(),
            text: text.to_string(),
        });
        Ok(())
    }
}

struct StubFetcher {
    response: Result<String, FetchError>,
    calls: Mutex<Vec<String>>,
}

impl StubFetcher {
    fn ok(markup: &str) -> Self {
        Self {
            response: Ok(markup.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            response: Err(FetchError::new("http://burgers.test/", "connection reset")),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.response.clone()
    }
}

fn config() -> AppConfig {
    AppConfig {
        slack_bot_token: "xoxb-test".to_string(),
        slack_signing_secret: "secret".to_string(),
        bot_name: "burgerbot".to_string(),
        special_url: "http://burgers.test/".to_string(),
        apology_message: "Sorry, no special today".to_string(),
        fetch_timeout: Duration::from_secs(5),
    }
}

fn identity() -> BotIdentity {
    BotIdentity {
        id: "U000".to_string(),
        display_name: "burgerbot".to_string(),
    }
}

fn roster() -> ChannelDirectory {
    ChannelDirectory::new([
        ChannelRef {
            id: "C123".to_string(),
            name: "general".to_string(),
            visibility: Visibility::Public,
        },
        ChannelRef {
            id: "G456".to_string(),
            name: "burger-club".to_string(),
            visibility: Visibility::Private,
        },
    ])
}

fn question(channel_id: &str) -> InboundEvent {
    InboundEvent::Message {
        text: Some("what's the Honest Special today?".to_string()),
        channel_id: channel_id.to_string(),
        sender_id: Some("U999".to_string()),
    }
}

#[tokio::test]
async fn test_replies_with_special_in_public_channel() {
    let config = config();
    let identity = identity();
    let session = RecordingSession::default();
    let roster = roster();
    let fetcher = StubFetcher::ok(SMOKEY_PAGE);

    let dispatcher =
        EventDispatcher::new(&config, &session, &roster, &fetcher).with_identity(&identity);
    let outcome = dispatcher.handle(&question("C123")).await;

    assert_eq!(
        outcome,
        DispatchOutcome::Replied {
            visibility: Visibility::Public
        }
    );
    assert_eq!(
        session.sent(),
        vec![Sent::Channel {
            name: "general".to_string(),
            text: "*The Smokey*\nBacon, BBQ sauce, cheese\n/img/smokey.png".to_string(),
        }]
    );
    assert_eq!(fetcher.calls(), vec!["http://burgers.test/".to_string()]);
}

#[tokio::test]
async fn test_fetch_failure_sends_apology_on_same_path() {
    let config = config();
    let identity = identity();
    let session = RecordingSession::default();
    let roster = roster();
    let fetcher = StubFetcher::failing();

    let dispatcher =
        EventDispatcher::new(&config, &session, &roster, &fetcher).with_identity(&identity);
    let outcome = dispatcher.handle(&question("C123")).await;

    assert_eq!(
        outcome,
        DispatchOutcome::Replied {
            visibility: Visibility::Public
        }
    );
    assert_eq!(
        session.sent(),
        vec![Sent::Channel {
            name: "general".to_string(),
            text: "Sorry, no special today".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_private_group_uses_group_path() {
    let config = config();
    let identity = identity();
    let session = RecordingSession::default();
    let roster = roster();
    let fetcher = StubFetcher::ok(SMOKEY_PAGE);

    let dispatcher =
        EventDispatcher::new(&config, &session, &roster, &fetcher).with_identity(&identity);
    let outcome = dispatcher.handle(&question("G456")).await;

    assert_eq!(
        outcome,
        DispatchOutcome::Replied {
            visibility: Visibility::Private
        }
    );
    assert!(matches!(
        session.sent().as_slice(),
        [Sent::Group { name, .. }] if name == "burger-club"
    ));
}

#[tokio::test]
async fn test_unknown_channel_is_dropped_without_fetch() {
    let config = config();
    let identity = identity();
    let session = RecordingSession::default();
    let roster = roster();
    let fetcher = StubFetcher::ok(SMOKEY_PAGE);

    let dispatcher =
        EventDispatcher::new(&config, &session, &roster, &fetcher).with_identity(&identity);
    let outcome = dispatcher.handle(&question("C777")).await;

    assert_eq!(outcome, DispatchOutcome::ChannelNotFound);
    assert!(session.sent().is_empty());
    assert!(fetcher.calls().is_empty());
}

#[tokio::test]
async fn test_rejected_events_never_fetch() {
    let config = config();
    let identity = identity();
    let session = RecordingSession::default();
    let roster = roster();
    let fetcher = StubFetcher::ok(SMOKEY_PAGE);

    let dispatcher =
        EventDispatcher::new(&config, &session, &roster, &fetcher).with_identity(&identity);

    let own_reply = InboundEvent::Message {
        text: Some("*Honest Special*".to_string()),
        channel_id: "C123".to_string(),
        sender_id: Some("U000".to_string()),
    };
    let other = InboundEvent::Other {
        kind: "reaction_added".to_string(),
    };

    assert_eq!(dispatcher.handle(&own_reply).await, DispatchOutcome::Ignored);
    assert_eq!(dispatcher.handle(&other).await, DispatchOutcome::Ignored);
    assert_eq!(dispatcher.handle(&question("D123")).await, DispatchOutcome::Ignored);
    assert!(fetcher.calls().is_empty());
    assert!(session.sent().is_empty());
}

#[tokio::test]
async fn test_not_ready_dispatcher_ignores_everything() {
    let config = config();
    let session = RecordingSession::default();
    let roster = roster();
    let fetcher = StubFetcher::ok(SMOKEY_PAGE);

    let dispatcher = EventDispatcher::new(&config, &session, &roster, &fetcher);

    assert_eq!(dispatcher.handle(&question("C123")).await, DispatchOutcome::Ignored);
    assert!(fetcher.calls().is_empty());
}

#[tokio::test]
async fn test_send_failure_is_absorbed() {
    let config = config();
    let identity = identity();
    let session = RecordingSession {
        fail: true,
        ..RecordingSession::default()
    };
    let roster = roster();
    let fetcher = StubFetcher::ok(SMOKEY_PAGE);

    let dispatcher =
        EventDispatcher::new(&config, &session, &roster, &fetcher).with_identity(&identity);

    assert_eq!(
        dispatcher.handle(&question("C123")).await,
        DispatchOutcome::SendFailed
    );
}

#[tokio::test]
async fn test_get_burger_details_passes_through_fetch_error() {
    let fetcher = StubFetcher::failing();
    let result = get_burger_details(&fetcher, "http://burgers.test/").await;

    assert!(matches!(result, Err(FetchError { ref reason, .. }) if reason == "connection reset"));
}

#[tokio::test]
async fn test_get_burger_details_returns_empty_offer_for_unknown_layout() {
    let fetcher = StubFetcher::ok("<html><body><h1>We moved!</h1></body></html>");
    let offer = get_burger_details(&fetcher, "http://burgers.test/")
        .await
        .unwrap();

    assert!(offer.is_empty());
}
