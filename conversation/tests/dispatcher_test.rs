//! Integration tests for [`conversation::ConversationDispatcher`] over the in-memory store.
//!
//! Covers: weather by city and by location, ignored locations, trivia question/answer flow
//! with exact matching, `/start` and fallbacks leaving state alone, provider and store
//! failures producing no replies and no state change, and racing `/trivia` events.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use content::{ContentProviders, Place, TriviaChallenge};
use conversation::dispatcher::{
    CITY_PROMPT, CORRECT_ANSWER, FALLBACK, SHARE_LOCATION, TRIVIA_INTRO, UNKNOWN_COMMAND,
    WRONG_ANSWER,
};
use conversation::{
    ChatSession, ConversationDispatcher, ConversationState, ConversationStore,
    InMemoryConversationStore, COMMANDS,
};
use lizbot_core::{ChatId, Coordinates, InboundEvent, LizbotError, Result};

const CHAT: i64 = 456;

#[derive(Default)]
struct StubContent {
    fail: bool,
    trivia_delay: Option<Duration>,
    weather_calls: AtomicUsize,
    trivia_calls: AtomicUsize,
}

impl StubContent {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            Err(LizbotError::content("stub provider down"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ContentProviders for StubContent {
    async fn random_fact(&self) -> Result<String> {
        self.check()?;
        Ok("Honey never spoils.".to_string())
    }

    async fn random_compliment(&self) -> Result<String> {
        self.check()?;
        Ok("You look great today.".to_string())
    }

    async fn random_fortune(&self) -> Result<String> {
        self.check()?;
        Ok("A bug is near.".to_string())
    }

    async fn random_trivia_challenge(&self) -> Result<TriviaChallenge> {
        self.trivia_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.trivia_delay {
            tokio::time::sleep(delay).await;
        }
        self.check()?;
        Ok(TriviaChallenge::new(
            "What is 6 x 7?",
            vec!["42".to_string(), "36".to_string(), "24".to_string()],
            0,
        ))
    }

    async fn weather_for(&self, place: &Place) -> Result<String> {
        self.weather_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(format!("20 \u{00B0}C, clear sky in {}", place))
    }
}

struct Fixture {
    store: InMemoryConversationStore,
    content: Arc<StubContent>,
    dispatcher: ConversationDispatcher,
}

fn fixture_with(content: StubContent) -> Fixture {
    let store = InMemoryConversationStore::new();
    let content = Arc::new(content);
    let dispatcher = ConversationDispatcher::new(
        Arc::new(store.clone()),
        content.clone(),
        vec!["London".to_string(), "Brasov".to_string()],
    );
    Fixture {
        store,
        content,
        dispatcher,
    }
}

fn fixture() -> Fixture {
    fixture_with(StubContent::default())
}

fn text(t: &str) -> InboundEvent {
    InboundEvent::text(CHAT, "Ann", t)
}

fn location() -> InboundEvent {
    InboundEvent::location(CHAT, "Ann", Coordinates::new(45.65, 25.6))
}

impl Fixture {
    async fn state(&self) -> ConversationState {
        self.store.state(ChatId(CHAT)).await
    }

    async fn send(&self, t: &str) -> Vec<lizbot_core::OutboundMessage> {
        self.dispatcher.handle(&text(t)).await.unwrap()
    }
}

/// **Test: /weather then a known city yields two messages and ends Idle.**
#[tokio::test]
async fn test_weather_by_city() {
    let f = fixture();

    let prompt = f.send("/weather").await;
    assert_eq!(prompt.len(), 1);
    assert_eq!(prompt[0].text, CITY_PROMPT);
    assert_eq!(prompt[0].chat_id, ChatId(CHAT));
    let keyboard = prompt[0].keyboard.as_ref().unwrap();
    assert_eq!(keyboard.labels(), vec!["London", "Brasov", SHARE_LOCATION]);
    assert!(keyboard.buttons[2].request_location);
    assert_eq!(f.state().await, ConversationState::AwaitingCity);

    let reply = f.send("Brasov").await;
    assert_eq!(reply.len(), 1);
    assert_eq!(reply[0].text, "20 \u{00B0}C, clear sky in Brasov");
    assert!(reply[0].keyboard.is_none());
    assert_eq!(f.state().await, ConversationState::Idle);
}

/// **Test: /weather then a shared location yields a weather reply and ends Idle.**
#[tokio::test]
async fn test_weather_by_location() {
    let f = fixture();
    f.send("/weather").await;

    let reply = f.dispatcher.handle(&location()).await.unwrap();
    assert_eq!(reply.len(), 1);
    assert!(reply[0].text.starts_with("20 \u{00B0}C, clear sky in"));
    assert_eq!(f.state().await, ConversationState::Idle);
}

/// **Test: a location without /weather is ignored: no reply, no lookup, state unchanged.**
#[tokio::test]
async fn test_location_without_request_is_ignored() {
    let f = fixture();

    let reply = f.dispatcher.handle(&location()).await.unwrap();
    assert!(reply.is_empty());
    assert_eq!(f.state().await, ConversationState::Idle);

    f.send("/trivia").await;
    let reply = f.dispatcher.handle(&location()).await.unwrap();
    assert!(reply.is_empty());
    assert_eq!(f.state().await, ConversationState::AwaitingTriviaAnswer);
    assert_eq!(f.content.weather_calls.load(Ordering::SeqCst), 0);
}

/// **Test: a city name outside a weather request is plain free text.**
#[tokio::test]
async fn test_city_without_request_falls_back() {
    let f = fixture();
    let reply = f.send("London").await;
    assert_eq!(reply.len(), 1);
    assert_eq!(reply[0].text, FALLBACK);
    assert_eq!(f.content.weather_calls.load(Ordering::SeqCst), 0);
}

/// **Test: /trivia sends intro + question with answer keyboard and records the answer.**
#[tokio::test]
async fn test_trivia_question() {
    let f = fixture();

    let replies = f.send("/trivia").await;
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0].text, TRIVIA_INTRO);
    assert!(replies[0].keyboard.is_none());
    assert_eq!(replies[1].text, "What is 6 x 7?");
    assert_eq!(
        replies[1].keyboard.as_ref().unwrap().labels(),
        vec!["42", "36", "24"]
    );
    assert_eq!(f.state().await, ConversationState::AwaitingTriviaAnswer);
    assert_eq!(
        f.store.pending_answer(ChatId(CHAT)).await.as_deref(),
        Some("42")
    );
}

/// **Test: a second /trivia while one is pending yields nothing and changes nothing.**
#[tokio::test]
async fn test_repeated_trivia_is_ignored() {
    let f = fixture();
    f.send("/trivia").await;

    let replies = f.send("/trivia").await;
    assert!(replies.is_empty());
    assert_eq!(f.state().await, ConversationState::AwaitingTriviaAnswer);
    assert_eq!(
        f.store.pending_answer(ChatId(CHAT)).await.as_deref(),
        Some("42")
    );
    assert_eq!(f.content.trivia_calls.load(Ordering::SeqCst), 1);
}

/// **Test: exact answer is correct; state and pending answer are cleared.**
#[tokio::test]
async fn test_trivia_correct_answer() {
    let f = fixture();
    f.send("/trivia").await;

    let reply = f.send("42").await;
    assert_eq!(reply.len(), 1);
    assert_eq!(reply[0].text, CORRECT_ANSWER);
    assert_eq!(f.state().await, ConversationState::Idle);
    assert!(f.store.pending_answer(ChatId(CHAT)).await.is_none());
}

/// **Test: answers are not trimmed; "42 " is wrong and still ends the question.**
#[tokio::test]
async fn test_trivia_answer_is_exact_match() {
    let f = fixture();
    f.send("/trivia").await;

    let reply = f.send("42 ").await;
    assert_eq!(reply.len(), 1);
    assert_eq!(reply[0].text, WRONG_ANSWER);
    assert_eq!(f.state().await, ConversationState::Idle);
    assert!(f.store.pending_answer(ChatId(CHAT)).await.is_none());
}

/// **Test: an unknown command while awaiting an answer is taken as the answer.**
#[tokio::test]
async fn test_unknown_command_answers_pending_trivia() {
    let f = fixture();
    f.send("/trivia").await;

    let reply = f.send("/help").await;
    assert_eq!(reply.len(), 1);
    assert_eq!(reply[0].text, WRONG_ANSWER);
    assert_eq!(f.state().await, ConversationState::Idle);
}

/// **Test: /weather abandons an open trivia question; the city reply ends fully Idle.**
#[tokio::test]
async fn test_weather_during_trivia_drops_pending_answer() {
    let f = fixture();
    f.send("/trivia").await;

    let prompt = f.send("/weather").await;
    assert_eq!(prompt[0].text, CITY_PROMPT);
    assert_eq!(f.state().await, ConversationState::AwaitingCity);
    assert!(f.store.pending_answer(ChatId(CHAT)).await.is_none());

    let reply = f.send("London").await;
    assert_eq!(reply.len(), 1);
    assert_eq!(f.state().await, ConversationState::Idle);
    assert!(f.store.pending_answer(ChatId(CHAT)).await.is_none());
}

/// **Test: chats that end Idle are not retained by the store.**
#[tokio::test]
async fn test_idle_chats_are_not_retained() {
    let f = fixture();
    for id in 0..200 {
        f.dispatcher
            .handle(&InboundEvent::text(id, "Ann", "/fact"))
            .await
            .unwrap();
    }
    f.dispatcher
        .handle(&InboundEvent::location(500, "Ann", Coordinates::new(1.0, 2.0)))
        .await
        .unwrap();
    assert_eq!(f.store.tracked_chats(), 0);

    f.send("/trivia").await;
    assert_eq!(f.store.tracked_chats(), 1);
    f.send("42").await;
    assert_eq!(f.store.tracked_chats(), 0);
}

/// **Test: /start greets by name with the commands keyboard and keeps existing state.**
#[tokio::test]
async fn test_start_keeps_state() {
    let f = fixture();
    f.send("/weather").await;

    let reply = f.send("/start").await;
    assert_eq!(reply.len(), 1);
    assert!(reply[0].text.contains("Ann"));
    assert_eq!(reply[0].keyboard.as_ref().unwrap().labels(), COMMANDS.to_vec());
    assert_eq!(f.state().await, ConversationState::AwaitingCity);
}

/// **Test: /fact, /mirror and /fortune reply with their source and leave state alone.**
#[tokio::test]
async fn test_content_commands() {
    let f = fixture();
    f.send("/weather").await;

    assert_eq!(f.send("/fact").await[0].text, "Honey never spoils.");
    assert_eq!(f.send("/mirror").await[0].text, "You look great today.");
    assert_eq!(f.send("/fortune").await[0].text, "A bug is near.");
    assert_eq!(f.state().await, ConversationState::AwaitingCity);
}

/// **Test: unknown commands get the fixed reply; free text gets the command list.**
#[tokio::test]
async fn test_unknown_command_and_free_text() {
    let f = fixture();
    f.send("/weather").await;

    let reply = f.send("/unknown").await;
    assert_eq!(reply.len(), 1);
    assert_eq!(reply[0].text, UNKNOWN_COMMAND);
    assert!(reply[0].keyboard.is_none());
    assert_eq!(f.state().await, ConversationState::AwaitingCity);

    let reply = f.send("what can you do?").await;
    assert_eq!(reply.len(), 1);
    assert_eq!(reply[0].text, FALLBACK);
    assert_eq!(reply[0].keyboard.as_ref().unwrap().labels(), COMMANDS.to_vec());
    assert_eq!(f.state().await, ConversationState::AwaitingCity);
}

/// **Test: a failing weather lookup surfaces the error and keeps AwaitingCity.**
#[tokio::test]
async fn test_weather_failure_keeps_state() {
    let f = fixture_with(StubContent::failing());
    f.send("/weather").await;

    let err = f.dispatcher.handle(&text("London")).await.unwrap_err();
    assert!(matches!(err, LizbotError::ContentUnavailable(_)));
    assert_eq!(f.state().await, ConversationState::AwaitingCity);

    let err = f.dispatcher.handle(&location()).await.unwrap_err();
    assert!(matches!(err, LizbotError::ContentUnavailable(_)));
    assert_eq!(f.state().await, ConversationState::AwaitingCity);
}

/// **Test: a failing trivia bank leaves the chat Idle with no pending answer.**
#[tokio::test]
async fn test_trivia_failure_keeps_state() {
    let f = fixture_with(StubContent::failing());

    let err = f.dispatcher.handle(&text("/trivia")).await.unwrap_err();
    assert!(matches!(err, LizbotError::ContentUnavailable(_)));
    assert_eq!(f.state().await, ConversationState::Idle);
    assert!(f.store.pending_answer(ChatId(CHAT)).await.is_none());

    assert!(f.dispatcher.handle(&text("/fact")).await.is_err());
}

/// **Test: a store that cannot open a session fails the event with StoreUnavailable.**
#[tokio::test]
async fn test_store_failure_is_surfaced() {
    struct DownStore;

    #[async_trait]
    impl ConversationStore for DownStore {
        async fn open(&self, _chat_id: ChatId) -> Result<Box<dyn ChatSession>> {
            Err(LizbotError::StoreUnavailable("connection refused".to_string()))
        }
    }

    let content = Arc::new(StubContent::default());
    let dispatcher = ConversationDispatcher::new(
        Arc::new(DownStore),
        content.clone(),
        vec!["London".to_string()],
    );

    let err = dispatcher.handle(&text("/fact")).await.unwrap_err();
    assert!(matches!(err, LizbotError::StoreUnavailable(_)));
}

/// **Test: chats are independent.**
#[tokio::test]
async fn test_chats_do_not_share_state() {
    let f = fixture();
    f.send("/trivia").await;

    let other = InboundEvent::text(CHAT + 1, "Bob", "42");
    let reply = f.dispatcher.handle(&other).await.unwrap();
    assert_eq!(reply[0].text, FALLBACK);
    assert_eq!(f.store.state(ChatId(CHAT + 1)).await, ConversationState::Idle);
    assert_eq!(f.state().await, ConversationState::AwaitingTriviaAnswer);
}

/// **Test: two racing /trivia events for one chat: exactly one asks, the other is silent.**
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_trivia_single_winner() {
    let f = Arc::new(fixture_with(StubContent {
        trivia_delay: Some(Duration::from_millis(30)),
        ..StubContent::default()
    }));

    let a = {
        let f = f.clone();
        tokio::spawn(async move { f.dispatcher.handle(&text("/trivia")).await })
    };
    let b = {
        let f = f.clone();
        tokio::spawn(async move { f.dispatcher.handle(&text("/trivia")).await })
    };
    let a = a.await.unwrap().unwrap();
    let b = b.await.unwrap().unwrap();

    let mut counts = vec![a.len(), b.len()];
    counts.sort();
    assert_eq!(counts, vec![0, 2]);
    assert_eq!(f.content.trivia_calls.load(Ordering::SeqCst), 1);
    assert_eq!(f.state().await, ConversationState::AwaitingTriviaAnswer);
}

/// **Test: a slow lookup in one chat does not block another chat.**
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_slow_chat_does_not_block_others() {
    let f = Arc::new(fixture_with(StubContent {
        trivia_delay: Some(Duration::from_millis(500)),
        ..StubContent::default()
    }));

    let slow = {
        let f = f.clone();
        tokio::spawn(async move { f.dispatcher.handle(&text("/trivia")).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    let other = InboundEvent::text(CHAT + 1, "Bob", "/fact");
    let fast = tokio::time::timeout(Duration::from_millis(200), f.dispatcher.handle(&other))
        .await
        .expect("other chat was blocked")
        .unwrap();
    assert_eq!(fast.len(), 1);

    assert_eq!(slow.await.unwrap().unwrap().len(), 2);
}
