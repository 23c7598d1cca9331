// Integration tests for the chat-turn orchestration.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tani_backend::chat::{run_chat_turn, ChatProvider};
use tani_backend::error::ApiError;
use tani_backend::store::{ChatStore, NewMessage, Role};

/// Provider double that returns a canned reply and counts invocations.
struct CannedProvider {
    reply: &'static str,
    calls: AtomicUsize,
}

impl CannedProvider {
    fn new(reply: &'static str) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatProvider for CannedProvider {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.to_string())
    }
}

/// Provider double that always fails upstream.
struct FailingProvider;

#[async_trait]
impl ChatProvider for FailingProvider {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, ApiError> {
        Err(ApiError::upstream("chat API returned 503"))
    }
}

#[tokio::test]
async fn turn_without_session_returns_formatted_and_plain_text() -> Result<()> {
    let store = ChatStore::open_in_memory()?;
    let provider = CannedProvider::new("### Pupuk\n**Urea** untuk padi");

    let turn = run_chat_turn(&store, &provider, None, NewMessage::text("pupuk apa?")).await?;

    assert_eq!(turn.response, " Pupuk\n*Urea* untuk padi");
    assert_eq!(turn.clean_tts_message, " Pupuk\nUrea untuk padi");
    assert!(turn.persisted.is_none());
    assert!(store.list_sessions()?.is_empty());
    Ok(())
}

#[tokio::test]
async fn turn_with_session_persists_the_pair_with_offset_timestamps() -> Result<()> {
    let store = ChatStore::open_in_memory()?;
    let session = store.create_session("Tanya")?;
    let provider = CannedProvider::new("Jawaban");

    let turn = run_chat_turn(
        &store,
        &provider,
        Some(&session.id),
        NewMessage::text("kapan tanam jagung?"),
    )
    .await?;

    let (user, assistant) = turn.persisted.expect("pair should be persisted");
    assert_eq!(user.role, Role::User);
    assert_eq!(user.content, "kapan tanam jagung?");
    assert_eq!(assistant.role, Role::Assistant);
    assert_eq!(assistant.content, "Jawaban");
    assert_eq!(assistant.timestamp, user.timestamp + 1);

    let messages = store.list_messages(&session.id)?;
    assert_eq!(messages.len(), 2);
    Ok(())
}

#[tokio::test]
async fn missing_session_fails_before_the_upstream_call() -> Result<()> {
    let store = ChatStore::open_in_memory()?;
    let provider = CannedProvider::new("tidak terpakai");

    let result = run_chat_turn(
        &store,
        &provider,
        Some("no-such-session"),
        NewMessage::text("halo"),
    )
    .await;

    assert!(matches!(result, Err(ApiError::NotFound(_))));
    assert_eq!(provider.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn upstream_failure_persists_nothing() -> Result<()> {
    let store = ChatStore::open_in_memory()?;
    let session = store.create_session("Gagal")?;

    let result = run_chat_turn(
        &store,
        &FailingProvider,
        Some(&session.id),
        NewMessage::text("halo"),
    )
    .await;

    assert!(matches!(result, Err(ApiError::Upstream(_))));
    assert!(store.list_messages(&session.id)?.is_empty());

    // The session's activity timestamp is untouched as well
    let reloaded = store.get_session(&session.id)?.unwrap();
    assert_eq!(reloaded.updated_at, session.updated_at);
    Ok(())
}

#[tokio::test]
async fn media_refs_on_the_user_message_are_persisted() -> Result<()> {
    let store = ChatStore::open_in_memory()?;
    let session = store.create_session("Suara")?;
    let provider = CannedProvider::new("Jawaban");

    run_chat_turn(
        &store,
        &provider,
        Some(&session.id),
        NewMessage {
            content: "transkrip".to_string(),
            image_path: None,
            audio_path: Some("/uploads/audio/a.wav".to_string()),
        },
    )
    .await?;

    let messages = store.list_messages(&session.id)?;
    assert_eq!(messages[0].audio_path.as_deref(), Some("/uploads/audio/a.wav"));
    assert!(messages[1].audio_path.is_none());
    Ok(())
}
