use super::{format_reply, ChatProvider, SYSTEM_PROMPT};
use crate::error::ApiError;
use crate::store::{ChatStore, Message, NewMessage};
use tracing::info;

/// Result of one send-message operation
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// Assistant reply with normalized markup, for on-screen rendering
    pub response: String,

    /// Marker-free variant of the reply, for speech synthesis
    pub clean_tts_message: String,

    /// Persisted pair, present only when a session id was supplied
    pub persisted: Option<(Message, Message)>,
}

/// Run one conversational turn: call the completion API under the farming
/// persona, clean up the reply, and (when a session is given) persist the
/// user/assistant pair in a single transaction.
///
/// The session is checked before paying for the upstream call; a failed
/// completion therefore persists nothing.
pub async fn run_chat_turn(
    store: &ChatStore,
    provider: &dyn ChatProvider,
    session_id: Option<&str>,
    user_message: NewMessage,
) -> Result<ChatTurn, ApiError> {
    if let Some(id) = session_id {
        if store.get_session(id)?.is_none() {
            return Err(ApiError::not_found(format!("Session {} not found", id)));
        }
    }

    let raw = provider.complete(SYSTEM_PROMPT, &user_message.content).await?;
    let reply = format_reply(&raw);

    let persisted = match session_id {
        Some(id) => {
            let pair = store.append_turn(id, user_message, &reply.formatted)?;
            info!(
                "Persisted chat turn in session {} at t={}",
                id, pair.0.timestamp
            );
            Some(pair)
        }
        None => None,
    };

    Ok(ChatTurn {
        response: reply.formatted,
        clean_tts_message: reply.plain,
        persisted,
    })
}
