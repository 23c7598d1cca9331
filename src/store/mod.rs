//! Session/message persistence
//!
//! This module provides the `ChatStore` abstraction that manages:
//! - Named conversation sessions ordered by last activity
//! - Messages owned by a session, ordered by millisecond timestamp
//! - Cascade deletion of messages when a session is removed
//! - Transactional pairing of a user message with its assistant reply

mod models;
mod store;

pub use models::{Message, NewMessage, Role, Session};
pub use store::ChatStore;
