//! HTTP API server for the farming-assistant client
//!
//! This module provides the REST surface:
//! - /api/sessions CRUD (+ per-session message CRUD)
//! - POST /api/chat - one conversational turn
//! - POST /api/transcribe - audio upload → transcription → chat turn
//! - GET /api/weather - weather + farming advice
//! - /uploads/audio/* - stored audio assets

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
