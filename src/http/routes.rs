use super::handlers;
use super::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Largest accepted request body; covers a 30-second stereo WAV upload.
const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    let uploads_dir = state.uploads.root().to_path_buf();

    Router::new()
        // Health check
        .route("/", get(handlers::health_check))
        // Session management
        .route(
            "/api/sessions",
            get(handlers::list_sessions).post(handlers::create_session),
        )
        .route(
            "/api/sessions/:session_id",
            put(handlers::rename_session).delete(handlers::delete_session),
        )
        // Messages within a session
        .route(
            "/api/sessions/:session_id/messages",
            get(handlers::list_messages)
                .post(handlers::append_message)
                .delete(handlers::clear_messages),
        )
        .route(
            "/api/sessions/:session_id/messages/:message_id",
            delete(handlers::delete_message),
        )
        // Conversational turns
        .route("/api/chat", post(handlers::chat))
        .route("/api/transcribe", post(handlers::transcribe))
        // Weather + farming advice
        .route("/api/weather", get(handlers::weather))
        // Stored audio assets
        .nest_service("/uploads/audio", ServeDir::new(uploads_dir))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
