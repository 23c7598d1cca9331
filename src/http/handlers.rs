use super::state::AppState;
use crate::chat::{run_chat_turn, ChatTurn};
use crate::error::ApiError;
use crate::store::{Message, NewMessage, Role, Session};
use crate::weather::mock_report;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// Optional display name (defaults to "New Chat")
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenameSessionRequest {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AppendMessageRequest {
    pub content: Option<String>,
    pub role: Option<String>,
    pub image_path: Option<String>,
    pub audio_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,

    /// When present, the user/assistant pair is persisted to this session
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub clean_tts_message: String,
    pub is_farming_related: bool,
}

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub status: String,
    pub transcription: String,
    pub ai_response: String,
    pub audio_url: String,
}

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    #[serde(default)]
    pub mock: bool,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: String,
}

// ============================================================================
// Session handlers
// ============================================================================

/// GET /api/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Session>>, ApiError> {
    Ok(Json(state.store.list_sessions()?))
}

/// POST /api/sessions
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<Session>, ApiError> {
    let name = req.name.unwrap_or_else(|| "New Chat".to_string());
    let session = state.store.create_session(&name)?;
    Ok(Json(session))
}

/// PUT /api/sessions/:session_id
pub async fn rename_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<RenameSessionRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let name = req
        .name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::validation("Name is required"))?;

    state.store.rename_session(&session_id, &name)?;
    Ok(Json(StatusResponse {
        message: "Session updated successfully".to_string(),
    }))
}

/// DELETE /api/sessions/:session_id
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.store.delete_session(&session_id)?;
    Ok(Json(StatusResponse {
        message: "Session deleted successfully".to_string(),
    }))
}

// ============================================================================
// Message handlers
// ============================================================================

/// GET /api/sessions/:session_id/messages
pub async fn list_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<Message>>, ApiError> {
    Ok(Json(state.store.list_messages(&session_id)?))
}

/// POST /api/sessions/:session_id/messages
pub async fn append_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<AppendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let (content, role_str) = match (req.content, req.role) {
        (Some(c), Some(r)) => (c, r),
        _ => {
            return Err(ApiError::validation(
                "Missing required fields: content, role",
            ))
        }
    };
    let role = Role::parse(&role_str)
        .ok_or_else(|| ApiError::validation(format!("Invalid role: {}", role_str)))?;

    let message = state.store.append_message(
        &session_id,
        role,
        NewMessage {
            content,
            image_path: req.image_path,
            audio_path: req.audio_path,
        },
    )?;

    Ok((StatusCode::CREATED, Json(message)))
}

/// DELETE /api/sessions/:session_id/messages/:message_id
pub async fn delete_message(
    State(state): State<AppState>,
    Path((session_id, message_id)): Path<(String, String)>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.store.delete_message(&session_id, &message_id)?;
    Ok(Json(StatusResponse {
        message: "Message deleted successfully".to_string(),
    }))
}

/// DELETE /api/sessions/:session_id/messages
pub async fn clear_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.store.clear_messages(&session_id)?;
    Ok(Json(StatusResponse {
        message: "All messages cleared successfully".to_string(),
    }))
}

// ============================================================================
// Chat / transcription / weather
// ============================================================================

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = req
        .message
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::validation("Message is required"))?;

    let turn = run_chat_turn(
        &state.store,
        state.chat.as_ref(),
        req.session_id.as_deref(),
        NewMessage::text(message),
    )
    .await?;

    Ok(Json(chat_response(turn)))
}

/// POST /api/transcribe
///
/// Multipart upload: required `audio` file part, optional `session_id` text
/// field. The upload is validated before the model sees it; a rejected file
/// is deleted. Persistence failures after a successful transcription do not
/// fail the request.
pub async fn transcribe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let mut audio_bytes: Option<Vec<u8>> = None;
    let mut session_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().map(|n| n.to_string());
        match name.as_deref() {
            Some("audio") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(format!("Failed to read audio: {}", e)))?;
                audio_bytes = Some(bytes.to_vec());
            }
            Some("session_id") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation(format!("Bad session_id field: {}", e)))?;
                if !value.is_empty() {
                    session_id = Some(value);
                }
            }
            _ => {}
        }
    }

    let audio_bytes = audio_bytes
        .filter(|b| !b.is_empty())
        .ok_or_else(|| ApiError::validation("No audio file provided"))?;

    let upload = state.uploads.save_wav(&audio_bytes)?;

    if let Err(e) = crate::audio::validate_wav(&upload.path, &state.audio_limits) {
        state.uploads.discard(&upload);
        return Err(e);
    }

    let transcription = state
        .speech
        .transcribe(&upload.path, &state.speech_language)
        .await?;
    if transcription.is_empty() {
        return Err(ApiError::validation("No speech detected"));
    }
    info!("Transcribed {}: {} chars", upload.filename, transcription.len());

    let turn = run_chat_turn(
        &state.store,
        state.chat.as_ref(),
        None,
        NewMessage::text(transcription.clone()),
    )
    .await?;

    // Best-effort persistence: the caller still gets the transcription and
    // reply even if the session write fails.
    if let Some(id) = &session_id {
        let user = NewMessage {
            content: transcription.clone(),
            image_path: None,
            audio_path: Some(upload.public_url.clone()),
        };
        if let Err(e) = state.store.append_turn(id, user, &turn.response) {
            warn!("Failed to persist transcribed turn in session {}: {}", id, e);
        }
    }

    Ok(Json(TranscribeResponse {
        status: "success".to_string(),
        transcription,
        ai_response: turn.response,
        audio_url: upload.public_url,
    }))
}

/// GET /api/weather
pub async fn weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<crate::weather::WeatherReport>, ApiError> {
    if query.mock {
        return Ok(Json(mock_report()));
    }

    let (lat, lon) = match (query.lat, query.lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return Err(ApiError::validation("lat and lon are required")),
    };

    match state.weather.current(lat, lon).await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            // Weather is non-critical: degrade to the mock payload instead
            // of surfacing the upstream failure.
            error!("Weather lookup failed, serving mock payload: {}", e);
            Ok(Json(mock_report()))
        }
    }
}

/// GET /
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

fn chat_response(turn: ChatTurn) -> ChatResponse {
    ChatResponse {
        response: turn.response,
        clean_tts_message: turn.clean_tts_message,
        is_farming_related: true,
    }
}
