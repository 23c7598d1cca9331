use crate::audio::{AudioLimits, UploadStore};
use crate::chat::ChatProvider;
use crate::store::ChatStore;
use crate::transcribe::SpeechToText;
use crate::weather::WeatherProvider;
use std::sync::Arc;

/// Shared application state for HTTP handlers.
///
/// Every external collaborator sits behind a trait object so tests can
/// inject doubles instead of live services.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ChatStore>,
    pub chat: Arc<dyn ChatProvider>,
    pub speech: Arc<dyn SpeechToText>,
    pub weather: Arc<dyn WeatherProvider>,
    pub uploads: Arc<UploadStore>,
    pub audio_limits: AudioLimits,

    /// Language hint forwarded to the transcription service
    pub speech_language: String,
}
