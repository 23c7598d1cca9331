pub mod audio;
pub mod chat;
pub mod config;
pub mod error;
pub mod http;
pub mod store;
pub mod transcribe;
pub mod weather;

pub use audio::{validate_wav, AudioLimits, AudioProbe, StoredUpload, UploadStore};
pub use chat::{format_reply, run_chat_turn, ChatProvider, ChatTurn, DeepSeekProvider};
pub use config::Config;
pub use error::ApiError;
pub use http::{create_router, AppState};
pub use store::{ChatStore, Message, NewMessage, Role, Session};
pub use transcribe::{SpeechToText, WhisperHttpClient};
pub use weather::{OpenWeatherClient, WeatherProvider, WeatherReport};
