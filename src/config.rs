use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub chat: ChatConfig,
    pub speech: SpeechConfig,
    pub weather: WeatherConfig,
    pub audio: AudioConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub db_path: String,
    pub upload_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    /// Base URL of the external transcription service
    pub endpoint: String,
    /// Language hint passed to the model ("id" for Indonesian)
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    pub min_duration_secs: f64,
    pub max_duration_secs: f64,
    pub min_sample_rate: u32,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            // TANI_SERVICE__HTTP__PORT=8080 style overrides
            .add_source(config::Environment::with_prefix("TANI").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
