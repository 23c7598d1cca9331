use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tani_backend::audio::{AudioLimits, UploadStore};
use tani_backend::chat::DeepSeekProvider;
use tani_backend::store::ChatStore;
use tani_backend::transcribe::WhisperHttpClient;
use tani_backend::weather::OpenWeatherClient;
use tani_backend::{create_router, AppState, Config};
use tracing::info;

#[derive(Parser)]
#[command(about = "Conversational backend for the PeTaniku farming assistant")]
struct Cli {
    /// Path to the config file (without extension)
    #[arg(long, default_value = "config/tani-backend")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("{} starting", cfg.service.name);
    info!(
        "HTTP server will bind to {}:{}",
        cfg.service.http.bind, cfg.service.http.port
    );
    info!("Database: {}", cfg.storage.db_path);
    info!("Uploads: {}", cfg.storage.upload_dir);

    let deepseek_key =
        std::env::var("DEEPSEEK_API_KEY").context("DEEPSEEK_API_KEY is not set")?;
    let openweather_key =
        std::env::var("OPENWEATHER_API_KEY").context("OPENWEATHER_API_KEY is not set")?;

    let store = Arc::new(ChatStore::open(&cfg.storage.db_path)?);
    let uploads = Arc::new(UploadStore::new(&cfg.storage.upload_dir)?);

    let state = AppState {
        store,
        chat: Arc::new(DeepSeekProvider::new(&cfg.chat, deepseek_key)),
        speech: Arc::new(WhisperHttpClient::new(&cfg.speech)),
        weather: Arc::new(OpenWeatherClient::new(&cfg.weather, openweather_key)),
        uploads,
        audio_limits: AudioLimits::from(&cfg.audio),
        speech_language: cfg.speech.language.clone(),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
