//! Speech-to-text integration
//!
//! The speech model runs out of process; this module only carries the trait
//! seam and an HTTP client for a Whisper-style transcription service.

use crate::config::SpeechConfig;
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::multipart;
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use tracing::error;

/// Longest transcript the service will hand downstream, in words.
const MAX_TRANSCRIPT_WORDS: usize = 250;

#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe the audio file at `path` with a language hint.
    /// Returns the (possibly empty) transcript text.
    async fn transcribe(&self, path: &Path, language: &str) -> Result<String, ApiError>;
}

/// Client for an HTTP transcription service exposing a multipart
/// `/transcribe` endpoint that answers `{"text": "..."}`.
pub struct WhisperHttpClient {
    endpoint: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct TranscriptionBody {
    #[serde(default)]
    text: String,
}

impl WhisperHttpClient {
    pub fn new(config: &SpeechConfig) -> Self {
        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl SpeechToText for WhisperHttpClient {
    async fn transcribe(&self, path: &Path, language: &str) -> Result<String, ApiError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::Internal(anyhow::Error::new(e).context("reading upload")))?;

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.wav".to_string());

        let part = multipart::Part::bytes(bytes)
            .file_name(filename)
            .mime_str("audio/wav")
            .map_err(|e| ApiError::upstream(e.to_string()))?;
        let form = multipart::Form::new()
            .part("audio", part)
            .text("language", language.to_string());

        let response = self
            .client
            .post(format!("{}/transcribe", self.endpoint))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Transcription service error {}: {}", status, body);
            return Err(ApiError::upstream(format!(
                "transcription service returned {}",
                status
            )));
        }

        let body: TranscriptionBody = response.json().await?;
        Ok(cap_words(body.text.trim(), MAX_TRANSCRIPT_WORDS))
    }
}

/// Truncate a transcript to at most `max_words` whitespace-separated words.
fn cap_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        text.to_string()
    } else {
        words[..max_words].join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_transcripts_pass_through() {
        assert_eq!(cap_words("padi dan jagung", 250), "padi dan jagung");
    }

    #[test]
    fn long_transcripts_are_capped() {
        let long = vec!["kata"; 300].join(" ");
        let capped = cap_words(&long, 250);
        assert_eq!(capped.split_whitespace().count(), 250);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(cap_words("", 250), "");
    }
}
