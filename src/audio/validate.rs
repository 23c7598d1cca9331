use crate::config::AudioConfig;
use crate::error::ApiError;
use hound::WavReader;
use std::path::Path;

/// Smallest upload worth probing; anything below this is a truncated write.
const MIN_FILE_BYTES: u64 = 100;

/// Validation thresholds for uploaded audio
#[derive(Debug, Clone)]
pub struct AudioLimits {
    pub min_duration_secs: f64,
    pub max_duration_secs: f64,
    pub min_sample_rate: u32,
}

impl Default for AudioLimits {
    fn default() -> Self {
        Self {
            min_duration_secs: 0.5,
            max_duration_secs: 30.0,
            min_sample_rate: 8000,
        }
    }
}

impl From<&AudioConfig> for AudioLimits {
    fn from(cfg: &AudioConfig) -> Self {
        Self {
            min_duration_secs: cfg.min_duration_secs,
            max_duration_secs: cfg.max_duration_secs,
            min_sample_rate: cfg.min_sample_rate,
        }
    }
}

/// What the probe learned about an accepted file
#[derive(Debug, Clone)]
pub struct AudioProbe {
    pub sample_rate: u32,
    pub channels: u16,
    pub duration_seconds: f64,
}

/// Advisory pre-transcription checks: minimum size, parseable WAV header,
/// sample rate, channel count, duration bounds. Passing here is a filter,
/// not a guarantee the model can transcribe the audio.
pub fn validate_wav(path: &Path, limits: &AudioLimits) -> Result<AudioProbe, ApiError> {
    let metadata = std::fs::metadata(path)
        .map_err(|_| ApiError::validation("File not found"))?;
    if metadata.len() < MIN_FILE_BYTES {
        return Err(ApiError::validation("File too small (corrupted?)"));
    }

    let reader = WavReader::open(path)
        .map_err(|e| ApiError::validation(format!("Invalid audio file: {}", e)))?;

    let spec = reader.spec();
    if spec.channels < 1 {
        return Err(ApiError::validation("No audio channels"));
    }
    if spec.sample_rate < limits.min_sample_rate {
        return Err(ApiError::validation(format!(
            "Sample rate too low (min {} Hz)",
            limits.min_sample_rate
        )));
    }

    // duration() counts inter-channel frames, so no division by channels
    let duration_seconds = reader.duration() as f64 / spec.sample_rate as f64;
    if duration_seconds < limits.min_duration_secs {
        return Err(ApiError::validation(format!(
            "Audio too short (min {:.1}s)",
            limits.min_duration_secs
        )));
    }
    if duration_seconds > limits.max_duration_secs {
        return Err(ApiError::validation(format!(
            "Audio too long (max {:.0}s)",
            limits.max_duration_secs
        )));
    }

    Ok(AudioProbe {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        duration_seconds,
    })
}
