// Integration tests for advisory audio validation.
//
// Fixtures are synthesized with hound so the thresholds (size, sample
// rate, duration window) can be exercised precisely.

use anyhow::Result;
use std::path::Path;
use tani_backend::audio::{validate_wav, AudioLimits};
use tani_backend::error::ApiError;

fn write_wav(path: &Path, duration_secs: f64, sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    let samples = (duration_secs * sample_rate as f64) as usize;
    for i in 0..samples {
        writer.write_sample(((i % 200) as i16) - 100)?;
    }
    writer.finalize()?;
    Ok(())
}

fn expect_validation_error(result: Result<tani_backend::audio::AudioProbe, ApiError>) -> String {
    match result {
        Err(ApiError::Validation(reason)) => reason,
        other => panic!("expected ValidationError, got {:?}", other),
    }
}

#[test]
fn valid_wav_passes_and_reports_probe_data() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("ok.wav");
    write_wav(&path, 2.0, 16000)?;

    let probe = validate_wav(&path, &AudioLimits::default()).expect("should validate");

    assert_eq!(probe.sample_rate, 16000);
    assert_eq!(probe.channels, 1);
    assert!((probe.duration_seconds - 2.0).abs() < 0.01);
    Ok(())
}

#[test]
fn missing_file_is_rejected() {
    let reason = expect_validation_error(validate_wav(
        Path::new("/nonexistent/audio.wav"),
        &AudioLimits::default(),
    ));
    assert!(reason.contains("not found"), "reason: {}", reason);
}

#[test]
fn tiny_file_is_rejected_before_parsing() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("tiny.wav");
    std::fs::write(&path, b"RIFF")?;

    let reason = expect_validation_error(validate_wav(&path, &AudioLimits::default()));
    assert!(reason.contains("too small"), "reason: {}", reason);
    Ok(())
}

#[test]
fn non_wav_payload_is_rejected() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("not-audio.wav");
    std::fs::write(&path, vec![0u8; 4096])?;

    let reason = expect_validation_error(validate_wav(&path, &AudioLimits::default()));
    assert!(reason.contains("Invalid audio file"), "reason: {}", reason);
    Ok(())
}

#[test]
fn audio_below_minimum_duration_is_rejected() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("short.wav");
    write_wav(&path, 0.2, 16000)?;

    let reason = expect_validation_error(validate_wav(&path, &AudioLimits::default()));
    assert!(reason.contains("too short"), "reason: {}", reason);
    Ok(())
}

#[test]
fn audio_above_maximum_duration_is_rejected() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("long.wav");
    // Keep the fixture small: 8 kHz for 31 seconds
    write_wav(&path, 31.0, 8000)?;

    let reason = expect_validation_error(validate_wav(&path, &AudioLimits::default()));
    assert!(reason.contains("too long"), "reason: {}", reason);
    Ok(())
}

#[test]
fn sample_rate_below_8khz_is_rejected() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("lofi.wav");
    write_wav(&path, 2.0, 4000)?;

    let reason = expect_validation_error(validate_wav(&path, &AudioLimits::default()));
    assert!(reason.contains("Sample rate too low"), "reason: {}", reason);
    Ok(())
}

#[test]
fn limits_are_configurable() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("short.wav");
    write_wav(&path, 0.2, 16000)?;

    let relaxed = AudioLimits {
        min_duration_secs: 0.1,
        max_duration_secs: 30.0,
        min_sample_rate: 8000,
    };
    assert!(validate_wav(&path, &relaxed).is_ok());
    Ok(())
}
