//! WAV clip inspection and phrase-length trimming.

use faq_core::{AudioClip, VoiceUnavailable};
use std::io::Cursor;
use std::time::Duration;

/// Playback length of a WAV buffer.
pub fn wav_duration(bytes: &[u8]) -> Result<Duration, hound::Error> {
    let reader = hound::WavReader::new(Cursor::new(bytes))?;
    let rate = reader.spec().sample_rate;
    if rate == 0 {
        return Ok(Duration::ZERO);
    }
    Ok(Duration::from_secs_f64(reader.duration() as f64 / rate as f64))
}

/// Returns the WAV cut to at most `limit` of audio. Clips already within the limit are returned as-is.
pub fn truncate_wav(bytes: &[u8], limit: Duration) -> Result<Vec<u8>, hound::Error> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();
    let max_frames = (limit.as_secs_f64() * spec.sample_rate as f64).floor() as u64;
    if u64::from(reader.duration()) <= max_frames {
        return Ok(bytes.to_vec());
    }
    let max_samples = (max_frames * u64::from(spec.channels)) as usize;

    let mut out = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut out, spec)?;
        match spec.sample_format {
            hound::SampleFormat::Int => {
                for sample in reader.samples::<i32>().take(max_samples) {
                    writer.write_sample(sample?)?;
                }
            }
            hound::SampleFormat::Float => {
                for sample in reader.samples::<f32>().take(max_samples) {
                    writer.write_sample(sample?)?;
                }
            }
        }
        writer.finalize()?;
    }
    Ok(out.into_inner())
}

/// Validates an uploaded clip and trims it to the phrase time limit.
pub fn prepare_clip(clip: AudioClip, phrase_time_limit: Duration) -> Result<AudioClip, VoiceUnavailable> {
    if clip.is_empty() {
        return Err(VoiceUnavailable::new("no audio captured"));
    }
    let bytes = truncate_wav(&clip.bytes, phrase_time_limit)
        .map_err(|e| VoiceUnavailable::new(format!("unreadable WAV audio: {}", e)))?;
    if bytes.len() != clip.bytes.len() {
        tracing::debug!(
            target: "faq::voice",
            limit_secs = phrase_time_limit.as_secs_f64(),
            "Clip trimmed to phrase time limit"
        );
    }
    Ok(AudioClip::new(bytes))
}
