//! Voice capability traits. Real backends live in `faq-voice`; this module only
//! defines the seam and the always-unavailable stubs.

use std::time::Duration;

/// The single failure mode of every voice capability.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("voice capability unavailable: {reason}")]
pub struct VoiceUnavailable {
    pub reason: String,
}

impl VoiceUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// Recorded utterance as uploaded by the client (WAV bytes).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
}

impl AudioClip {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self { bytes: bytes.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Timeouts applied around external voice calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceLimits {
    /// Upper bound for turning a clip into text.
    pub listen_timeout: Duration,
    /// Longest phrase forwarded to recognition; longer clips are cut.
    pub phrase_time_limit: Duration,
    /// Upper bound for speech playback.
    pub speak_timeout: Duration,
}

impl Default for VoiceLimits {
    fn default() -> Self {
        Self {
            listen_timeout: Duration::from_secs(5),
            phrase_time_limit: Duration::from_secs(10),
            speak_timeout: Duration::from_secs(30),
        }
    }
}

/// Speech-to-text capability.
#[async_trait::async_trait]
pub trait SpeechInput: Send + Sync {
    /// Backend name for status and logs.
    fn name(&self) -> &str;

    async fn transcribe(&self, clip: AudioClip, limits: &VoiceLimits) -> Result<String, VoiceUnavailable>;
}

/// Text-to-speech capability.
#[async_trait::async_trait]
pub trait SpeechOutput: Send + Sync {
    fn name(&self) -> &str;

    async fn speak(&self, text: &str) -> Result<(), VoiceUnavailable>;
}

/// Speech input that is never available.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSpeechInput;

#[async_trait::async_trait]
impl SpeechInput for NoSpeechInput {
    fn name(&self) -> &str {
        "none"
    }

    async fn transcribe(&self, _clip: AudioClip, _limits: &VoiceLimits) -> Result<String, VoiceUnavailable> {
        Err(VoiceUnavailable::new("no speech recognizer configured"))
    }
}

/// Speech output that is never available.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSpeechOutput;

#[async_trait::async_trait]
impl SpeechOutput for NoSpeechOutput {
    fn name(&self) -> &str {
        "none"
    }

    async fn speak(&self, _text: &str) -> Result<(), VoiceUnavailable> {
        Err(VoiceUnavailable::new("no speech synthesizer configured"))
    }
}
