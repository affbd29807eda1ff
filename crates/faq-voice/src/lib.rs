//! Concrete voice capabilities for the FAQ gateway.
//!
//! Both backends are optional. Whatever is not configured falls back to the
//! always-unavailable stubs from `faq-core`, so callers only ever see
//! [`faq_core::VoiceUnavailable`].

mod synthesizer;
mod transcriber;
mod wav;

pub use synthesizer::CommandSynthesizer;
pub use transcriber::HttpTranscriber;
pub use wav::{prepare_clip, truncate_wav, wav_duration};

use faq_core::{NoSpeechInput, NoSpeechOutput, SpeechInput, SpeechOutput, VoiceSettings};
use std::sync::Arc;

/// Speech input for the configured backend (HTTP recognizer or none).
pub fn build_speech_input(settings: &VoiceSettings) -> Arc<dyn SpeechInput> {
    match settings.transcriber_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => {
            tracing::info!(target: "faq::voice", url = %url, "Speech recognition enabled");
            Arc::new(HttpTranscriber::new(url))
        }
        _ => {
            tracing::debug!(target: "faq::voice", "No speech recognizer configured");
            Arc::new(NoSpeechInput)
        }
    }
}

/// Speech output for the configured backend (TTS program or none).
pub fn build_speech_output(settings: &VoiceSettings) -> Arc<dyn SpeechOutput> {
    match settings.synthesizer_program.as_deref().map(str::trim) {
        Some(program) if !program.is_empty() => {
            tracing::info!(target: "faq::voice", program = %program, "Speech output enabled");
            Arc::new(CommandSynthesizer::new(program, settings.synthesizer_args.clone()))
        }
        _ => {
            tracing::debug!(target: "faq::voice", "No speech synthesizer configured");
            Arc::new(NoSpeechOutput)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_backends_fall_back_to_stubs() {
        let settings = VoiceSettings::default();
        assert_eq!(build_speech_input(&settings).name(), "none");
        assert_eq!(build_speech_output(&settings).name(), "none");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let settings = VoiceSettings {
            transcriber_url: Some("  ".into()),
            synthesizer_program: Some(String::new()),
            ..VoiceSettings::default()
        };
        assert_eq!(build_speech_input(&settings).name(), "none");
        assert_eq!(build_speech_output(&settings).name(), "none");
    }

    #[test]
    fn configured_backends_are_selected() {
        let settings = VoiceSettings {
            transcriber_url: Some("http://127.0.0.1:9/recognize".into()),
            synthesizer_program: Some("espeak".into()),
            ..VoiceSettings::default()
        };
        assert_eq!(build_speech_input(&settings).name(), "http");
        assert_eq!(build_speech_output(&settings).name(), "espeak");
    }
}
