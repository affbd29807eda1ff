//! Local speech synthesis by running a text-to-speech program.

use faq_core::{SpeechOutput, VoiceUnavailable};
use std::process::Stdio;

/// Runs `program [args..] <text>` and waits for it to finish.
pub struct CommandSynthesizer {
    program: String,
    args: Vec<String>,
}

impl CommandSynthesizer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait::async_trait]
impl SpeechOutput for CommandSynthesizer {
    fn name(&self) -> &str {
        &self.program
    }

    async fn speak(&self, text: &str) -> Result<(), VoiceUnavailable> {
        // kill_on_drop: a timed-out caller drops this future and the child goes with it.
        let status = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| VoiceUnavailable::new(format!("failed to start {}: {}", self.program, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(VoiceUnavailable::new(format!("{} exited with {}", self.program, status)))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn successful_program_speaks() {
        let synth = CommandSynthesizer::new("true", Vec::new());
        assert!(synth.speak("hello").await.is_ok());
    }

    #[tokio::test]
    async fn failing_program_is_unavailable() {
        let synth = CommandSynthesizer::new("false", Vec::new());
        let err = synth.speak("hello").await.unwrap_err();
        assert!(err.reason.contains("exited"), "{}", err);
    }

    #[tokio::test]
    async fn missing_program_is_unavailable() {
        let synth = CommandSynthesizer::new("faq-voice-no-such-tts-binary", vec!["-v".into()]);
        let err = synth.speak("hello").await.unwrap_err();
        assert!(err.reason.contains("failed to start"), "{}", err);
    }

    #[tokio::test]
    async fn text_is_passed_as_last_argument() {
        let synth = CommandSynthesizer::new("sh", vec!["-c".into(), "test \"$0\" = 'fee structure'".into()]);
        assert!(synth.speak("fee structure").await.is_ok());
        assert!(synth.speak("something else").await.is_err());
    }
}
