//! Responder: turns an inquiry (typed text, quick action, or voice clip) into a reply.
//!
//! All external failures are contained here. Voice capture that fails or times out
//! becomes an empty query plus a warning; speech playback that fails becomes a
//! warning and `spoken = false`. Nothing in this module returns an error.

mod quick_actions;

pub use quick_actions::{QuickAction, QuickActions};

use crate::matcher::FaqMatcher;
use crate::voice::{AudioClip, NoSpeechInput, NoSpeechOutput, SpeechInput, SpeechOutput, VoiceLimits, VoiceUnavailable};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const VOICE_INPUT_WARNING: &str = "🎤 Voice input not available in this environment.";
pub const SPEECH_OUTPUT_WARNING: &str = "🔊 Speech output not supported in this environment.";

/// Where the query text comes from.
#[derive(Debug, Clone)]
pub enum Inquiry {
    Typed(String),
    /// Quick-action id (e.g. "fees").
    QuickAction(String),
    Voice(AudioClip),
}

/// Query text after input resolution, plus any soft warnings raised on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolved {
    pub query: String,
    pub warnings: Vec<String>,
}

/// What the UI renders for one inquiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub query: String,
    /// `None` when there was nothing to answer (empty input).
    pub response: Option<String>,
    pub matched: bool,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub spoken: bool,
}

pub struct Responder {
    matcher: Arc<FaqMatcher>,
    quick_actions: QuickActions,
    speech_input: Arc<dyn SpeechInput>,
    speech_output: Arc<dyn SpeechOutput>,
    limits: VoiceLimits,
}

impl Responder {
    /// Responder with the default quick actions and no voice backends.
    pub fn new(matcher: Arc<FaqMatcher>) -> Self {
        Self {
            matcher,
            quick_actions: QuickActions::defaults(),
            speech_input: Arc::new(NoSpeechInput),
            speech_output: Arc::new(NoSpeechOutput),
            limits: VoiceLimits::default(),
        }
    }

    pub fn with_quick_actions(mut self, quick_actions: QuickActions) -> Self {
        self.quick_actions = quick_actions;
        self
    }

    pub fn with_speech_input(mut self, input: Arc<dyn SpeechInput>) -> Self {
        self.speech_input = input;
        self
    }

    pub fn with_speech_output(mut self, output: Arc<dyn SpeechOutput>) -> Self {
        self.speech_output = output;
        self
    }

    pub fn with_limits(mut self, limits: VoiceLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn matcher(&self) -> &FaqMatcher {
        &self.matcher
    }

    pub fn quick_actions(&self) -> &QuickActions {
        &self.quick_actions
    }

    pub fn speech_input_name(&self) -> &str {
        self.speech_input.name()
    }

    pub fn speech_output_name(&self) -> &str {
        self.speech_output.name()
    }

    /// Resolves an inquiry to plain query text.
    pub async fn resolve(&self, inquiry: Inquiry) -> Resolved {
        match inquiry {
            Inquiry::Typed(text) => Resolved {
                query: text.trim().to_string(),
                warnings: Vec::new(),
            },
            Inquiry::QuickAction(id) => match self.quick_actions.find(&id) {
                Some(action) => Resolved {
                    query: action.query.clone(),
                    warnings: Vec::new(),
                },
                None => {
                    tracing::warn!(target: "faq::responder", quick_action = %id, "Unknown quick action");
                    Resolved {
                        query: String::new(),
                        warnings: vec![format!("Unknown quick action: {}", id)],
                    }
                }
            },
            Inquiry::Voice(clip) => match self.listen(clip).await {
                Ok(query) => Resolved {
                    query,
                    warnings: Vec::new(),
                },
                Err(e) => {
                    tracing::warn!(
                        target: "faq::voice",
                        backend = self.speech_input.name(),
                        reason = %e.reason,
                        "Voice input degraded to empty query"
                    );
                    Resolved {
                        query: String::new(),
                        warnings: vec![VOICE_INPUT_WARNING.to_string()],
                    }
                }
            },
        }
    }

    /// Resolves the inquiry, matches it and optionally speaks the answer.
    pub async fn dispatch(&self, inquiry: Inquiry, speak: bool) -> Reply {
        let Resolved { query, mut warnings } = self.resolve(inquiry).await;
        if query.is_empty() {
            return Reply {
                query,
                response: None,
                matched: false,
                score: 0.0,
                question: None,
                warnings,
                spoken: false,
            };
        }

        let outcome = self.matcher.answer(&query);
        tracing::info!(
            target: "faq::responder",
            matched = outcome.is_match(),
            score = outcome.score(),
            "Answered query ({} chars)",
            query.len()
        );
        let response = outcome.response().to_string();
        let mut reply = Reply {
            query: query.clone(),
            response: None,
            matched: outcome.is_match(),
            score: outcome.score(),
            question: outcome.question().map(str::to_string),
            warnings: Vec::new(),
            spoken: false,
        };

        if speak {
            match self.say(&response).await {
                Ok(()) => reply.spoken = true,
                Err(e) => {
                    tracing::warn!(
                        target: "faq::voice",
                        backend = self.speech_output.name(),
                        reason = %e.reason,
                        "Speech output skipped"
                    );
                    warnings.push(SPEECH_OUTPUT_WARNING.to_string());
                }
            }
        }

        reply.response = Some(response);
        reply.warnings = warnings;
        reply
    }

    /// Transcribes a clip, bounded by the listen timeout. A blank transcript counts as unrecognized speech.
    pub async fn listen(&self, clip: AudioClip) -> Result<String, VoiceUnavailable> {
        if clip.is_empty() {
            return Err(VoiceUnavailable::new("no audio captured"));
        }
        let text = match tokio::time::timeout(self.limits.listen_timeout, self.speech_input.transcribe(clip, &self.limits)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(VoiceUnavailable::new(format!(
                    "speech recognition timed out after {:?}",
                    self.limits.listen_timeout
                )))
            }
        };
        let text = text.trim();
        if text.is_empty() {
            return Err(VoiceUnavailable::new("speech not recognized"));
        }
        Ok(text.to_string())
    }

    /// Speaks `text`, bounded by the speak timeout.
    pub async fn say(&self, text: &str) -> Result<(), VoiceUnavailable> {
        match tokio::time::timeout(self.limits.speak_timeout, self.speech_output.speak(text)).await {
            Ok(result) => result,
            Err(_) => Err(VoiceUnavailable::new(format!(
                "speech output timed out after {:?}",
                self.limits.speak_timeout
            ))),
        }
    }
}
