//! faq-core: FAQ chatbot core library (knowledge base, TF-IDF matcher, quick actions, responder).
//!
//! The gateway and the voice crate build on this public API: the knowledge base is
//! loaded once, the matcher is fitted once, and everything afterwards is read-only.

mod knowledge;
mod matcher;
mod responder;
mod shared;
mod voice;

// Shared configuration
pub use shared::{
    CoreConfig, MatchSettings, SettingsError, VoiceSettings, DEFAULT_FALLBACK_RESPONSE, DEFAULT_MATCH_THRESHOLD,
};

// Knowledge base
pub use knowledge::{FaqEntry, KnowledgeBase, KnowledgeError, TOPIC_HIGHLIGHTS};

// Matcher
pub use matcher::{cosine_similarity, FaqMatcher, MatchOutcome, TfidfModel, Tokenizer};

// Responder
pub use responder::{
    Inquiry, QuickAction, QuickActions, Reply, Resolved, Responder, SPEECH_OUTPUT_WARNING, VOICE_INPUT_WARNING,
};

// Voice capabilities
pub use voice::{AudioClip, NoSpeechInput, NoSpeechOutput, SpeechInput, SpeechOutput, VoiceLimits, VoiceUnavailable};
