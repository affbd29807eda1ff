//! Configuration shared by the gateway and the voice crate.

use crate::voice::VoiceLimits;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Similarity a best match must strictly exceed to be returned.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.2;

/// Reply used when no knowledge-base entry is a confident match.
pub const DEFAULT_FALLBACK_RESPONSE: &str =
    "❌ Sorry, I don’t know the answer. Please contact the university office.";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("config load failed: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunables for the matcher. These are the only knobs that change which answer comes back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchSettings {
    /// Best similarity must be strictly greater than this to count as a match.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_fallback")]
    pub fallback_response: String,
    /// Tokens shorter than this (in chars) are dropped. 1 keeps every non-empty token.
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,
}

fn default_threshold() -> f64 {
    DEFAULT_MATCH_THRESHOLD
}

fn default_fallback() -> String {
    DEFAULT_FALLBACK_RESPONSE.to_string()
}

fn default_min_token_len() -> usize {
    1
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            fallback_response: default_fallback(),
            min_token_len: default_min_token_len(),
        }
    }
}

impl MatchSettings {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback_response = fallback.into();
        self
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(SettingsError::Invalid {
                field: "matching.threshold",
                reason: format!("{} is not within [0, 1]", self.threshold),
            });
        }
        if self.fallback_response.trim().is_empty() {
            return Err(SettingsError::Invalid {
                field: "matching.fallback_response",
                reason: "must not be empty".to_string(),
            });
        }
        if self.min_token_len == 0 {
            return Err(SettingsError::Invalid {
                field: "matching.min_token_len",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// External voice backends. Both are optional; an unset backend means the channel is unavailable.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VoiceSettings {
    /// Speech-recognition endpoint that accepts a multipart WAV upload.
    #[serde(default)]
    pub transcriber_url: Option<String>,
    /// Local text-to-speech program (e.g. `espeak`); the reply text is passed as last argument.
    #[serde(default)]
    pub synthesizer_program: Option<String>,
    #[serde(default)]
    pub synthesizer_args: Vec<String>,
    #[serde(default)]
    pub listen_timeout_secs: Option<u64>,
    #[serde(default)]
    pub phrase_time_limit_secs: Option<u64>,
    #[serde(default)]
    pub speak_timeout_secs: Option<u64>,
}

impl VoiceSettings {
    /// Rejects zero durations: a zero listen or speak timeout fails every request, a zero phrase limit uploads no audio.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let durations = [
            ("voice.listen_timeout_secs", self.listen_timeout_secs),
            ("voice.phrase_time_limit_secs", self.phrase_time_limit_secs),
            ("voice.speak_timeout_secs", self.speak_timeout_secs),
        ];
        for (field, secs) in durations {
            if secs == Some(0) {
                return Err(SettingsError::Invalid {
                    field,
                    reason: "must be at least 1 second".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Timeouts for the voice channels; unset fields fall back to [`VoiceLimits::default`].
    pub fn limits(&self) -> VoiceLimits {
        let defaults = VoiceLimits::default();
        VoiceLimits {
            listen_timeout: self
                .listen_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.listen_timeout),
            phrase_time_limit: self
                .phrase_time_limit_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.phrase_time_limit),
            speak_timeout: self
                .speak_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.speak_timeout),
        }
    }
}

/// Global application configuration (gateway identity + matcher + voice). Load from TOML or env.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Application identity shown in status responses.
    pub app_name: String,
    /// HTTP port for the gateway.
    pub port: u16,
    /// Optional JSON knowledge-base file. The built-in table is used when unset.
    #[serde(default)]
    pub knowledge_path: Option<String>,
    #[serde(default)]
    pub matching: MatchSettings,
    #[serde(default)]
    pub voice: VoiceSettings,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            app_name: "University Enquiry Chatbot".to_string(),
            port: 8001,
            knowledge_path: None,
            matching: MatchSettings::default(),
            voice: VoiceSettings::default(),
        }
    }
}

impl CoreConfig {
    /// Load config from file and environment. Precedence: env `FAQ__*` > `FAQ_CONFIG` file (default `config/gateway.toml`) > defaults.
    pub fn load() -> Result<Self, SettingsError> {
        let config_path = std::env::var("FAQ_CONFIG").unwrap_or_else(|_| "config/gateway".to_string());
        let builder = config::Config::builder()
            .set_default("app_name", "University Enquiry Chatbot")?
            .set_default("port", 8001_i64)?
            .set_default("matching.threshold", DEFAULT_MATCH_THRESHOLD)?
            .set_default("matching.fallback_response", DEFAULT_FALLBACK_RESPONSE)?
            .set_default("matching.min_token_len", 1_i64)?;

        let path = Path::new(&config_path);
        let toml_path = path.with_extension("toml");
        let builder = if path.is_file() {
            builder.add_source(config::File::from(path))
        } else if toml_path.is_file() {
            builder.add_source(config::File::from(toml_path.as_path()))
        } else {
            builder
        };

        let built = builder
            .add_source(config::Environment::with_prefix("FAQ").separator("__"))
            .build()?;

        let config: Self = built.try_deserialize()?;
        config.matching.validate()?;
        config.voice.validate()?;
        Ok(config)
    }
}
