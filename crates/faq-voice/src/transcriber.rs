//! Remote speech recognition over HTTP (multipart WAV upload).

use crate::wav::prepare_clip;
use faq_core::{AudioClip, SpeechInput, VoiceLimits, VoiceUnavailable};
use reqwest::multipart;
use serde::Deserialize;

const BACKEND_NAME: &str = "http";

/// Accepts either `{ "text": ... }` or `{ "data": { "text": ... } }`, with an optional `error`.
#[derive(Debug, Deserialize)]
struct RecognitionResponse {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    data: Option<RecognitionData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecognitionData {
    text: String,
}

/// Sends clips to a speech-recognition service and returns the transcript.
pub struct HttpTranscriber {
    url: String,
    client: reqwest::Client,
}

impl HttpTranscriber {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn recognize(&self, wav_bytes: Vec<u8>) -> Result<String, VoiceUnavailable> {
        let file_part = multipart::Part::bytes(wav_bytes)
            .file_name("utterance.wav")
            .mime_str("audio/wav")
            .map_err(|e| VoiceUnavailable::new(format!("building upload failed: {}", e)))?;
        let form = multipart::Form::new().part("file", file_part);

        let resp = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| VoiceUnavailable::new(format!("recognition request failed: {}", e)))?;

        if !resp.status().is_success() {
            return Err(VoiceUnavailable::new(format!(
                "recognition service returned {}",
                resp.status()
            )));
        }

        let body: RecognitionResponse = resp
            .json()
            .await
            .map_err(|e| VoiceUnavailable::new(format!("unreadable recognition response: {}", e)))?;

        if let Some(err) = body.error {
            return Err(VoiceUnavailable::new(format!("recognition error: {}", err)));
        }

        body.text
            .or(body.data.map(|d| d.text))
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| VoiceUnavailable::new("speech not recognized"))
    }
}

#[async_trait::async_trait]
impl SpeechInput for HttpTranscriber {
    fn name(&self) -> &str {
        BACKEND_NAME
    }

    async fn transcribe(&self, clip: AudioClip, limits: &VoiceLimits) -> Result<String, VoiceUnavailable> {
        let clip = prepare_clip(clip, limits.phrase_time_limit)?;
        let text = self.recognize(clip.bytes).await?;
        tracing::debug!(target: "faq::voice", chars = text.len(), "Transcription received");
        Ok(text)
    }
}
