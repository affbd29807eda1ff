//! Chat handlers: typed prompts, quick-action buttons and voice uploads all end up
//! as one [`Inquiry`] dispatched through the shared [`faq_core::Responder`].
//!
//! Handlers never fail on unmatched or empty input; the reply carries a status of
//! `ok` (there is an answer, possibly the fallback) or `no_input`, plus any soft warnings.

use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use faq_core::{AudioClip, Inquiry, Reply};

/// Chat request from the web widget.
#[derive(Debug, serde::Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    /// Quick-action id; wins over `prompt` when both are sent (the button was pressed).
    #[serde(default)]
    pub quick_action: Option<String>,
    /// Read the answer out loud on the server's speech output.
    #[serde(default)]
    pub speak: bool,
}

impl ChatRequest {
    fn into_inquiry(self) -> Inquiry {
        match self.quick_action.filter(|id| !id.trim().is_empty()) {
            Some(id) => Inquiry::QuickAction(id),
            None => Inquiry::Typed(self.prompt.unwrap_or_default()),
        }
    }
}

/// Query params for POST /api/v1/voice
#[derive(Debug, Default, serde::Deserialize)]
pub struct VoiceQuery {
    #[serde(default)]
    pub speak: bool,
}

/// POST /api/v1/chat – answer a typed question or a quick action.
pub async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Json<serde_json::Value> {
    let request_id = uuid::Uuid::new_v4().to_string();
    let speak = req.speak;
    let inquiry = req.into_inquiry();
    tracing::info!(
        target: "faq::chat",
        request_id = %request_id,
        quick_action = matches!(inquiry, Inquiry::QuickAction(_)),
        speak,
        "Chat request received"
    );
    let reply = state.responder.dispatch(inquiry, speak).await;
    Json(reply_json(&request_id, &reply))
}

/// POST /api/v1/voice – body is a WAV clip; it is transcribed and then answered like typed text.
pub async fn voice(
    State(state): State<AppState>,
    Query(q): Query<VoiceQuery>,
    body: Bytes,
) -> Json<serde_json::Value> {
    let request_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(
        target: "faq::chat",
        request_id = %request_id,
        bytes = body.len(),
        "Voice request received"
    );
    let reply = state
        .responder
        .dispatch(Inquiry::Voice(AudioClip::new(body.to_vec())), q.speak)
        .await;
    Json(reply_json(&request_id, &reply))
}

/// JSON body shared by the chat and voice endpoints.
pub fn reply_json(request_id: &str, reply: &Reply) -> serde_json::Value {
    serde_json::json!({
        "status": if reply.response.is_some() { "ok" } else { "no_input" },
        "request_id": request_id,
        "query": reply.query,
        "response": reply.response,
        "matched": reply.matched,
        "score": reply.score,
        "question": reply.question,
        "warnings": reply.warnings,
        "spoken": reply.spoken,
    })
}
