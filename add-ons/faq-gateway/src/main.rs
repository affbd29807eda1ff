//! Axum-based FAQ gateway: backend for the enquiry chat widget. Config-driven via CoreConfig.

mod handlers;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::Method,
    response::sse::{Event, Sse},
    routing::{get, post},
    Router,
};
use faq_core::{CoreConfig, FaqMatcher, KnowledgeBase, KnowledgeError, Responder, TOPIC_HIGHLIGHTS};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::field::Visit;
use tracing_subscriber::layer::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Largest accepted voice upload (a 10 s stereo 48 kHz WAV is under 4 MiB).
const MAX_VOICE_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Renders a tracing event as `LEVEL [target] message key=value ...` for the log stream.
#[derive(Default)]
struct LogLine {
    message: String,
    fields: Vec<String>,
}

impl LogLine {
    fn render(event: &tracing::Event<'_>) -> String {
        let mut line = LogLine::default();
        event.record(&mut line);
        let meta = event.metadata();
        let mut out = format!("{} [{}] {}", meta.level(), meta.target(), line.message);
        for field in &line.fields {
            out.push(' ');
            out.push_str(field);
        }
        out
    }
}

impl Visit for LogLine {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}

/// Forwards every tracing event to the `/api/v1/logs` subscribers.
#[derive(Clone)]
struct LogBroadcastLayer {
    tx: broadcast::Sender<String>,
}

impl LogBroadcastLayer {
    fn new(tx: broadcast::Sender<String>) -> Self {
        Self { tx }
    }
}

impl<S> tracing_subscriber::Layer<S> for LogBroadcastLayer
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        // No open log streams is the normal case.
        let _ = self.tx.send(LogLine::render(event));
    }
}

/// Knowledge base from `knowledge_path`, or the built-in table when unset.
fn load_knowledge(config: &CoreConfig) -> Result<KnowledgeBase, KnowledgeError> {
    match config.knowledge_path.as_deref().filter(|p| !p.trim().is_empty()) {
        Some(path) => KnowledgeBase::load_json_path(path),
        None => Ok(KnowledgeBase::builtin()),
    }
}

/// Loads the knowledge base and fits the matcher once.
fn build_matcher(config: &CoreConfig) -> Result<FaqMatcher, String> {
    let knowledge = load_knowledge(config).map_err(|e| format!("Knowledge base load failed: {}", e))?;
    FaqMatcher::new(knowledge, config.matching.clone()).map_err(|e| format!("Matcher setup failed: {}", e))
}

fn build_responder(config: &CoreConfig, matcher: FaqMatcher) -> Responder {
    Responder::new(Arc::new(matcher))
        .with_speech_input(faq_voice::build_speech_input(&config.voice))
        .with_speech_output(faq_voice::build_speech_output(&config.voice))
        .with_limits(config.voice.limits())
}

/// Pre-flight check: config loads, knowledge base fits, port is available.
fn run_verify() -> Result<(), String> {
    let config = CoreConfig::load().map_err(|e| format!("Config load failed: {}", e))?;

    print!("Checking knowledge base... ");
    let matcher = build_matcher(&config)?;
    if matcher.knowledge().is_empty() {
        println!("EMPTY (every query will get the fallback response)");
    } else {
        println!(
            "OK ({} entries, {} terms)",
            matcher.knowledge().len(),
            matcher.model().vocabulary_len()
        );
    }

    let port = config.port;
    print!("Checking port {}... ", port);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    match std::net::TcpListener::bind(addr) {
        Ok(listener) => {
            drop(listener);
            println!("OK (available)");
        }
        Err(e) => {
            return Err(format!("Port {} BLOCKED: {}", port, e));
        }
    }

    println!("\n✅ SUCCESS: All systems GO. Ready to start gateway.");
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env::var calls)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[faq-gateway] .env not loaded: {} (using system environment)", e);
    }

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--verify") {
        match run_verify() {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("❌ PRE-FLIGHT FAILED: {}", e);
                std::process::exit(1);
            }
        }
    }

    let (log_tx, _) = broadcast::channel(1000);
    let log_layer = LogBroadcastLayer::new(log_tx.clone());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(log_layer)
        .init();

    let config = match CoreConfig::load() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            tracing::error!("Config load failed: {}", e);
            std::process::exit(1);
        }
    };

    let matcher = match build_matcher(&config) {
        Ok(m) => m,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };
    let responder = Arc::new(build_responder(&config, matcher));

    let app = build_app(AppState {
        config: Arc::clone(&config),
        responder,
        log_tx,
    });

    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("{} listening on {}", config.app_name, addr);
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

fn build_app(state: AppState) -> Router {
    // CORS: allow Backend/API (8001-8099) and Frontend/UI (3001-3099) port ranges.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin: &axum::http::HeaderValue, _| {
            let s = origin.to_str().unwrap_or("");
            let port = s
                .split(':')
                .last()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(0);
            (3001..=3099).contains(&port) || (8001..=8099).contains(&port)
        }))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any)
        .expose_headers(tower_http::cors::Any);

    Router::new()
        .route("/v1/status", get(status))
        .route("/api/v1/health", get(health))
        .route("/api/v1/logs", get(logs_stream))
        .route("/api/v1/topics", get(topics))
        .route("/api/v1/quick-actions", get(quick_actions))
        .route("/api/v1/chat", post(handlers::chat::chat))
        .route(
            "/api/v1/voice",
            post(handlers::chat::voice).layer(DefaultBodyLimit::max(MAX_VOICE_UPLOAD_BYTES)),
        )
        .with_state(state)
        .layer(cors)
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<CoreConfig>,
    pub(crate) responder: Arc<Responder>,
    pub(crate) log_tx: broadcast::Sender<String>,
}

/// GET /api/v1/health – liveness check for UI and scripts.
async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

/// GET /v1/status – app identity, knowledge base size and matcher settings.
async fn status(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    let matcher = state.responder.matcher();
    axum::Json(serde_json::json!({
        "app_name": state.config.app_name,
        "port": state.config.port,
        "entries": matcher.knowledge().len(),
        "vocabulary": matcher.model().vocabulary_len(),
        "threshold": matcher.threshold(),
        "speech_input": state.responder.speech_input_name(),
        "speech_output": state.responder.speech_output_name(),
    }))
}

/// GET /api/v1/topics – questions the bot knows about, for the sidebar.
async fn topics(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "topics": state.responder.matcher().knowledge().topics(),
        "highlights": TOPIC_HIGHLIGHTS,
    }))
}

/// GET /api/v1/quick-actions – preset buttons in display order.
async fn quick_actions(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "quick_actions": state.responder.quick_actions().all(),
    }))
}

/// GET /api/v1/logs – Server-Sent Events stream of gateway logs (tracing output).
async fn logs_stream(
    State(state): State<AppState>,
) -> Sse<impl futures_util::Stream<Item = Result<Event, std::convert::Infallible>> + Send + 'static> {
    use async_stream::stream;
    let mut rx = state.log_tx.subscribe();
    let stream = stream! {
        loop {
            match rx.recv().await {
                Ok(line) => yield Ok(Event::default().data(line)),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    yield Ok(Event::default().data(format!("... {} log lines dropped", n)));
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    };
    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keepalive"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use faq_core::{MatchSettings, DEFAULT_FALLBACK_RESPONSE, SPEECH_OUTPUT_WARNING, VOICE_INPUT_WARNING};
    use tower::ServiceExt;

    fn test_log_tx() -> broadcast::Sender<String> {
        let (tx, _) = broadcast::channel(1);
        tx
    }

    fn test_config() -> CoreConfig {
        CoreConfig {
            app_name: "Test Enquiry Desk".to_string(),
            port: 8001,
            knowledge_path: None,
            matching: MatchSettings::default(),
            voice: Default::default(),
        }
    }

    fn test_app() -> Router {
        test_app_with_logs(test_log_tx())
    }

    fn test_app_with_logs(log_tx: broadcast::Sender<String>) -> Router {
        let config = test_config();
        let matcher = build_matcher(&config).unwrap();
        let responder = Arc::new(build_responder(&config, matcher));
        build_app(AppState {
            config: Arc::new(config),
            responder,
            log_tx,
        })
    }

    async fn get_json(app: Router, uri: &str) -> serde_json::Value {
        let req = Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn post_chat(app: Router, body: serde_json::Value) -> serde_json::Value {
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/chat")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let json = get_json(test_app(), "/api/v1/health").await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_status_reports_knowledge_and_matcher() {
        let json = get_json(test_app(), "/v1/status").await;
        assert_eq!(json["app_name"], "Test Enquiry Desk");
        assert_eq!(json["port"], 8001);
        assert_eq!(json["entries"], 20);
        assert_eq!(json["threshold"], 0.2);
        assert!(json["vocabulary"].as_u64().unwrap() > 20);
        assert_eq!(json["speech_input"], "none");
        assert_eq!(json["speech_output"], "none");
    }

    #[tokio::test]
    async fn test_topics_list_every_question() {
        let json = get_json(test_app(), "/api/v1/topics").await;
        let topics = json["topics"].as_array().unwrap();
        assert_eq!(topics.len(), 20);
        assert_eq!(topics[2], "What is the fee structure");
        assert_eq!(json["highlights"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_quick_actions_in_button_order() {
        let json = get_json(test_app(), "/api/v1/quick-actions").await;
        let actions = json["quick_actions"].as_array().unwrap();
        assert_eq!(actions.len(), 6);
        assert_eq!(actions[1]["id"], "fees");
        assert_eq!(actions[1]["label"], "💰 Fees");
        assert_eq!(actions[1]["query"], "fee structure");
    }

    #[tokio::test]
    async fn test_chat_exact_question() {
        let json = post_chat(test_app(), serde_json::json!({ "prompt": "what is the fee structure" })).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["matched"], true);
        assert_eq!(json["question"], "what is the fee structure");
        assert!(json["response"].as_str().unwrap().starts_with("The fee varies"));
        assert!(json["request_id"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_chat_partial_overlap() {
        let json = post_chat(test_app(), serde_json::json!({ "prompt": "tell me about hostel life" })).await;
        assert_eq!(json["question"], "what are the hostel facilities");
        assert!(json["response"].as_str().unwrap().starts_with("Hostels are available"));
    }

    #[tokio::test]
    async fn test_chat_gibberish_gets_fallback() {
        let json = post_chat(test_app(), serde_json::json!({ "prompt": "asdkjasdkj random gibberish" })).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["matched"], false);
        assert_eq!(json["response"], DEFAULT_FALLBACK_RESPONSE);
        assert!(json["question"].is_null());
    }

    #[tokio::test]
    async fn test_chat_empty_prompt_is_no_input() {
        let json = post_chat(test_app(), serde_json::json!({ "prompt": "" })).await;
        assert_eq!(json["status"], "no_input");
        assert!(json["response"].is_null());
    }

    #[tokio::test]
    async fn test_quick_action_same_as_typing() {
        let app = test_app();
        let button = post_chat(app.clone(), serde_json::json!({ "quick_action": "fees", "prompt": "ignored" })).await;
        let typed = post_chat(app, serde_json::json!({ "prompt": "fee structure" })).await;
        assert_eq!(button["query"], "fee structure");
        assert_eq!(button["response"], typed["response"]);
        assert_eq!(button["score"], typed["score"]);
    }

    #[tokio::test]
    async fn test_speak_without_synthesizer_warns() {
        let json = post_chat(test_app(), serde_json::json!({ "prompt": "fee structure", "speak": true })).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["spoken"], false);
        assert_eq!(json["warnings"][0], SPEECH_OUTPUT_WARNING);
    }

    #[tokio::test]
    async fn test_voice_without_recognizer_degrades() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/voice")
            .header("content-type", "audio/wav")
            .body(Body::from(vec![0u8; 64]))
            .unwrap();
        let res = test_app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "no_input");
        assert_eq!(json["warnings"][0], VOICE_INPUT_WARNING);
    }

    #[test]
    fn test_missing_knowledge_file_fails_setup() {
        let config = CoreConfig {
            knowledge_path: Some("/definitely/not/here.json".to_string()),
            ..test_config()
        };
        let err = build_matcher(&config).unwrap_err();
        assert!(err.contains("Knowledge base load failed"), "{}", err);
    }

    #[test]
    fn test_log_layer_renders_level_target_message_and_fields() {
        let (tx, mut rx) = broadcast::channel(8);
        let subscriber = tracing_subscriber::registry().with(LogBroadcastLayer::new(tx));
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: "faq::voice", backend = "http", "Voice input degraded");
        });
        assert_eq!(rx.try_recv().unwrap(), "WARN [faq::voice] Voice input degraded backend=http");
    }

    #[tokio::test]
    async fn test_logs_stream_forwards_broadcast_lines() {
        use futures_util::StreamExt;

        let (log_tx, _) = broadcast::channel(16);
        let app = test_app_with_logs(log_tx.clone());
        let req = Request::builder().method("GET").uri("/api/v1/logs").body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let content_type = res.headers()["content-type"].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/event-stream"), "{}", content_type);

        log_tx.send("INFO [faq::chat] Chat request received".to_string()).unwrap();
        let mut body = res.into_body().into_data_stream();
        let frame = tokio::time::timeout(Duration::from_secs(5), body.next())
            .await
            .expect("no log event within 5s")
            .unwrap()
            .unwrap();
        let text = String::from_utf8(frame.to_vec()).unwrap();
        assert_eq!(text, "data: INFO [faq::chat] Chat request received\n\n");
    }
}
