use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

use crate::chat::{ChatEngine, ChatError, ChatTurn};

#[derive(Clone)]
struct SharedState {
    engine: Arc<ChatEngine>,
}

pub fn start_daemon(engine: ChatEngine, bind_addr: &str) {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(async { start_app(engine, bind_addr).await });
}

async fn start_app(engine: ChatEngine, bind_addr: &str) {
    let app = router(Arc::new(engine));

    let listener = tokio::net::TcpListener::bind(bind_addr).await.unwrap();
    log::info!("listening on {bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

pub(crate) fn router(engine: Arc<ChatEngine>) -> Router {
    let shared_state = Arc::new(SharedState { engine });

    Router::new()
        .route("/", get(root))
        .route("/chat", post(chat))
        .route("/health", get(health))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
        .with_state(shared_state)
}

// Wraps core errors so axum can render them. Internal detail is logged; the
// client only ever sees a generic error body.
#[derive(Debug)]
struct HttpError(ChatError);

impl IntoResponse for HttpError {
    fn into_response(self) -> axum::response::Response {
        log::error!("{self:?}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Error processing your request"})),
        )
            .into_response()
    }
}

impl From<ChatError> for HttpError {
    fn from(err: ChatError) -> Self {
        Self(err)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatRequest {
    pub message: String,

    /// Accepted for API compatibility; matching never reads it.
    #[serde(default)]
    pub chat_history: Vec<ChatTurn>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ResponseMetadata {
    pub model: String,
}

async fn chat(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, HttpError> {
    log::debug!("payload: {payload:?}");

    let engine = state.engine.clone();

    // Embedding is CPU-bound; keep it off the async workers.
    tokio::task::block_in_place(move || {
        let response = engine
            .generate_response(&payload.message, &payload.chat_history)
            .map_err(|err| {
                log::error!("failed to answer message {:?}: {err}", payload.message);
                HttpError::from(err)
            })?;

        Ok(Json(ChatResponse {
            response,
            metadata: ResponseMetadata {
                model: engine.model_name().to_string(),
            },
        }))
    })
}

async fn health(State(state): State<Arc<SharedState>>) -> impl IntoResponse {
    if state.engine.is_ready() {
        (StatusCode::OK, Json(json!({"status": "healthy"})))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"status": "unavailable"})),
        )
    }
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({"message": "Fashion chatbot service is running"}))
}
