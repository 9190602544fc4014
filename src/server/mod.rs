//! WebSocket transcription server.
//!
//! One duplex endpoint per client: binary frames in (raw f32 chunks), JSON
//! text frames out (transcript + latency). Each connection gets its own
//! session — a private [`WindowBuffer`] plus an ingest/produce task pair —
//! while the engine handle is shared read-only across all sessions.

use crate::config::Config;
use crate::error::{Result, StreamscribeError};
use crate::protocol;
use crate::streaming::{run_linked, FirstDone, InferenceScheduler, WindowBuffer};
use crate::stt::{Mode, Transcriber};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Shared state handed to every connection.
#[derive(Clone)]
pub struct AppState {
    /// Transcription engine, shared read-only across sessions.
    engine: Arc<dyn Transcriber>,
    /// Rolling window capacity in samples.
    window_samples: usize,
    /// Inference tick period.
    tick_period: Duration,
}

impl AppState {
    pub fn new(engine: Arc<dyn Transcriber>, config: &Config) -> Self {
        Self {
            engine,
            window_samples: config.stream.window_samples(config.audio.sample_rate),
            tick_period: config.stream.tick_period(),
        }
    }

    pub fn engine(&self) -> &Arc<dyn Transcriber> {
        &self.engine
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws_default))
        .route("/ws/:mode", get(ws_mode))
        .with_state(state)
        .route(
            "/health",
            get(|| async { Json(serde_json::json!({"status": "ok"})) }),
        )
}

/// Bind and serve until the process is stopped.
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        StreamscribeError::Connection {
            message: format!("failed to bind {}: {}", addr, e),
        }
    })?;
    let local_addr = listener.local_addr()?;

    info!(
        address = %local_addr,
        model = state.engine.model_name(),
        "listening for streaming clients"
    );

    axum::serve(listener, router(state).into_make_service()).await?;
    Ok(())
}

/// `/ws` — unparameterized connections default to optimized mode.
async fn ws_default(State(state): State<AppState>, upgrade: WebSocketUpgrade) -> impl IntoResponse {
    upgrade.on_upgrade(move |socket| handle_socket(state, socket, Mode::default()))
}

/// `/ws/{mode}` — explicit mode selection.
async fn ws_mode(
    Path(mode): Path<String>,
    State(state): State<AppState>,
    upgrade: WebSocketUpgrade,
) -> impl IntoResponse {
    let mode = Mode::from_token(&mode);
    upgrade.on_upgrade(move |socket| handle_socket(state, socket, mode))
}

/// Run one session to completion.
///
/// Spawns the ingest and produce loops and links their lifetimes: whichever
/// ends first — client disconnect, malformed input, engine fault — takes the
/// session down. Session state is dropped here; nothing is persisted.
async fn handle_socket(state: AppState, socket: WebSocket, mode: Mode) {
    info!(%mode, "client connected");

    let (sink, stream) = socket.split();
    let buffer = Arc::new(Mutex::new(WindowBuffer::new(state.window_samples)));
    let scheduler = InferenceScheduler::new(
        Arc::clone(&state.engine),
        Arc::clone(&buffer),
        mode,
        state.tick_period,
    );

    let ingest = tokio::spawn(ingest_loop(stream, buffer));
    let produce = tokio::spawn(produce_loop(sink, scheduler));

    let first = run_linked(ingest, produce).await;
    let side = match first {
        FirstDone::Left => "ingest",
        FirstDone::Right => "produce",
    };
    info!(%mode, ended_by = side, "session closed");
}

/// Feed inbound binary frames into the session's window buffer.
///
/// Chunk boundaries are message boundaries; frames arrive and are pushed in
/// strict order. A malformed payload or an inbound text frame (clients only
/// ever send binary audio) is fatal to the session, a close frame or
/// transport error is a normal end.
async fn ingest_loop(mut stream: SplitStream<WebSocket>, buffer: Arc<Mutex<WindowBuffer>>) {
    while let Some(Ok(message)) = stream.next().await {
        match message {
            Message::Binary(data) => match protocol::decode_chunk(&data) {
                Ok(chunk) => buffer.lock().await.push(&chunk),
                Err(e) => {
                    warn!(error = %e, "ending session on malformed chunk");
                    return;
                }
            },
            Message::Close(_) => return,
            Message::Text(text) => {
                warn!(payload = %text, "ending session on unexpected text frame");
                return;
            }
            Message::Ping(_) | Message::Pong(_) => {}
        }
    }
}

/// Emit one transcription result per scheduler tick.
///
/// A send failure means the transport closed — a terminal condition, not an
/// error. An engine fault ends the session (other sessions are unaffected;
/// they hold their own loops over the same shared engine).
async fn produce_loop(mut sink: SplitSink<WebSocket, Message>, scheduler: InferenceScheduler) {
    loop {
        let update = match scheduler.tick().await {
            Ok(update) => update,
            Err(e) => {
                error!(error = %e, "inference tick failed, ending session");
                return;
            }
        };

        let payload = match update.to_json() {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "failed to serialize result");
                continue;
            }
        };

        if sink.send(Message::Text(payload)).await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stt::MockTranscriber;

    fn test_state() -> AppState {
        AppState::new(
            Arc::new(MockTranscriber::new("test-model")),
            &Config::default(),
        )
    }

    #[test]
    fn test_app_state_derives_window_from_config() {
        let state = test_state();
        assert_eq!(state.window_samples, 480_000);
        assert_eq!(state.tick_period, Duration::from_millis(500));
        assert_eq!(state.engine().model_name(), "test-model");
    }

    #[test]
    fn test_router_builds() {
        let _router = router(test_state());
    }

    #[test]
    fn test_state_is_cheap_to_clone_and_shares_engine() {
        let state = test_state();
        let clone = state.clone();
        assert!(Arc::ptr_eq(state.engine(), clone.engine()));
    }
}
