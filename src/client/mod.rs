//! Microphone streaming client.
//!
//! Captures fixed-size blocks from the input device, forwards each one as a
//! binary WebSocket message, and renders every result the server sends as a
//! single continuously-overwritten status line. The send and receive loops
//! are linked: when either ends (server close, transport error), the session
//! is over and the client exits cleanly.

use crate::audio::MicrophoneCapture;
use crate::config::Config;
use crate::defaults;
use crate::error::{Result, StreamscribeError};
use crate::protocol::{self, TranscriptUpdate};
use crate::streaming::{run_linked, FirstDone};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::io::Write;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Fixed display width so shorter lines fully overwrite longer ones.
const STATUS_WIDTH: usize = 150;

/// Connect, stream the microphone, and display results until the session
/// ends or Ctrl-C is pressed.
///
/// The chunk queue between the capture callback and the send loop is
/// unbounded: nothing is ever dropped, but a stalled connection grows
/// memory without limit.
pub async fn run(url: &str, config: &Config) -> Result<()> {
    eprintln!("Connecting to {}...", url);
    let (ws, _response) =
        connect_async(url)
            .await
            .map_err(|e| StreamscribeError::Connection {
                message: format!("{}: {}", url, e),
            })?;
    eprintln!("Connected! Speak into your microphone...");

    let chunk_samples = defaults::chunk_samples(config.audio.sample_rate, config.audio.chunk_ms);
    let capture = MicrophoneCapture::new(
        config.audio.device.as_deref(),
        config.audio.sample_rate,
        chunk_samples,
    )?;

    let (tx, rx) = mpsc::unbounded_channel();
    // The cpal stream is !Send and must stay alive while we stream; it lives
    // on this task until the session ends.
    let _stream = capture.start(tx)?;

    let session = run_session(ws, rx);
    tokio::pin!(session);

    tokio::select! {
        first = &mut session => {
            // Whichever loop ended, the session is over; the notice must not
            // depend on the receive loop getting there first.
            debug!(?first, "session ended");
            println!("\nConnection closed by server.");
        }
        _ = tokio::signal::ctrl_c() => {
            println!("\nStopped.");
        }
    }

    Ok(())
}

/// Drive one session over an established connection: forward chunks from
/// `rx`, display results, and resolve when either loop ends.
async fn run_session(ws: WsStream, rx: mpsc::UnboundedReceiver<Vec<f32>>) -> FirstDone {
    let (sink, stream) = ws.split();
    let send_task = tokio::spawn(send_audio(rx, sink));
    let recv_task = tokio::spawn(receive_results(stream));
    run_linked(send_task, recv_task).await
}

/// Forward captured chunks to the server in arrival order.
async fn send_audio(
    mut rx: mpsc::UnboundedReceiver<Vec<f32>>,
    mut sink: SplitSink<WsStream, Message>,
) {
    while let Some(chunk) = rx.recv().await {
        let frame = Message::Binary(protocol::encode_chunk(&chunk));
        if sink.send(frame).await.is_err() {
            // Transport closed: terminal, not an error
            return;
        }
    }
}

/// Display each result as it arrives; stop on close or transport error.
async fn receive_results(mut stream: SplitStream<WsStream>) {
    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => {
                print!("\r{:<width$}", format_status_line(&text), width = STATUS_WIDTH);
                let _ = std::io::stdout().flush();
            }
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => {}
        }
    }
}

/// Render one received message for the status line.
///
/// A message that parses as a result shows latency and transcript; anything
/// else is displayed as raw text rather than discarded.
fn format_status_line(raw: &str) -> String {
    match TranscriptUpdate::from_json(raw) {
        Ok(update) => format!("[{:.0}ms] Transcript: {}", update.latency, update.text),
        Err(_) => format!("Transcript: {}", raw),
    }
}
