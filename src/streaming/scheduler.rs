//! Fixed-cadence inference scheduling for one session.
//!
//! Each tick sleeps for the period, snapshots the current window, and runs
//! the engine on the blocking thread pool so inference latency never stalls
//! the async loop that is also ingesting audio. Ticks are not re-entrant:
//! the next sleep begins only after the previous engine call returns, so the
//! effective cadence degrades to `period + latency` under slow inference
//! rather than overlapping or skipping.

use crate::error::{Result, StreamscribeError};
use crate::protocol::TranscriptUpdate;
use crate::streaming::window::WindowBuffer;
use crate::stt::{Mode, Transcriber};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Drives the tick loop for one session.
pub struct InferenceScheduler {
    engine: Arc<dyn Transcriber>,
    buffer: Arc<Mutex<WindowBuffer>>,
    mode: Mode,
    period: Duration,
}

impl InferenceScheduler {
    pub fn new(
        engine: Arc<dyn Transcriber>,
        buffer: Arc<Mutex<WindowBuffer>>,
        mode: Mode,
        period: Duration,
    ) -> Self {
        Self {
            engine,
            buffer,
            mode,
            period,
        }
    }

    /// Run one tick: sleep, snapshot, transcribe, measure.
    ///
    /// The window snapshot is taken after the sleep, so a tick always sees
    /// "whatever is in the window at tick time" — an all-zero window on a
    /// silent session is still transcribed.
    ///
    /// Engine faults and inference panics surface as errors; per session
    /// policy they are fatal to the production task.
    pub async fn tick(&self) -> Result<TranscriptUpdate> {
        tokio::time::sleep(self.period).await;

        let window = self.buffer.lock().await.window();
        let engine = Arc::clone(&self.engine);
        let mode = self.mode;

        let start = Instant::now();
        let text = tokio::task::spawn_blocking(move || engine.transcribe(&window, mode))
            .await
            .map_err(|e| StreamscribeError::Transcription {
                message: format!("inference task panicked: {}", e),
            })??;
        let latency = start.elapsed().as_secs_f64() * 1000.0;

        Ok(TranscriptUpdate { text, latency })
    }

    /// Tick period this scheduler was configured with.
    pub fn period(&self) -> Duration {
        self.period
    }
}
