//! Placeholder engine for running the server without a model.
//!
//! Reports what it was given instead of transcribing, which makes end-to-end
//! wiring observable: the client sees window occupancy and latency numbers
//! change as audio flows.

use crate::error::Result;
use crate::stt::transcriber::{Mode, Transcriber};
use std::sync::atomic::{AtomicU64, Ordering};

/// Engine stand-in that describes the window instead of transcribing it.
pub struct NullTranscriber {
    calls: AtomicU64,
}

impl NullTranscriber {
    pub fn new() -> Self {
        Self {
            calls: AtomicU64::new(0),
        }
    }

    /// Number of transcribe calls made so far.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Default for NullTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcriber for NullTranscriber {
    fn transcribe(&self, window: &[f32], mode: Mode) -> Result<String> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed) + 1;
        let live = window.iter().filter(|s| **s != 0.0).count();
        Ok(format!(
            "[null/{mode}] tick {call}: {live}/{} live samples",
            window.len()
        ))
    }

    fn model_name(&self) -> &str {
        "null"
    }

    fn is_ready(&self) -> bool {
        true
    }
}
