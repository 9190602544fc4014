//! Default configuration constants for streamscribe.
//!
//! Shared across the client, server, and config types so the two sides of the
//! wire always agree on the audio format.

/// Default audio sample rate in Hz.
///
/// 16kHz is the standard for speech recognition and is the rate the
/// transcription engine expects its window to be in.
pub const SAMPLE_RATE: u32 = 16000;

/// Default capture chunk duration in milliseconds.
///
/// The microphone delivers one block of this length per callback, and each
/// block travels as exactly one binary message.
pub const CHUNK_MS: u32 = 250;

/// Default rolling window duration in seconds.
///
/// The server keeps the trailing 30 seconds of audio; every inference call
/// sees exactly this much context (zero-padded until enough audio arrives).
pub const WINDOW_SECS: u32 = 30;

/// Default inference tick period in milliseconds.
///
/// The scheduler snapshots the window and invokes the engine once per tick.
/// When inference runs longer than this, the effective cadence degrades to
/// `tick + inference latency` — ticks never overlap and are never skipped.
pub const TICK_MS: u64 = 500;

/// Default server bind address.
pub const BIND_ADDR: &str = "127.0.0.1:8000";

/// Default WebSocket URL the client connects to.
pub const SERVER_URL: &str = "ws://127.0.0.1:8000/ws";

/// Number of samples in one capture chunk at the default configuration.
pub fn chunk_samples(sample_rate: u32, chunk_ms: u32) -> usize {
    (sample_rate as u64 * chunk_ms as u64 / 1000) as usize
}

/// Number of samples in the rolling window.
pub fn window_samples(sample_rate: u32, window_secs: u32) -> usize {
    sample_rate as usize * window_secs as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_samples_at_defaults() {
        // 0.25s at 16kHz
        assert_eq!(chunk_samples(SAMPLE_RATE, CHUNK_MS), 4000);
    }

    #[test]
    fn window_samples_at_defaults() {
        // 30s at 16kHz
        assert_eq!(window_samples(SAMPLE_RATE, WINDOW_SECS), 480_000);
    }
}
