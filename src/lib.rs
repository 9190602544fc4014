//! streamscribe - live microphone transcription over WebSocket
//!
//! Streams raw audio from a capture client to a server that keeps a rolling
//! window of the trailing audio, transcribes it on a fixed cadence, and
//! streams results back with latency metadata.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
pub mod cli;
pub mod client;
pub mod config;
pub mod defaults;
pub mod error;
pub mod protocol;
pub mod server;
pub mod streaming;
pub mod stt;

// Core traits and types
pub use stt::{MockTranscriber, Mode, NullTranscriber, Transcriber};

// Streaming pipeline
pub use streaming::{run_linked, FirstDone, InferenceScheduler, WindowBuffer};

// Protocol
pub use protocol::{decode_chunk, encode_chunk, TranscriptUpdate};

// Error handling
pub use error::{Result, StreamscribeError};

// Config
pub use config::Config;
