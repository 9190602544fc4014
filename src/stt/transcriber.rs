use crate::error::{Result, StreamscribeError};
use std::str::FromStr;
use std::sync::Arc;

/// Performance mode for the transcription engine.
///
/// Selects an internal trade-off only (e.g. reuse of prior computation);
/// it never changes the shape of the input window or the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// No cross-call reuse; slower but maximally consistent decoding.
    Standard,
    /// Internal caching enabled for lower latency.
    #[default]
    Optimized,
}

impl Mode {
    /// Parse a mode token permissively.
    ///
    /// Only `optimized` selects the optimized mode; any other token means
    /// standard. Endpoints accept arbitrary tokens, so this never fails.
    pub fn from_token(token: &str) -> Self {
        if token == "optimized" {
            Mode::Optimized
        } else {
            Mode::Standard
        }
    }
}

impl FromStr for Mode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Mode::from_token(s))
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Standard => write!(f, "standard"),
            Mode::Optimized => write!(f, "optimized"),
        }
    }
}

/// Trait for speech-to-text transcription.
///
/// This is the inference boundary: given a fixed-length window of audio,
/// produce a transcript. Calls may take unbounded and variable time, so they
/// must always be dispatched off the async scheduling path.
///
/// Implementations must tolerate concurrent invocation from multiple
/// sessions — each call is logically independent given its input window.
pub trait Transcriber: Send + Sync {
    /// Transcribe a window of audio to text.
    ///
    /// # Arguments
    /// * `window` - Audio samples as f32 at 16kHz mono
    /// * `mode` - Engine performance mode
    fn transcribe(&self, window: &[f32], mode: Mode) -> Result<String>;

    /// Get the name of the loaded model
    fn model_name(&self) -> &str;

    /// Check if the transcriber is ready
    fn is_ready(&self) -> bool;
}

/// Implement Transcriber for Arc<T> so one engine is shared across sessions.
impl<T: Transcriber + ?Sized> Transcriber for Arc<T> {
    fn transcribe(&self, window: &[f32], mode: Mode) -> Result<String> {
        (**self).transcribe(window, mode)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}

/// Mock transcriber for testing
#[derive(Debug, Clone)]
pub struct MockTranscriber {
    model_name: String,
    response: String,
    should_fail: bool,
    delay: Option<std::time::Duration>,
}

impl MockTranscriber {
    /// Create a new mock transcriber with default settings
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            response: "mock transcription".to_string(),
            should_fail: false,
            delay: None,
        }
    }

    /// Configure the mock to return a specific response
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Configure the mock to fail on transcribe
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Configure the mock to sleep before answering, simulating slow inference
    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl Transcriber for MockTranscriber {
    fn transcribe(&self, _window: &[f32], _mode: Mode) -> Result<String> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.should_fail {
            Err(StreamscribeError::Transcription {
                message: "mock transcription failure".to_string(),
            })
        } else {
            Ok(self.response.clone())
        }
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn is_ready(&self) -> bool {
        !self.should_fail
    }
}
