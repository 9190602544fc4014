//! Audio capture.

pub mod capture;

pub use capture::{list_devices, MicrophoneCapture};
