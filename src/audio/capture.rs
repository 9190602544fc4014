//! Microphone capture using CPAL (Cross-Platform Audio Library).
//!
//! The capture callback runs on the audio backend's own thread and must never
//! block: it copies the delivered block (the hardware buffer is reused) and
//! hands it off to the async send loop through an unbounded channel. The
//! queue imposes no backpressure — if the consumer stalls, it grows without
//! bound, mirroring the delivery contract of the rest of the pipeline.

use crate::error::{Result, StreamscribeError};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tokio::sync::mpsc;
use tracing::error;

/// Run a closure with stderr temporarily redirected to /dev/null.
///
/// This suppresses noisy ALSA/JACK/PipeWire messages that CPAL triggers
/// when probing audio backends. The messages are harmless but confusing to users.
///
/// # Safety
/// Uses `libc::dup`/`libc::dup2` to save and restore file descriptor 2 (stderr).
/// Safe as long as no other thread is concurrently manipulating fd 2.
fn with_suppressed_stderr<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    unsafe {
        let saved_fd = libc::dup(2);
        let devnull = libc::open(c"/dev/null".as_ptr(), libc::O_WRONLY);
        if saved_fd >= 0 && devnull >= 0 {
            libc::dup2(devnull, 2);
            libc::close(devnull);
        }

        let result = f();

        if saved_fd >= 0 {
            libc::dup2(saved_fd, 2);
            libc::close(saved_fd);
        }

        result
    }
}

/// Device name patterns to filter out (not useful for voice input).
const FILTERED_PATTERNS: &[&str] = &[
    "surround",
    "front:",
    "rear:",
    "center:",
    "side:",
    "Digital Output",
    "HDMI",
    "S/PDIF",
];

fn should_filter_device(name: &str) -> bool {
    let lower = name.to_lowercase();
    FILTERED_PATTERNS
        .iter()
        .any(|pattern| lower.contains(&pattern.to_lowercase()))
}

/// List available audio input devices, filtering out obviously unusable ones
/// (surround channels, HDMI, etc.).
pub fn list_devices() -> Result<Vec<String>> {
    let (host, devices) = with_suppressed_stderr(|| {
        let host = cpal::default_host();
        let devices = host.input_devices();
        (host, devices)
    });
    let _ = host; // keep host alive while iterating devices
    let devices = devices.map_err(|e| StreamscribeError::AudioCapture {
        message: format!("Failed to enumerate input devices: {}", e),
    })?;

    let mut device_names = Vec::new();
    for device in devices {
        if let Ok(name) = device.name() {
            if !should_filter_device(&name) {
                device_names.push(name);
            }
        }
    }

    Ok(device_names)
}

/// Microphone source delivering fixed-size f32 blocks at a steady cadence.
pub struct MicrophoneCapture {
    device: cpal::Device,
    sample_rate: u32,
    chunk_samples: usize,
}

impl MicrophoneCapture {
    /// Open the named device, or the system default when `device_name` is None.
    pub fn new(device_name: Option<&str>, sample_rate: u32, chunk_samples: usize) -> Result<Self> {
        let device = with_suppressed_stderr(|| {
            let host = cpal::default_host();

            if let Some(name) = device_name {
                let devices = host
                    .input_devices()
                    .map_err(|e| StreamscribeError::AudioCapture {
                        message: format!("Failed to enumerate devices: {}", e),
                    })?;

                for dev in devices {
                    if dev.name().map(|n| n == name).unwrap_or(false) {
                        return Ok(dev);
                    }
                }

                Err(StreamscribeError::AudioDeviceNotFound {
                    device: name.to_string(),
                })
            } else {
                host.default_input_device()
                    .ok_or_else(|| StreamscribeError::AudioDeviceNotFound {
                        device: "default".to_string(),
                    })
            }
        })?;

        Ok(Self {
            device,
            sample_rate,
            chunk_samples,
        })
    }

    /// Start capturing; each delivered block is copied and enqueued on `tx`.
    ///
    /// The returned stream must be kept alive for capture to continue; it is
    /// not `Send`, so the caller holds it on the thread that created it.
    /// Dropping the sender's receiver simply makes subsequent sends no-ops;
    /// capture stops when the stream is dropped.
    pub fn start(&self, tx: mpsc::UnboundedSender<Vec<f32>>) -> Result<cpal::Stream> {
        let config = cpal::StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(self.sample_rate),
            buffer_size: cpal::BufferSize::Fixed(self.chunk_samples as u32),
        };

        let err_callback = |err| {
            error!(error = %err, "audio stream error");
        };

        // Copy out of the hardware buffer before it is reused; the unbounded
        // send never blocks the audio thread.
        let sender = tx.clone();
        let stream = self
            .device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let _ = sender.send(data.to_vec());
                },
                err_callback,
                None,
            )
            .or_else(|_| {
                // Some backends reject a fixed block size; fall back to the
                // default and accept variable-length chunks.
                let config = cpal::StreamConfig {
                    channels: 1,
                    sample_rate: cpal::SampleRate(self.sample_rate),
                    buffer_size: cpal::BufferSize::Default,
                };
                let sender = tx.clone();
                self.device.build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        let _ = sender.send(data.to_vec());
                    },
                    err_callback,
                    None,
                )
            })
            .map_err(|e| StreamscribeError::AudioCapture {
                message: format!("Failed to build input stream: {}", e),
            })?;

        stream.play().map_err(|e| StreamscribeError::AudioCapture {
            message: format!("Failed to start input stream: {}", e),
        })?;

        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_filter_device() {
        assert!(should_filter_device("HDA Intel HDMI"));
        assert!(should_filter_device("surround51:CARD=PCH"));
        assert!(should_filter_device("front:CARD=PCH,DEV=0"));
        assert!(!should_filter_device("pipewire"));
        assert!(!should_filter_device("USB Microphone"));
    }

    #[test]
    fn test_suppressed_stderr_returns_closure_result() {
        let value = with_suppressed_stderr(|| 42);
        assert_eq!(value, 42);
    }
}
