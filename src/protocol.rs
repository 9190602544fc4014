//! Wire protocol between client and server.
//!
//! Two independent streams share one WebSocket connection: binary messages
//! carry raw audio chunks client → server, text messages carry JSON
//! transcription results server → client.
//!
//! A binary message is raw little-endian f32 samples, mono, one message per
//! chunk, no header — chunk boundaries are exactly message boundaries.

use crate::error::{Result, StreamscribeError};
use serde::{Deserialize, Serialize};

/// One transcription result: the text plus how long the inference call took.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptUpdate {
    /// Transcribed text for the current window.
    pub text: String,
    /// Wall-clock duration of the engine call, in milliseconds.
    pub latency: f64,
}

impl TranscriptUpdate {
    /// Serialize to a JSON string.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from a JSON string.
    pub fn from_json(s: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Encode an audio chunk as raw little-endian f32 bytes.
pub fn encode_chunk(samples: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 4);
    for sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    bytes
}

/// Decode raw little-endian f32 bytes into samples.
///
/// A payload whose length is not a multiple of 4 cannot be a whole number of
/// samples and is rejected as malformed.
pub fn decode_chunk(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(StreamscribeError::MalformedChunk { len: bytes.len() });
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_update_json_roundtrip() {
        let update = TranscriptUpdate {
            text: "hello world".to_string(),
            latency: 123.456,
        };
        let json = update.to_json().expect("should serialize");
        let decoded = TranscriptUpdate::from_json(&json).expect("should deserialize");

        assert_eq!(decoded.text, "hello world");
        assert!((decoded.latency - 123.456).abs() < 1e-9);
    }

    #[test]
    fn test_transcript_update_json_field_names() {
        let update = TranscriptUpdate {
            text: "hi".to_string(),
            latency: 5.0,
        };
        let json = update.to_json().unwrap();
        assert!(json.contains("\"text\":\"hi\""), "got: {}", json);
        assert!(json.contains("\"latency\":5.0"), "got: {}", json);
    }

    #[test]
    fn test_transcript_update_with_special_chars() {
        let update = TranscriptUpdate {
            text: r#"he said "hi" \ and left"#.to_string(),
            latency: 0.0,
        };
        let json = update.to_json().unwrap();
        let decoded = TranscriptUpdate::from_json(&json).unwrap();
        assert_eq!(update, decoded);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(TranscriptUpdate::from_json("not json at all").is_err());
        assert!(TranscriptUpdate::from_json(r#"{"text": "missing latency"}"#).is_err());
        assert!(TranscriptUpdate::from_json(r#"{"latency": "not a number", "text": ""}"#).is_err());
    }

    #[test]
    fn test_chunk_roundtrip() {
        let samples = vec![0.0f32, 1.0, -1.0, 0.5, -0.25, f32::MIN_POSITIVE];
        let bytes = encode_chunk(&samples);
        assert_eq!(bytes.len(), samples.len() * 4);

        let decoded = decode_chunk(&bytes).unwrap();
        assert_eq!(decoded, samples);
    }

    #[test]
    fn test_chunk_is_little_endian() {
        let bytes = encode_chunk(&[1.0f32]);
        assert_eq!(bytes, 1.0f32.to_le_bytes().to_vec());
    }

    #[test]
    fn test_empty_chunk() {
        assert!(encode_chunk(&[]).is_empty());
        assert_eq!(decode_chunk(&[]).unwrap(), Vec::<f32>::new());
    }

    #[test]
    fn test_decode_rejects_partial_sample() {
        for len in [1usize, 2, 3, 5, 7, 4001] {
            if len % 4 == 0 {
                continue;
            }
            let bytes = vec![0u8; len];
            match decode_chunk(&bytes) {
                Err(StreamscribeError::MalformedChunk { len: reported }) => {
                    assert_eq!(reported, len);
                }
                other => panic!("expected MalformedChunk for {} bytes, got {:?}", len, other),
            }
        }
    }
}
