//! Rolling audio window for the server side of a session.
//!
//! Holds the trailing N seconds of audio, continuously overwritten as chunks
//! arrive. Implemented as a ring with a write offset so a push costs O(chunk)
//! instead of shifting the whole window.

/// Fixed-capacity rolling buffer over f32 samples.
///
/// The buffer length never changes after construction; it always represents
/// the most recent `capacity` samples pushed, zero-padded at the head until
/// enough audio has arrived.
#[derive(Debug, Clone)]
pub struct WindowBuffer {
    /// Physical ring storage, always exactly `capacity` long.
    samples: Vec<f32>,
    /// Next physical write index; also the index of the oldest sample.
    write_pos: usize,
    /// Total samples pushed since creation or the last `clear`.
    pushed: u64,
}

impl WindowBuffer {
    /// Create a buffer holding `capacity` samples, initially all zero.
    ///
    /// # Panics
    /// Panics if `capacity` is zero; a zero-length window is meaningless.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "window capacity must be non-zero");
        Self {
            samples: vec![0.0; capacity],
            write_pos: 0,
            pushed: 0,
        }
    }

    /// Create a buffer sized for `window_secs` seconds at `sample_rate`.
    pub fn for_duration(sample_rate: u32, window_secs: u32) -> Self {
        Self::new(crate::defaults::window_samples(sample_rate, window_secs))
    }

    /// Window capacity in samples.
    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// Total samples pushed since creation or the last `clear`.
    pub fn samples_pushed(&self) -> u64 {
        self.pushed
    }

    /// Push a chunk, dropping the oldest samples to make room.
    ///
    /// A chunk at least as long as the window replaces the entire content
    /// with its trailing `capacity` samples.
    pub fn push(&mut self, chunk: &[f32]) {
        let cap = self.samples.len();

        if chunk.len() >= cap {
            self.samples.copy_from_slice(&chunk[chunk.len() - cap..]);
            self.write_pos = 0;
        } else {
            // Split copy around the physical wrap point.
            let first = chunk.len().min(cap - self.write_pos);
            self.samples[self.write_pos..self.write_pos + first].copy_from_slice(&chunk[..first]);
            let rest = chunk.len() - first;
            self.samples[..rest].copy_from_slice(&chunk[first..]);
            self.write_pos = (self.write_pos + chunk.len()) % cap;
        }

        self.pushed += chunk.len() as u64;
    }

    /// Snapshot the window in chronological order, oldest first.
    ///
    /// The returned vector is owned by the caller and cannot be changed by a
    /// later `push`; repeated calls between pushes return identical content.
    pub fn window(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.samples.len());
        out.extend_from_slice(&self.samples[self.write_pos..]);
        out.extend_from_slice(&self.samples[..self.write_pos]);
        out
    }

    /// Reset all samples to zero and the pushed counter to zero.
    pub fn clear(&mut self) {
        self.samples.fill(0.0);
        self.write_pos = 0;
        self.pushed = 0;
    }
}
