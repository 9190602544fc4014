//! Speech-to-text boundary.
//!
//! The engine itself is an external collaborator: everything behind
//! [`Transcriber`] is someone else's problem, everything in front of it is
//! ours. The trait takes a fixed-length window and a performance mode and
//! returns a transcript, possibly after an unbounded amount of time.

pub mod null;
pub mod transcriber;

pub use null::NullTranscriber;
pub use transcriber::{MockTranscriber, Mode, Transcriber};
