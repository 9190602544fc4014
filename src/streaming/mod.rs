//! Core streaming pipeline: windowing, scheduling, and session lifetime.
//!
//! ```text
//! mic ──▶ chunk queue ──▶ WebSocket (binary) ──▶ WindowBuffer
//!                                                    │ snapshot per tick
//!                                                    ▼
//! display ◀── WebSocket (text) ◀── InferenceScheduler ──▶ engine (blocking pool)
//! ```
//!
//! Per session the ingest and produce loops are linked by the supervisor:
//! whichever ends first takes the other down with it.

pub mod scheduler;
pub mod supervisor;
pub mod window;

pub use scheduler::InferenceScheduler;
pub use supervisor::{run_linked, FirstDone};
pub use window::WindowBuffer;
