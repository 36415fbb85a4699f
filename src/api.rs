//! Transcript-generation service clients
//!
//! Concrete implementations of the [`crate::session::TranscriptSource`]
//! seam. The engine core never depends on these directly; hosts pick one
//! (or bring their own) at wiring time.

mod gemini;

pub use gemini::GeminiClient;
