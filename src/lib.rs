//! lyrsync - a synchronized-lyrics playback engine
//!
//! Maps a continuous playback clock onto discrete lyric highlight state:
//! the single active line, the active words within it, and a scroll offset
//! that keeps the active line centered. Also owns the ingestion lifecycle
//! for acquiring a word-timed transcript from an external transcription
//! service, and the ended/replay playback state machine.
//!
//! - `transcript`: immutable transcript model and wire types
//! - `sync`: pure time-to-highlight indexing
//! - `scroll`: scroll centering behind a layout-query capability
//! - `playback`: transport signals, media commands, ended/replay machine
//! - `session`: ingestion orchestration with stale-result suppression
//! - `api`: transcript-generation service clients
//! - `engine`: composition root and presentation snapshot
//!
//! File selection and rendering are host concerns; the engine consumes
//! transport signals and layout measurements, and produces media commands,
//! scroll requests, and observable highlight state.

pub mod api;
pub mod engine;
pub mod playback;
pub mod scroll;
pub mod session;
pub mod sync;
pub mod transcript;

pub use engine::{Engine, EngineSnapshot};
pub use playback::{MediaCommand, PlaybackState, TransportEvent};
pub use scroll::{LayoutQuery, LineMetrics, ScrollCenter, ScrollRequest};
pub use session::{
    IngestionJob, IngestionOutcome, IngestionReceiver, IngestionSender, MediaRef, Session,
    SessionStatus, TranscriptSource, ingestion_channel,
};
pub use sync::{HighlightBuffers, LineStatus, active_line, active_words, line_status, word_active};
pub use transcript::{LyricLine, Transcript, Word};
