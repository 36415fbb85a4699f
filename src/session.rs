// src/session.rs
//! Ingestion session lifecycle
//!
//! Drives `Idle -> Acquiring -> {Ready | Failed}` once per media
//! selection. Selecting a file immediately stores a locally-playable
//! [`MediaRef`] (playback and transcription are decoupled concerns: the
//! video can start before the transcript resolves) and hands back an
//! [`IngestionJob`] that encodes the media and calls the external
//! transcript collaborator exactly once.
//!
//! Rapid re-selection races are resolved with a monotonically increasing
//! selection generation: every job carries the generation it was created
//! under, and [`Session::apply`] discards outcomes from superseded
//! selections. There is no cancellation of the in-flight call itself, only
//! suppression of its effect on state.
//!
//! No ingestion timeout is enforced; a hung collaborator leaves the
//! session in `Acquiring` until the next selection.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use base64::{Engine as _, engine::general_purpose};
use futures_util::future::BoxFuture;
use tokio::sync::mpsc;

use crate::transcript::{LyricLine, Transcript};

/// User-facing message when the transcript collaborator fails
pub const INGESTION_FAILED_MESSAGE: &str = "Transcription failed. Try another video.";

/// User-facing message when the media file could not be read
pub const LOAD_FAILED_MESSAGE: &str = "Could not load the file.";

/// Lifecycle stage of transcript acquisition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// Before the first selection
    #[default]
    Idle,
    /// A selection was made; the transcript request is outstanding
    Acquiring,
    /// A transcript is available
    Ready,
    /// Ingestion or file loading failed; recoverable by re-selecting
    Failed,
}

/// The external transcript collaborator
///
/// Input is the raw media content as a base64 payload plus its MIME type;
/// output is the ordered lyric lines or an opaque error. The session only
/// distinguishes success from failure.
pub trait TranscriptSource: Send + Sync {
    /// Turn encoded media into timed lyric lines
    fn transcribe(
        &self,
        payload: String,
        mime_type: String,
    ) -> BoxFuture<'_, Result<Vec<LyricLine>>>;
}

/// Locally-playable reference to the selected media bytes
///
/// Created synchronously at selection time, independent of transcript
/// readiness, so the host can begin playback immediately.
#[derive(Debug, Clone)]
pub struct MediaRef {
    bytes: Arc<Vec<u8>>,
    mime_type: String,
}

impl MediaRef {
    /// Raw media content
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// MIME type reported by the host at selection time
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

/// Resolution of one ingestion call, tagged with the selection it belongs to
#[derive(Debug)]
pub struct IngestionOutcome {
    generation: u64,
    result: Result<Vec<LyricLine>>,
}

impl IngestionOutcome {
    /// The selection generation this outcome belongs to
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Sender half of the ingestion event channel (held by spawned jobs)
pub type IngestionSender = mpsc::UnboundedSender<IngestionOutcome>;

/// Receiver half of the ingestion event channel (held by the host loop)
pub type IngestionReceiver = mpsc::UnboundedReceiver<IngestionOutcome>;

/// Create a new ingestion event channel
pub fn ingestion_channel() -> (IngestionSender, IngestionReceiver) {
    mpsc::unbounded_channel()
}

/// One in-flight transcript acquisition
///
/// Encodes the media payload off-thread and calls the collaborator once.
/// The outcome must be routed back into [`Session::apply`].
#[derive(Debug)]
pub struct IngestionJob {
    generation: u64,
    media: MediaRef,
}

impl IngestionJob {
    /// The selection generation this job was created under
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Run the acquisition to completion against `source`
    pub async fn run<S: TranscriptSource + ?Sized>(self, source: &S) -> IngestionOutcome {
        let bytes = Arc::clone(&self.media.bytes);
        let mime_type = self.media.mime_type.clone();

        // Encoding a whole video is CPU-bound; keep it off the event loop
        let encoded =
            tokio::task::spawn_blocking(move || general_purpose::STANDARD.encode(bytes.as_slice()))
                .await;

        let result = match encoded {
            Ok(payload) => source.transcribe(payload, mime_type).await,
            Err(e) => Err(anyhow!("failed to encode media payload: {e}")),
        };

        IngestionOutcome {
            generation: self.generation,
            result,
        }
    }

    /// Spawn the acquisition as a background task, delivering the outcome
    /// over `events`
    pub fn spawn<S>(self, source: Arc<S>, events: IngestionSender)
    where
        S: TranscriptSource + ?Sized + 'static,
    {
        tokio::spawn(async move {
            let outcome = self.run(source.as_ref()).await;
            // Host loop may be gone during shutdown
            let _ = events.send(outcome);
        });
    }
}

/// Transcript acquisition state, owned by the main event loop
#[derive(Debug, Default)]
pub struct Session {
    status: SessionStatus,
    media: Option<MediaRef>,
    transcript: Option<Arc<Transcript>>,
    error: Option<String>,
    generation: u64,
}

impl Session {
    /// Create a session in the `Idle` state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle stage
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// The transcript, available only in `Ready`
    pub fn transcript(&self) -> Option<&Arc<Transcript>> {
        self.transcript.as_ref()
    }

    /// User-facing error description, available only in `Failed`
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The locally-playable media reference for the current selection
    pub fn media(&self) -> Option<&MediaRef> {
        self.media.as_ref()
    }

    /// Current selection generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Select a new media file.
    ///
    /// Discards any prior transcript or error, stores the playable media
    /// reference, and returns the job for this selection's single
    /// collaborator call. Valid from any state.
    pub fn select(&mut self, bytes: Vec<u8>, mime_type: impl Into<String>) -> IngestionJob {
        let mime_type = mime_type.into();
        self.generation += 1;
        self.status = SessionStatus::Acquiring;
        self.transcript = None;
        self.error = None;

        let media = MediaRef {
            bytes: Arc::new(bytes),
            mime_type,
        };
        self.media = Some(media.clone());

        tracing::info!(
            generation = self.generation,
            mime_type = %media.mime_type,
            size = media.bytes.len(),
            "media selected, acquiring transcript"
        );

        IngestionJob {
            generation: self.generation,
            media,
        }
    }

    /// The host could not read the selected file
    pub fn fail_load(&mut self) {
        // Supersede any in-flight acquisition along with the failed load
        self.generation += 1;
        self.status = SessionStatus::Failed;
        self.media = None;
        self.transcript = None;
        self.error = Some(LOAD_FAILED_MESSAGE.to_string());
    }

    /// Apply a resolved ingestion call.
    ///
    /// Outcomes from superseded selections are discarded; a matching
    /// failure never stores a partial transcript.
    pub fn apply(&mut self, outcome: IngestionOutcome) {
        if outcome.generation != self.generation {
            tracing::debug!(
                stale = outcome.generation,
                current = self.generation,
                "discarding superseded ingestion result"
            );
            return;
        }

        match outcome.result {
            Ok(lines) => {
                tracing::info!(
                    generation = outcome.generation,
                    lines = lines.len(),
                    "transcript ready"
                );
                self.transcript = Some(Arc::new(Transcript::new(lines)));
                self.error = None;
                self.status = SessionStatus::Ready;
            }
            Err(e) => {
                tracing::warn!(generation = outcome.generation, "transcript ingestion failed: {e:#}");
                self.transcript = None;
                self.error = Some(INGESTION_FAILED_MESSAGE.to_string());
                self.status = SessionStatus::Failed;
            }
        }
    }
}
