//! Engine composition
//!
//! Wires the session, playback state, time-indexer, and scroll controller
//! into the control flow of a playing session: every transport signal
//! updates the clock and recomputes highlight state from scratch, while
//! the scroll controller is consulted only when the active-line identity
//! changes. [`Engine::snapshot`] exposes the full observable presentation
//! state; rendering stays host-side.

use crate::playback::{MediaCommand, PlaybackState, TransportEvent};
use crate::scroll::{LayoutQuery, ScrollCenter, ScrollRequest};
use crate::session::{IngestionJob, IngestionOutcome, Session, SessionStatus};
use crate::sync::{HighlightBuffers, LineStatus, active_words, word_active};

/// The synchronized-lyrics playback engine
#[derive(Debug, Default)]
pub struct Engine {
    session: Session,
    playback: PlaybackState,
    scroll: ScrollCenter,
    highlight: HighlightBuffers,
    scroll_target: Option<f32>,
}

impl Engine {
    /// Create an idle engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Transcript acquisition state
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Playback clock and ended/replay state
    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    /// Select a new media file.
    ///
    /// Resets playback and highlight state, begins transcript acquisition,
    /// and returns the job for the collaborator call plus the command that
    /// starts the freshly loaded media playing.
    pub fn select(
        &mut self,
        bytes: Vec<u8>,
        mime_type: impl Into<String>,
    ) -> (IngestionJob, MediaCommand) {
        self.playback.reset();
        self.highlight.clear();
        self.scroll.invalidate();
        self.scroll_target = None;

        let job = self.session.select(bytes, mime_type);
        (job, MediaCommand::Play)
    }

    /// The host could not read the selected file
    pub fn fail_load(&mut self) {
        self.session.fail_load();
        self.playback.reset();
        self.highlight.clear();
    }

    /// Route a resolved ingestion call into the session.
    ///
    /// When the transcript becomes ready mid-playback the highlight state
    /// is brought up to date immediately; centering follows on the next
    /// time-update once the host has rendered the lines.
    pub fn apply_ingestion(&mut self, outcome: IngestionOutcome) {
        self.session.apply(outcome);
        if let Some(transcript) = self.session.transcript() {
            self.highlight.recompute(self.playback.current_time(), transcript);
        }
    }

    /// Apply one transport signal and recompute derived highlight state.
    ///
    /// Returns a smooth-scroll request when the active line changed and
    /// its rendered position is known.
    pub fn handle_transport(
        &mut self,
        event: TransportEvent,
        layout: &impl LayoutQuery,
    ) -> Option<ScrollRequest> {
        self.playback.handle(event);

        let transcript = self.session.transcript()?.clone();
        self.highlight.recompute(self.playback.current_time(), &transcript);

        let request = self
            .scroll
            .observe(self.highlight.active_id(&transcript), layout);
        if let Some(request) = request {
            self.scroll_target = Some(request.target);
        }
        request
    }

    /// User-triggered replay from the ended overlay
    pub fn replay(&mut self) -> [MediaCommand; 2] {
        let commands = self.playback.replay();
        if let Some(transcript) = self.session.transcript() {
            self.highlight.recompute(self.playback.current_time(), transcript);
        }
        commands
    }

    /// Notify the engine that line layout changed (container resized); the
    /// next transport signal re-centers the active line
    pub fn invalidate_layout(&mut self) {
        self.scroll.invalidate();
    }

    /// Whether the word at `word_index` of line `line_index` is active
    pub fn word_active(&self, line_index: usize, word_index: usize) -> bool {
        self.session
            .transcript()
            .and_then(|t| t.lines().get(line_index))
            .is_some_and(|line| word_active(self.playback.current_time(), line, word_index))
    }

    /// The full observable presentation state
    pub fn snapshot(&self) -> EngineSnapshot<'_> {
        let transcript = self.session.transcript();
        let active_line = transcript.and_then(|t| self.highlight.active_id(t));
        let active_word_indices = transcript
            .and_then(|t| {
                self.highlight
                    .active_index()
                    .and_then(|idx| t.lines().get(idx))
            })
            .map(|line| active_words(self.playback.current_time(), line).collect())
            .unwrap_or_default();

        EngineSnapshot {
            status: self.session.status(),
            error: self.session.error(),
            current_time: self.playback.current_time(),
            active_line,
            line_statuses: self.highlight.statuses(),
            active_word_indices,
            ended: self.playback.is_ended(),
            controls_visible: self.playback.controls_visible(),
            replay_visible: self.playback.replay_visible(),
            scroll_target: self.scroll_target,
        }
    }
}

/// Observable presentation state, recomputed per tick
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSnapshot<'a> {
    /// Ingestion lifecycle stage
    pub status: SessionStatus,
    /// User-facing error text while `Failed`
    pub error: Option<&'a str>,
    /// Playback clock in seconds
    pub current_time: f64,
    /// Id of the active line, if any
    pub active_line: Option<&'a str>,
    /// Per-line classification, in transcript order
    pub line_statuses: &'a [LineStatus],
    /// Indices of the active words within the active line
    pub active_word_indices: Vec<usize>,
    /// Whether the media has completed and not since resumed
    pub ended: bool,
    /// Native transport controls visibility
    pub controls_visible: bool,
    /// Replay affordance visibility
    pub replay_visible: bool,
    /// Last issued scroll target, if any
    pub scroll_target: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::LineMetrics;
    use crate::session::{IngestionSender, TranscriptSource, ingestion_channel};
    use crate::transcript::{LyricLine, Word};
    use anyhow::Result;
    use futures_util::future::BoxFuture;
    use std::collections::HashMap;
    use std::sync::Arc;

    struct TestLayout {
        metrics: HashMap<String, LineMetrics>,
        container_height: f32,
    }

    impl TestLayout {
        fn new(container_height: f32) -> Self {
            Self {
                metrics: HashMap::new(),
                container_height,
            }
        }

        fn with_line(mut self, id: &str, top: f32, height: f32) -> Self {
            self.metrics.insert(id.into(), LineMetrics { top, height });
            self
        }
    }

    impl LayoutQuery for TestLayout {
        fn line_metrics(&self, line_id: &str) -> Option<LineMetrics> {
            self.metrics.get(line_id).copied()
        }

        fn container_height(&self) -> f32 {
            self.container_height
        }
    }

    fn hello_world_transcript() -> Vec<LyricLine> {
        vec![LyricLine {
            id: "1".into(),
            start_time: 0.0,
            end_time: 5.0,
            original_words: vec![
                Word {
                    text: "Hello".into(),
                    start_time: 0.0,
                    end_time: 1.0,
                },
                Word {
                    text: "world".into(),
                    start_time: 1.0,
                    end_time: 2.0,
                },
            ],
            ..Default::default()
        }]
    }

    /// Source resolving to a fixed transcript
    struct FixedSource(Vec<LyricLine>);

    impl TranscriptSource for FixedSource {
        fn transcribe(
            &self,
            _payload: String,
            _mime_type: String,
        ) -> BoxFuture<'_, Result<Vec<LyricLine>>> {
            let lines = self.0.clone();
            Box::pin(async move { Ok(lines) })
        }
    }

    async fn ready_engine(lines: Vec<LyricLine>) -> (Engine, IngestionSender) {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let (events, mut outcomes) = ingestion_channel();
        let mut engine = Engine::new();
        let (job, autoplay) = engine.select(b"clip".to_vec(), "video/mp4");
        assert_eq!(autoplay, MediaCommand::Play, "selected media autoplays");
        job.spawn(Arc::new(FixedSource(lines)), events.clone());
        engine.apply_ingestion(outcomes.recv().await.expect("ingestion resolves"));
        (engine, events)
    }

    // ========== End to end: clock to highlight state ==========

    #[tokio::test]
    async fn test_end_to_end_highlighting() {
        let (mut engine, _events) = ready_engine(hello_world_transcript()).await;
        let layout = TestLayout::new(800.0).with_line("1", 1000.0, 100.0);
        assert_eq!(engine.session().status(), SessionStatus::Ready);

        // t = 0.5: line active, "Hello" active
        engine.handle_transport(TransportEvent::TimeUpdate(0.5), &layout);
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.active_line, Some("1"));
        assert_eq!(snapshot.active_word_indices, vec![0]);
        assert_eq!(snapshot.line_statuses, &[LineStatus::Active]);

        // t = 1.5: "world" active
        engine.handle_transport(TransportEvent::TimeUpdate(1.5), &layout);
        assert_eq!(engine.snapshot().active_word_indices, vec![1]);
        assert!(engine.word_active(0, 1));
        assert!(!engine.word_active(0, 0));

        // t = 5.0: still active (inclusive end)
        engine.handle_transport(TransportEvent::TimeUpdate(5.0), &layout);
        assert_eq!(engine.snapshot().active_line, Some("1"));

        // t = 5.01: passed, nothing active
        engine.handle_transport(TransportEvent::TimeUpdate(5.01), &layout);
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.active_line, None);
        assert_eq!(snapshot.line_statuses, &[LineStatus::Passed]);
        assert!(snapshot.active_word_indices.is_empty());
    }

    // ========== Scroll requests follow line identity, not ticks ==========

    #[tokio::test]
    async fn test_scroll_request_only_on_line_change() {
        let lines = vec![
            LyricLine {
                id: "1".into(),
                start_time: 0.0,
                end_time: 2.0,
                ..Default::default()
            },
            LyricLine {
                id: "2".into(),
                start_time: 3.0,
                end_time: 5.0,
                ..Default::default()
            },
        ];
        let (mut engine, _events) = ready_engine(lines).await;
        let layout = TestLayout::new(800.0)
            .with_line("1", 0.0, 100.0)
            .with_line("2", 120.0, 100.0);

        let first = engine.handle_transport(TransportEvent::TimeUpdate(0.5), &layout);
        assert!(first.is_some(), "first active line centers");

        // More ticks inside the same line: no redundant scroll commands
        assert!(engine.handle_transport(TransportEvent::TimeUpdate(1.0), &layout).is_none());
        assert!(engine.handle_transport(TransportEvent::TimeUpdate(1.9), &layout).is_none());

        let second = engine.handle_transport(TransportEvent::TimeUpdate(3.5), &layout);
        assert_eq!(second, Some(ScrollRequest { target: -230.0 }));
        assert_eq!(engine.snapshot().scroll_target, Some(-230.0));
    }

    #[tokio::test]
    async fn test_layout_invalidation_recenters() {
        let (mut engine, _events) = ready_engine(hello_world_transcript()).await;
        let layout = TestLayout::new(800.0).with_line("1", 1000.0, 100.0);

        engine.handle_transport(TransportEvent::TimeUpdate(0.5), &layout);
        assert!(engine.handle_transport(TransportEvent::TimeUpdate(1.0), &layout).is_none());

        engine.invalidate_layout();
        let resized = TestLayout::new(600.0).with_line("1", 1000.0, 100.0);
        assert_eq!(
            engine.handle_transport(TransportEvent::TimeUpdate(1.5), &resized),
            Some(ScrollRequest { target: 750.0 })
        );
    }

    // ========== Ended / replay ==========

    #[tokio::test]
    async fn test_ended_then_replay() {
        let (mut engine, _events) = ready_engine(hello_world_transcript()).await;
        let layout = TestLayout::new(800.0).with_line("1", 1000.0, 100.0);

        engine.handle_transport(TransportEvent::TimeUpdate(5.01), &layout);
        engine.handle_transport(TransportEvent::Ended, &layout);
        let snapshot = engine.snapshot();
        assert!(snapshot.replay_visible);
        assert!(!snapshot.controls_visible);

        let commands = engine.replay();
        assert_eq!(commands, [MediaCommand::SetTime(0.0), MediaCommand::Play]);
        let snapshot = engine.snapshot();
        assert!(!snapshot.ended);
        assert_eq!(snapshot.current_time, 0.0);
        assert_eq!(
            snapshot.active_line,
            Some("1"),
            "highlight resynchronized at time zero"
        );
    }

    // ========== Playback before the transcript resolves ==========

    #[test]
    fn test_playback_tracked_while_acquiring() {
        let mut engine = Engine::new();
        let layout = TestLayout::new(800.0);
        let (_job, _autoplay) = engine.select(b"clip".to_vec(), "video/mp4");

        // Video plays while the transcript request is outstanding; the
        // lyric overlay simply has nothing to show yet.
        let request = engine.handle_transport(TransportEvent::TimeUpdate(2.0), &layout);
        assert!(request.is_none());

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.status, SessionStatus::Acquiring);
        assert_eq!(snapshot.current_time, 2.0);
        assert_eq!(snapshot.active_line, None);
        assert!(snapshot.line_statuses.is_empty());
    }

    #[tokio::test]
    async fn test_new_selection_resets_playback_and_highlight() {
        let (mut engine, _events) = ready_engine(hello_world_transcript()).await;
        let layout = TestLayout::new(800.0).with_line("1", 1000.0, 100.0);
        engine.handle_transport(TransportEvent::TimeUpdate(1.5), &layout);
        engine.handle_transport(TransportEvent::Ended, &layout);

        let (_job, _autoplay) = engine.select(b"other".to_vec(), "video/mp4");

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.status, SessionStatus::Acquiring);
        assert_eq!(snapshot.current_time, 0.0);
        assert!(!snapshot.ended);
        assert_eq!(snapshot.active_line, None);
        assert!(snapshot.line_statuses.is_empty());
        assert_eq!(snapshot.scroll_target, None);
    }
}
