//! Time-to-highlight indexing
//!
//! Pure functions mapping the playback clock to lyric highlight state:
//! which line is active, which words within a line are active, and how
//! every line classifies relative to the clock. This is the hottest path
//! in the engine (recomputed on every time-update signal), so the
//! per-tick state lives in [`HighlightBuffers`] and is updated in place.
//!
//! Resolution policy for automatic timings, which may contain
//! zero-duration or overlapping intervals:
//! - intervals are inclusive on both ends (no flicker at exact boundaries)
//! - the first matching line in sequence order wins under overlap

use crate::transcript::{LyricLine, Transcript};

/// Classification of a line relative to the playback clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStatus {
    /// The clock has not reached this line yet
    #[default]
    Upcoming,
    /// This line currently matches the clock
    Active,
    /// The clock has moved beyond this line's end
    Passed,
}

/// Index of the first line whose inclusive interval contains `time`.
///
/// Returns `None` in gaps between lines and before/after the transcript.
pub fn active_line_index(time: f64, transcript: &Transcript) -> Option<usize> {
    transcript.lines().iter().position(|line| line.contains(time))
}

/// Id of the active line at `time`, per the first-match inclusive rule
pub fn active_line(time: f64, transcript: &Transcript) -> Option<&str> {
    active_line_index(time, transcript).map(|idx| transcript.lines()[idx].id.as_str())
}

/// Whether the word at `word_index` in `line` is active at `time`.
///
/// Word activation is independent of the parent line's interval, so a word
/// stays highlighted even when the line's overall boundary is mis-timed
/// relative to its words.
pub fn word_active(time: f64, line: &LyricLine, word_index: usize) -> bool {
    line.original_words
        .get(word_index)
        .is_some_and(|w| w.contains(time))
}

/// Indices of all words in `line` active at `time`.
///
/// Multiple words may be simultaneously active when their intervals
/// overlap; all of them are yielded, in sequence order.
pub fn active_words(time: f64, line: &LyricLine) -> impl Iterator<Item = usize> + '_ {
    line.original_words
        .iter()
        .enumerate()
        .filter(move |(_, word)| word.contains(time))
        .map(|(idx, _)| idx)
}

/// Classify `line` relative to `time`.
///
/// `is_active` is the verdict of [`active_line`] for this line. Active wins
/// over Passed: under overlapping intervals a line can satisfy
/// `time > end_time` and still be the active one.
pub fn line_status(time: f64, line: &LyricLine, is_active: bool) -> LineStatus {
    if is_active {
        LineStatus::Active
    } else if time > line.end_time {
        LineStatus::Passed
    } else {
        LineStatus::Upcoming
    }
}

/// Pre-allocated per-tick highlight state
///
/// Recomputed from scratch on every time-update signal, but updated
/// in place so the hot path performs no allocations once the buffer has
/// grown to the transcript's line count.
#[derive(Debug, Clone, Default)]
pub struct HighlightBuffers {
    statuses: Vec<LineStatus>,
    active_index: Option<usize>,
}

impl HighlightBuffers {
    /// Create new empty buffers
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure the status buffer matches the given line count
    pub fn ensure_capacity(&mut self, line_count: usize) {
        if self.statuses.len() != line_count {
            self.statuses.resize(line_count, LineStatus::Upcoming);
        }
    }

    /// Recompute all highlight state for `time`
    pub fn recompute(&mut self, time: f64, transcript: &Transcript) {
        self.ensure_capacity(transcript.len());
        self.active_index = active_line_index(time, transcript);

        for (idx, line) in transcript.lines().iter().enumerate() {
            self.statuses[idx] = line_status(time, line, Some(idx) == self.active_index);
        }
    }

    /// Per-line statuses from the last recompute
    pub fn statuses(&self) -> &[LineStatus] {
        &self.statuses
    }

    /// Index of the active line, if any
    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    /// Id of the active line within `transcript`, if any
    pub fn active_id<'a>(&self, transcript: &'a Transcript) -> Option<&'a str> {
        self.active_index
            .and_then(|idx| transcript.lines().get(idx))
            .map(|line| line.id.as_str())
    }

    /// Clear all state (new selection)
    pub fn clear(&mut self) {
        self.statuses.clear();
        self.active_index = None;
    }
}
