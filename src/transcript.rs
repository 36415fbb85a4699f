//! Transcript data types
//!
//! Owned, immutable once received from the ingestion service.

use serde::{Deserialize, Serialize};

/// A single timed word in a lyric line
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    /// The original-language word text
    pub text: String,
    /// Start time in seconds
    pub start_time: f64,
    /// End time in seconds
    pub end_time: f64,
}

impl Word {
    /// Check whether `time` falls inside this word's interval, inclusive on
    /// both ends. Total for any input: a non-finite bound never matches.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time && time <= self.end_time
    }

    /// Check if the word is empty (whitespace only)
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A single line of lyrics with word-level timing
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricLine {
    /// Unique, stable id used for equality and layout correlation
    pub id: String,
    /// Start time in seconds
    #[serde(default)]
    pub start_time: f64,
    /// End time in seconds
    #[serde(default)]
    pub end_time: f64,
    /// Words in this line (for word-level sync)
    #[serde(default)]
    pub original_words: Vec<Word>,
    /// Translated line text
    #[serde(default)]
    pub translation: String,
    /// Phonetic rendering of the line
    #[serde(default)]
    pub phonetic: String,
}

impl LyricLine {
    /// Check whether `time` falls inside this line's interval, inclusive on
    /// both ends.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time && time <= self.end_time
    }

    /// Get the full line text by joining all words
    pub fn to_line(&self) -> String {
        self.original_words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check if the line is empty
    pub fn is_empty(&self) -> bool {
        self.original_words.is_empty() || self.original_words.iter().all(|w| w.is_empty())
    }
}

/// An ordered sequence of lyric lines, read-only after construction.
///
/// Lines are kept in the order the ingestion service delivered them
/// (expected non-decreasing by `start_time`, not re-sorted here). Word
/// intervals are expected to lie within their parent line's interval, but
/// neither property is enforced: the indexer in [`crate::sync`] stays
/// correct for overlapping or out-of-range intervals.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Transcript {
    lines: Vec<LyricLine>,
}

impl Transcript {
    /// Wrap lines delivered by the ingestion service
    pub fn new(lines: Vec<LyricLine>) -> Self {
        Self { lines }
    }

    /// Read access to the ordered line sequence
    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    /// Look up a line by id
    pub fn line(&self, id: &str) -> Option<&LyricLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the transcript has no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
