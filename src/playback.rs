//! Media transport state
//!
//! Signal and command types for the host media surface, plus the small
//! state machine deciding between normal transport and the post-completion
//! replay overlay:
//!
//! ```text
//! Host media surface --[TransportEvent]--> PlaybackState
//! Host media surface <--[MediaCommand]---- replay()
//! ```
//!
//! Each signal is applied as one atomic, synchronous state update; nothing
//! here suspends.

/// Signals consumed from the host media surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportEvent {
    /// The playback clock advanced to a new position (seconds)
    TimeUpdate(f64),
    /// Playback started or resumed
    Played,
    /// The media ran to completion
    Ended,
}

/// Commands issued to the host media surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaCommand {
    /// Seek the playback clock to an absolute position in seconds
    SetTime(f64),
    /// Start playback
    Play,
}

/// Playback clock plus the ended/replay state machine
///
/// `ended` is true exactly between a completion signal and the next
/// play/resume or time-advance signal. Seeking while the replay overlay is
/// shown is permitted: the host may still issue `SetTime`, and the
/// resulting time update clears the ended state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlaybackState {
    current_time: f64,
    ended: bool,
}

impl PlaybackState {
    /// Create a fresh state at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Current playback clock in seconds
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Whether the media has completed and not since resumed
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Native transport controls are shown only while not ended
    pub fn controls_visible(&self) -> bool {
        !self.ended
    }

    /// The replay affordance overlays the media surface while ended
    pub fn replay_visible(&self) -> bool {
        self.ended
    }

    /// Apply one transport signal
    pub fn handle(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::TimeUpdate(time) => {
                self.current_time = time;
                // Any time advance means playback resumed from somewhere
                if self.ended {
                    self.ended = false;
                }
            }
            TransportEvent::Played => self.ended = false,
            TransportEvent::Ended => {
                tracing::debug!(position = self.current_time, "playback completed");
                self.ended = true;
            }
        }
    }

    /// User-triggered replay: zero the clock, leave the ended state, and
    /// command the media surface to start over
    pub fn replay(&mut self) -> [MediaCommand; 2] {
        self.current_time = 0.0;
        self.ended = false;
        [MediaCommand::SetTime(0.0), MediaCommand::Play]
    }

    /// Reset for a new media selection
    pub fn reset(&mut self) {
        self.current_time = 0.0;
        self.ended = false;
    }
}
