//! Scroll centering for the active lyric line
//!
//! The controller reacts to changes in active-line *identity*, never to raw
//! clock ticks, so the scroll surface receives one smooth-scroll request
//! per line change instead of one per time update. Rendered positions come
//! in through the [`LayoutQuery`] capability so the controller stays
//! independent of any rendering technology.

/// Measured position of a rendered line inside the scroll container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    /// Offset of the line's top edge from the container's content origin
    pub top: f32,
    /// Rendered height of the line
    pub height: f32,
}

/// Layout-query capability exposed by the presentation surface
pub trait LayoutQuery {
    /// Rendered metrics for a line, or `None` while unmeasured (e.g. first
    /// render before mount)
    fn line_metrics(&self, line_id: &str) -> Option<LineMetrics>;

    /// Visible height of the scroll container
    fn container_height(&self) -> f32;
}

/// A smooth-scroll request for the owning scroll surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    /// Absolute target offset of the scroll surface
    pub target: f32,
}

/// Target offset that vertically centers a line in its container
pub fn center_target(metrics: LineMetrics, container_height: f32) -> f32 {
    metrics.top - container_height / 2.0 + metrics.height / 2.0
}

/// Controller that keeps the active line centered
///
/// Memorizes the line it last issued a request for; an unmeasured line is
/// not memorized, so the request is retried once layout becomes available.
#[derive(Debug, Clone, Default)]
pub struct ScrollCenter {
    centered_line: Option<String>,
}

impl ScrollCenter {
    /// Create a controller with no memorized line
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe the current active line identity.
    ///
    /// Returns a request when a line different from the last centered one
    /// is active and measured. Repeated observation of the same line and
    /// unchanged layout yields the same target, and re-issuing it is safe.
    pub fn observe(
        &mut self,
        active_line: Option<&str>,
        layout: &impl LayoutQuery,
    ) -> Option<ScrollRequest> {
        let line_id = match active_line {
            Some(id) => id,
            None => {
                // Nothing to center; keep the surface where it is
                self.centered_line = None;
                return None;
            }
        };

        if self.centered_line.as_deref() == Some(line_id) {
            return None;
        }

        let metrics = layout.line_metrics(line_id)?;
        self.centered_line = Some(line_id.to_string());
        Some(ScrollRequest {
            target: center_target(metrics, layout.container_height()),
        })
    }

    /// Forget the memorized line so the next observation re-issues its
    /// request. Call after the container or line layout changes size.
    pub fn invalidate(&mut self) {
        self.centered_line = None;
    }

    /// The line the controller last centered, if any
    pub fn centered_line(&self) -> Option<&str> {
        self.centered_line.as_deref()
    }
}
