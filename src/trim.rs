//! Trim filter construction.
//!
//! A [`TrimWindow`] turns the skip/truncate amounts and the (possibly unknown)
//! input duration into the leading part of the video filter graph.

/// Frame rate forced onto the output when an end cut is applied.
pub const END_TRIM_FRAME_RATE: u32 = 25;

/// Timestamp reset appended after the trim so output PTS starts at zero.
const PTS_RESET: &str = "setpts=PTS-STARTPTS";

/// Compatibility shim for cutting from the end.
///
/// ffmpeg can report a frame-rate/duration mismatch when the end of the
/// input is trimmed away; pinning the output rate avoids it. Returns the
/// rate to force, or `None` when no end cut is applied.
pub fn end_trim_frame_rate(has_end_cut: bool) -> Option<u32> {
    has_end_cut.then_some(END_TRIM_FRAME_RATE)
}

/// The part of the input to keep, in whole seconds from its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimWindow {
    start: u64,
    end: Option<i64>,
}

impl TrimWindow {
    /// Compute the window for `skip` seconds off the start and `truncate`
    /// seconds off the end.
    ///
    /// The end cut sits at `duration - truncate`, truncated toward zero. It
    /// is only set when `truncate > 0` and the duration is known; with an
    /// unknown duration only the start cut remains, silently; callers that
    /// want to report the dropped cut do so themselves. Windows that cut away
    /// the whole input are not rejected here.
    pub fn new(skip: u64, truncate: u64, duration: Option<f64>) -> Self {
        let end = match (truncate, duration) {
            (0, _) => None,
            (_, Some(duration)) => Some((duration - truncate as f64).trunc() as i64),
            (_, None) => None,
        };
        Self { start: skip, end }
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> Option<i64> {
        self.end
    }

    /// Filter graph steps for this window: the trim followed by the
    /// timestamp reset, comma-separated.
    pub fn filter(&self) -> String {
        let mut filter = format!("trim=start={}", self.start);
        if let Some(end) = self.end {
            filter.push_str(&format!(":end={end}"));
        }
        filter.push(',');
        filter.push_str(PTS_RESET);
        filter
    }

    /// Output frame rate to force, per [`end_trim_frame_rate`].
    pub fn forced_frame_rate(&self) -> Option<u32> {
        end_trim_frame_rate(self.end.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::{TrimWindow, end_trim_frame_rate};

    #[test]
    fn start_only() {
        let window = TrimWindow::new(5, 0, Some(60.0));
        assert_eq!(window.filter(), "trim=start=5,setpts=PTS-STARTPTS");
        assert_eq!(window.forced_frame_rate(), None);
    }

    #[test]
    fn end_cut_with_known_duration() {
        let window = TrimWindow::new(0, 10, Some(60.0));
        assert_eq!(window.end(), Some(50));
        assert_eq!(window.filter(), "trim=start=0:end=50,setpts=PTS-STARTPTS");
        assert_eq!(window.forced_frame_rate(), Some(25));
    }

    #[test]
    fn end_cut_truncates_fractional_seconds() {
        let window = TrimWindow::new(2, 10, Some(60.9));
        assert_eq!(window.end(), Some(50));
    }

    #[test]
    fn unknown_duration_drops_end_cut() {
        let window = TrimWindow::new(3, 10, None);
        assert_eq!(window.end(), None);
        assert_eq!(window.filter(), "trim=start=3,setpts=PTS-STARTPTS");
        assert_eq!(window.forced_frame_rate(), None);
    }

    #[test]
    fn frame_rate_policy() {
        assert_eq!(end_trim_frame_rate(true), Some(25));
        assert_eq!(end_trim_frame_rate(false), None);
    }
}
