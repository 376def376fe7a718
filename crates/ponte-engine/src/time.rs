//! Conversion between the engine's millisecond clock and the host's
//! sample-offset clock.

use crate::{MillisecondTime, SampleOffset};

/// Snapshot of (sample rate, time origin) for one processing block.
///
/// The origin is the engine-clock time of the block's first frame. The
/// snapshot must be re-derived at the top of every block, before any event
/// conversion; conversions against a stale snapshot timestamp events on the
/// wrong clock epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeConverter {
    sample_rate: f64,
    origin_ms: MillisecondTime,
}

impl TimeConverter {
    pub fn new(sample_rate: f64, origin_ms: MillisecondTime) -> Self {
        Self {
            sample_rate,
            origin_ms,
        }
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn origin_ms(&self) -> MillisecondTime {
        self.origin_ms
    }

    /// Engine-clock time of a frame offset within the current block.
    #[inline]
    pub fn sample_offset_to_ms(&self, offset: SampleOffset) -> MillisecondTime {
        self.origin_ms + (offset as f64) * 1000.0 / self.sample_rate
    }

    /// Frame offset within the current block of an engine-clock time.
    #[inline]
    pub fn ms_to_sample_offset(&self, ms: MillisecondTime) -> SampleOffset {
        ((ms - self.origin_ms) * self.sample_rate / 1000.0).round() as SampleOffset
    }
}

impl Default for TimeConverter {
    fn default() -> Self {
        Self::new(44100.0, 0.0)
    }
}
