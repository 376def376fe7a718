//! Host transport values.

/// Musical time signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSignature {
    pub numerator: u32,
    pub denominator: u32,
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self {
            numerator: 4,
            denominator: 4,
        }
    }
}

/// Host-reported transport state for the current block.
///
/// The bridge forwards each field to the engine only when it differs from
/// the last-forwarded value, so an unchanged transport produces no events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transport {
    /// Position in beats from the transport origin.
    pub beat_time: f64,
    /// Tempo in beats per minute.
    pub tempo: f64,
    pub running: bool,
    pub time_signature: TimeSignature,
}

impl Transport {
    /// Beat time clamped non-negative, as forwarded to the engine.
    pub fn clamped_beat_time(&self) -> f64 {
        self.beat_time.max(0.0)
    }

    /// Tempo clamped non-negative, as forwarded to the engine.
    pub fn clamped_tempo(&self) -> f64 {
        self.tempo.max(0.0)
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            beat_time: 0.0,
            tempo: 120.0,
            running: false,
            time_signature: TimeSignature::default(),
        }
    }
}
