//! The engine capability interface.

use std::sync::Arc;

use ponte_patch::{DataRefIndex, MessageTag, ParameterIndex};

use crate::events::{EngineEvent, EventTarget, MessagePayload};
use crate::MillisecondTime;

/// A decoded sample buffer handed into an engine external-data slot.
///
/// Ownership of the storage transfers with the `Arc`: the engine keeps its
/// reference until it retires the slot's data, so the samples outlive every
/// use inside the engine regardless of what the loader does next.
#[derive(Debug, Clone)]
pub struct ExternalData {
    pub samples: Arc<[f32]>,
    pub channels: usize,
    pub sample_rate: f64,
}

impl ExternalData {
    /// Frames per channel.
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels
        }
    }
}

/// Capability interface over one embedded patch engine instance.
///
/// The bridge is the only caller. All methods are invoked from the
/// real-time thread that owns the node; implementations must not block in
/// `process` or any of the scheduling calls.
pub trait PatchEngine {
    /// Configure for the host's sample rate and block size. Called once at
    /// construction and again whenever either changes.
    fn prepare(&mut self, sample_rate: f64, block_size: usize);

    /// Current engine sample rate.
    fn sample_rate(&self) -> f64;

    /// Engine-clock time of the next block's first frame, in milliseconds.
    fn current_time(&self) -> MillisecondTime;

    /// Cached value of a parameter as the engine currently sees it.
    fn parameter_value(&self, index: ParameterIndex) -> f64;

    /// Forward a new parameter value.
    fn set_parameter_value(&mut self, index: ParameterIndex, value: f64);

    /// Enqueue a timed event for the next processing call.
    fn schedule_event(&mut self, event: EngineEvent);

    /// Enqueue a tagged message for the next processing call.
    fn send_message(&mut self, tag: MessageTag, time: MillisecondTime, payload: MessagePayload);

    /// Install decoded sample data into an external-data slot, replacing and
    /// thereby releasing whatever the slot held before.
    fn set_external_data(&mut self, slot: DataRefIndex, data: ExternalData);

    /// Process one block. `inputs`/`outputs` are per-channel frame slices of
    /// equal length `frames`. Zero or more upcalls on `events` are raised
    /// synchronously before this returns.
    fn process(
        &mut self,
        inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
        frames: usize,
        events: &mut dyn EventTarget,
    );
}
