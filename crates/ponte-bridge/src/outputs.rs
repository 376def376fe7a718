//! Host-visible output state and the engine callback surface.

use std::collections::HashMap;

use ponte_engine::{
    EventTarget, MessagePayload, MidiBuffer, MidiPacket, MillisecondTime, TimeConverter,
    TriggerBuffer,
};
use ponte_patch::{CompiledPatch, MessageTag, ParameterIndex};

/// Output cells written by the engine's synchronous callbacks.
///
/// Mutated only from within the engine's processing call (same thread),
/// read by the host after the block completes. Callback dispatch looks an
/// index up in the bool, float, then int table; the first match wins, and an
/// unknown index is silently ignored, since several nodes may share one engine
/// event stream, so foreign indices are not this node's concern.
pub struct OutputSink {
    converter: TimeConverter,
    floats: HashMap<ParameterIndex, f32>,
    ints: HashMap<ParameterIndex, i32>,
    bools: HashMap<ParameterIndex, bool>,
    triggers: HashMap<MessageTag, TriggerBuffer>,
    midi: Option<MidiBuffer>,
}

impl OutputSink {
    pub fn new(patch: &CompiledPatch) -> Self {
        let floats = patch
            .output_floats()
            .iter()
            .map(|p| (p.index, p.initial_value))
            .collect();
        let ints = patch
            .output_ints()
            .iter()
            .map(|p| (p.index, p.initial_value as i32))
            .collect();
        let bools = patch
            .output_bools()
            .iter()
            .map(|p| (p.index, p.initial_value != 0.0))
            .collect();
        let triggers = patch
            .outports()
            .iter()
            .map(|p| (p.tag, TriggerBuffer::new()))
            .collect();
        let midi = patch.has_midi_out().then(MidiBuffer::new);

        Self {
            converter: TimeConverter::default(),
            floats,
            ints,
            bools,
            triggers,
            midi,
        }
    }

    /// Refresh the block's time snapshot; callbacks convert against it.
    pub(crate) fn set_converter(&mut self, converter: TimeConverter) {
        self.converter = converter;
    }

    /// Clear the previous block's timed events.
    pub(crate) fn advance_block(&mut self) {
        if let Some(midi) = &mut self.midi {
            midi.advance_block();
        }
        for trigger in self.triggers.values_mut() {
            trigger.advance_block();
        }
    }

    /// Explicit reset: output triggers and MIDI accumulation are cleared,
    /// value cells keep their last values.
    pub(crate) fn reset(&mut self) {
        if let Some(midi) = &mut self.midi {
            midi.reset();
        }
        for trigger in self.triggers.values_mut() {
            trigger.reset();
        }
    }

    pub fn float(&self, index: ParameterIndex) -> Option<f32> {
        self.floats.get(&index).copied()
    }

    pub fn int(&self, index: ParameterIndex) -> Option<i32> {
        self.ints.get(&index).copied()
    }

    pub fn bool(&self, index: ParameterIndex) -> Option<bool> {
        self.bools.get(&index).copied()
    }

    pub fn trigger(&self, tag: MessageTag) -> Option<&TriggerBuffer> {
        self.triggers.get(&tag)
    }

    pub fn midi(&self) -> Option<&MidiBuffer> {
        self.midi.as_ref()
    }
}

impl EventTarget for OutputSink {
    fn handle_parameter_event(
        &mut self,
        index: ParameterIndex,
        _time: MillisecondTime,
        value: f64,
    ) {
        if let Some(cell) = self.bools.get_mut(&index) {
            *cell = value != 0.0;
            return;
        }
        if let Some(cell) = self.floats.get_mut(&index) {
            *cell = value as f32;
            return;
        }
        if let Some(cell) = self.ints.get_mut(&index) {
            *cell = value as i32;
        }
    }

    fn handle_message_event(
        &mut self,
        tag: MessageTag,
        time: MillisecondTime,
        payload: &MessagePayload,
    ) {
        match payload {
            MessagePayload::Bang => {
                if let Some(trigger) = self.triggers.get_mut(&tag) {
                    let frame = self.converter.ms_to_sample_offset(time).max(0) as usize;
                    trigger.trigger_frame(frame);
                }
            }
            // Valued messages have no host-visible port yet.
            other => {
                tracing::debug!(?tag, ?other, "dropping non-bang outport message");
            }
        }
    }

    fn handle_midi_event(&mut self, time: MillisecondTime, bytes: &[u8]) {
        let Some(midi) = &mut self.midi else {
            return;
        };
        let frame = self.converter.ms_to_sample_offset(time).max(0) as usize;
        midi.push(MidiPacket::new(frame, bytes));
    }
}
