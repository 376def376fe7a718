//! Timed events crossing the bridge in both directions.

use ponte_patch::{MessageTag, ParameterIndex};
use smallvec::SmallVec;

use crate::MillisecondTime;

/// Raw MIDI bytes; three inline so channel-voice messages never allocate.
pub type MidiBytes = SmallVec<[u8; 3]>;

/// A timed event scheduled into the engine.
///
/// All timestamps are on the engine's millisecond clock. Transport-shaped
/// events are forwarded at block-relative time zero.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Midi {
        time: MillisecondTime,
        bytes: MidiBytes,
    },
    BeatTime {
        time: MillisecondTime,
        beat_time: f64,
    },
    Tempo {
        time: MillisecondTime,
        bpm: f64,
    },
    TransportState {
        time: MillisecondTime,
        running: bool,
    },
    TimeSignature {
        time: MillisecondTime,
        numerator: u32,
        denominator: u32,
    },
    Parameter {
        time: MillisecondTime,
        index: ParameterIndex,
        value: f64,
    },
}

/// Payload of a tagged message event.
#[derive(Debug, Clone, PartialEq)]
pub enum MessagePayload {
    /// Zero-argument occurrence.
    Bang,
    Number(f64),
    List(Vec<f64>),
}

/// Engine→bridge upcall surface.
///
/// The engine invokes these synchronously from within its block-processing
/// call, on the calling thread, never concurrently with it.
pub trait EventTarget {
    /// A parameter changed inside the engine.
    fn handle_parameter_event(
        &mut self,
        index: ParameterIndex,
        time: MillisecondTime,
        value: f64,
    );

    /// A tagged message left the patch through an outport.
    fn handle_message_event(
        &mut self,
        tag: MessageTag,
        time: MillisecondTime,
        payload: &MessagePayload,
    );

    /// A MIDI event left the patch.
    fn handle_midi_event(&mut self, time: MillisecondTime, bytes: &[u8]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_voice_bytes_stay_inline() {
        let bytes: MidiBytes = SmallVec::from_slice(&[0x90, 60, 100]);
        assert!(!bytes.spilled());
    }
}
