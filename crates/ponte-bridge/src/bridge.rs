//! The per-block execution bridge.

use std::collections::HashMap;
use std::sync::Arc;

use smallvec::SmallVec;

use ponte_engine::{
    EngineEvent, MessagePayload, MidiBuffer, PatchEngine, TimeConverter, Transport, TriggerBuffer,
};
use ponte_patch::{CompiledPatch, MessageTag, ParameterIndex};

use crate::asset::AudioAsset;
use crate::decode::DecoderRegistry;
use crate::loader::ExternalDataRef;
use crate::outputs::OutputSink;
use crate::pipe::DecodePipe;

/// Last-forwarded transport values.
///
/// Sentinels are chosen so the first block with a live transport forwards
/// every field once.
struct TransportSnapshot {
    beat_time: f64,
    tempo: f64,
    running: bool,
    numerator: u32,
    denominator: u32,
}

impl Default for TransportSnapshot {
    fn default() -> Self {
        Self {
            beat_time: -1.0,
            tempo: 0.0,
            running: false,
            numerator: 0,
            denominator: 0,
        }
    }
}

/// Bridges one host node instance to one embedded patch engine.
///
/// Everything here runs on the host's processing thread. The only
/// off-thread work is asset decoding, which the loaders route through the
/// shared [`DecodePipe`]; results are installed back into the engine from
/// [`PatchBridge::process_block`] between processing calls.
pub struct PatchBridge<E: PatchEngine> {
    patch: Arc<CompiledPatch>,
    engine: E,
    converter: TimeConverter,
    block_size: usize,

    float_inputs: HashMap<ParameterIndex, f32>,
    int_inputs: HashMap<ParameterIndex, i32>,
    bool_inputs: HashMap<ParameterIndex, bool>,
    inport_triggers: HashMap<MessageTag, TriggerBuffer>,
    midi_in: Option<MidiBuffer>,
    transport: Option<Transport>,
    last_transport: TransportSnapshot,

    data_refs: Vec<ExternalDataRef>,

    sink: OutputSink,
}

impl<E: PatchEngine> PatchBridge<E> {
    pub fn new(
        patch: Arc<CompiledPatch>,
        mut engine: E,
        sample_rate: f64,
        block_size: usize,
        pipe: Arc<DecodePipe>,
        registry: Arc<DecoderRegistry>,
    ) -> Self {
        engine.prepare(sample_rate, block_size);

        let float_inputs = patch
            .input_floats()
            .iter()
            .map(|p| (p.index, p.initial_value))
            .collect();
        let int_inputs = patch
            .input_ints()
            .iter()
            .map(|p| (p.index, p.initial_value as i32))
            .collect();
        let bool_inputs = patch
            .input_bools()
            .iter()
            .map(|p| (p.index, p.initial_value != 0.0))
            .collect();
        let inport_triggers = patch
            .inports()
            .iter()
            .map(|p| (p.tag, TriggerBuffer::new()))
            .collect();
        let midi_in = patch.has_midi_in().then(MidiBuffer::new);
        let data_refs = patch
            .external_data()
            .iter()
            .map(|d| ExternalDataRef::new(d.slot, &d.id, Arc::clone(&pipe), Arc::clone(&registry)))
            .collect();
        let sink = OutputSink::new(&patch);

        Self {
            converter: TimeConverter::new(sample_rate, 0.0),
            patch,
            engine,
            block_size,
            float_inputs,
            int_inputs,
            bool_inputs,
            inport_triggers,
            midi_in,
            transport: None,
            last_transport: TransportSnapshot::default(),
            data_refs,
            sink,
        }
    }

    pub fn patch(&self) -> &CompiledPatch {
        &self.patch
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Host-visible outputs for the block that just completed.
    pub fn outputs(&self) -> &OutputSink {
        &self.sink
    }

    pub fn data_refs(&self) -> &[ExternalDataRef] {
        &self.data_refs
    }

    /// Write a float input cell. Unknown indices are ignored.
    pub fn set_float_input(&mut self, index: ParameterIndex, value: f32) {
        if let Some(cell) = self.float_inputs.get_mut(&index) {
            *cell = value;
        }
    }

    /// Write an int input cell. Unknown indices are ignored.
    pub fn set_int_input(&mut self, index: ParameterIndex, value: i32) {
        if let Some(cell) = self.int_inputs.get_mut(&index) {
            *cell = value;
        }
    }

    /// Write a bool input cell. Unknown indices are ignored.
    pub fn set_bool_input(&mut self, index: ParameterIndex, value: bool) {
        if let Some(cell) = self.bool_inputs.get_mut(&index) {
            *cell = value;
        }
    }

    /// Record an inport trigger occurrence for the upcoming block.
    pub fn trigger_inport(&mut self, tag: MessageTag, frame: usize) {
        if let Some(buffer) = self.inport_triggers.get_mut(&tag) {
            buffer.trigger_frame(frame);
        }
    }

    /// MIDI input accumulation for the upcoming block, when declared.
    pub fn midi_in_mut(&mut self) -> Option<&mut MidiBuffer> {
        self.midi_in.as_mut()
    }

    /// Latest host transport values. Ignored when the patch opts out.
    pub fn set_transport(&mut self, transport: Transport) {
        if self.patch.has_transport() {
            self.transport = Some(transport);
        }
    }

    /// Bind an asset to the external-data reference named `id`.
    pub fn bind_asset(&mut self, id: &str, asset: Option<Arc<dyn AudioAsset>>) {
        if let Some(data_ref) = self.data_refs.iter_mut().find(|d| d.id() == id) {
            data_ref.bind(asset);
        }
    }

    /// Process one block. The step order is load-bearing: the time snapshot
    /// must be fresh before any event conversion, inputs must be forwarded
    /// before the processing call, and loaders pump between the two so a
    /// newly staged buffer is visible to this block.
    pub fn process_block(
        &mut self,
        audio_in: &[&[f32]],
        audio_out: &mut [&mut [f32]],
        frames: usize,
    ) {
        debug_assert_eq!(audio_in.len(), self.patch.audio_inputs().len());
        debug_assert_eq!(audio_out.len(), self.patch.audio_outputs().len());

        // 1. Re-derive the block's time snapshot from the live engine clock.
        self.converter = TimeConverter::new(self.engine.sample_rate(), self.engine.current_time());
        self.sink.set_converter(self.converter);

        // 2. Clear the previous block's timed outputs.
        self.sink.advance_block();

        // 3. Audio staging is by reference: `audio_in`/`audio_out` go to the
        //    engine untouched in step 9.

        // 4. Forward buffered MIDI input as engine-clock events.
        if let Some(midi_in) = &mut self.midi_in {
            for packet in midi_in.iter() {
                let time = self.converter.sample_offset_to_ms(packet.frame() as i64);
                self.engine.schedule_event(EngineEvent::Midi {
                    time,
                    bytes: SmallVec::from_slice(packet.bytes()),
                });
            }
            midi_in.advance_block();
        }

        // 5. Forward transport deltas at block-relative time zero.
        if let Some(transport) = self.transport {
            let beat_time = transport.clamped_beat_time();
            if self.last_transport.beat_time != beat_time {
                self.last_transport.beat_time = beat_time;
                self.engine
                    .schedule_event(EngineEvent::BeatTime { time: 0.0, beat_time });
            }

            let tempo = transport.clamped_tempo();
            if self.last_transport.tempo != tempo {
                self.last_transport.tempo = tempo;
                self.engine
                    .schedule_event(EngineEvent::Tempo { time: 0.0, bpm: tempo });
            }

            if self.last_transport.running != transport.running {
                self.last_transport.running = transport.running;
                self.engine.schedule_event(EngineEvent::TransportState {
                    time: 0.0,
                    running: transport.running,
                });
            }

            let sig = transport.time_signature;
            if self.last_transport.numerator != sig.numerator
                || self.last_transport.denominator != sig.denominator
            {
                self.last_transport.numerator = sig.numerator;
                self.last_transport.denominator = sig.denominator;
                self.engine.schedule_event(EngineEvent::TimeSignature {
                    time: 0.0,
                    numerator: sig.numerator,
                    denominator: sig.denominator,
                });
            }
        }

        // 6. Diff-and-forward input parameters against the engine's cache.
        for (&index, &value) in &self.float_inputs {
            let value = f64::from(value);
            if self.engine.parameter_value(index) != value {
                self.engine.set_parameter_value(index, value);
            }
        }
        for (&index, &value) in &self.int_inputs {
            let value = f64::from(value);
            if self.engine.parameter_value(index) != value {
                self.engine.set_parameter_value(index, value);
            }
        }
        for (&index, &value) in &self.bool_inputs {
            let value = if value { 1.0 } else { 0.0 };
            if self.engine.parameter_value(index) != value {
                self.engine.set_parameter_value(index, value);
            }
        }

        // 7. Forward inport trigger occurrences as tagged bangs.
        for (tag, buffer) in &mut self.inport_triggers {
            for &frame in buffer.frames() {
                let time = self.converter.sample_offset_to_ms(frame as i64);
                self.engine.send_message(*tag, time, MessagePayload::Bang);
            }
            buffer.advance_block();
        }

        // 8. Pump the external-data loaders.
        for data_ref in &mut self.data_refs {
            data_ref.update(&mut self.engine);
        }

        // 9. Run the engine; callbacks land in the sink before this returns.
        self.engine
            .process(audio_in, audio_out, frames, &mut self.sink);
    }

    /// Explicit reset request: clears timed output accumulation. Parameter
    /// values are untouched; engine-internal state is the engine's concern.
    pub fn reset(&mut self) {
        self.sink.reset();
    }
}
